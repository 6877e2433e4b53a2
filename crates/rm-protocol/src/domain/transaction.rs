//! # Transactions
//!
//! ## Canonical Layout
//!
//! ```text
//! expire        i64
//! fees          nullable input
//! declarations  list (kind byte + payload)
//! inputs        list (address 21 B, currency i16, amount i64)
//! outputs       list (same layout as inputs)
//! message       nullable raw bytes, no length prefix
//! ```
//!
//! The transaction hash is keccak-256 over these bytes.

use crate::domain::address::Address;
use crate::domain::amount::{Amount, Currency};
use crate::domain::bytestream::{self, ByteStream, ByteStreamer};
use crate::domain::declaration::Declaration;
use crate::domain::errors::StreamError;
use shared_crypto::{keccak256, Hash256};
use std::ops::Deref;

/// Address, currency and amount of one transfer line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxInputOutput {
    address: Address,
    currency: Currency,
    amount: Amount,
}

impl TxInputOutput {
    pub fn new(address: Address, currency: Currency, amount: Amount) -> Self {
        Self {
            address,
            currency,
            amount,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl ByteStreamer for TxInputOutput {
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
        self.address.write_to(stream)?;
        self.currency.write_to(stream)?;
        self.amount.write_to(stream)
    }
}

macro_rules! transfer_line {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(TxInputOutput);

        impl $name {
            pub fn new(address: Address, currency: Currency, amount: Amount) -> Self {
                Self(TxInputOutput::new(address, currency, amount))
            }
        }

        impl Deref for $name {
            type Target = TxInputOutput;

            fn deref(&self) -> &TxInputOutput {
                &self.0
            }
        }

        impl ByteStreamer for $name {
            fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
                self.0.write_to(stream)
            }
        }
    };
}

transfer_line!(
    /// Funds taken from an address.
    TxInput
);

transfer_line!(
    /// Funds credited to an address.
    TxOutput
);

/// Free-form transaction message, written raw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionMessage(Vec<u8>);

impl TransactionMessage {
    /// Wrap message bytes; an empty message is `None`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        (!bytes.is_empty()).then_some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl ByteStreamer for TransactionMessage {
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
        stream.write_bytes(&self.0);
        Ok(())
    }
}

/// Immutable transaction value.
///
/// Built with [`Transaction::new`] and the `with_*` methods; list sizes are
/// checked when the canonical bytes are produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transaction {
    expire: i64,
    fees: Option<TxInput>,
    declarations: Vec<Declaration>,
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    message: Option<TransactionMessage>,
}

impl Transaction {
    /// Empty transaction expiring at `expire` (Unix seconds).
    pub fn new(expire: i64) -> Self {
        Self {
            expire,
            fees: None,
            declarations: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            message: None,
        }
    }

    pub fn with_fees(mut self, fees: TxInput) -> Self {
        self.fees = Some(fees);
        self
    }

    pub fn with_declaration(mut self, declaration: impl Into<Declaration>) -> Self {
        self.declarations.push(declaration.into());
        self
    }

    pub fn with_input(mut self, input: TxInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, output: TxOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Attach a message; empty bytes leave the message absent.
    pub fn with_message(mut self, message: impl Into<Vec<u8>>) -> Self {
        self.message = TransactionMessage::new(message);
        self
    }

    pub fn expire(&self) -> i64 {
        self.expire
    }

    pub fn fees(&self) -> Option<&TxInput> {
        self.fees.as_ref()
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn inputs(&self) -> &[TxInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    pub fn message(&self) -> Option<&TransactionMessage> {
        self.message.as_ref()
    }

    /// Canonical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StreamError> {
        bytestream::serialize(self)
    }

    /// keccak256 of the canonical bytes.
    pub fn hash(&self) -> Result<Hash256, StreamError> {
        Ok(keccak256(&self.to_bytes()?))
    }
}

impl ByteStreamer for Transaction {
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
        stream.write_i64(self.expire);
        stream.write_nullable(self.fees.as_ref())?;
        stream.write_list(&self.declarations)?;
        stream.write_list(&self.inputs)?;
        stream.write_list(&self.outputs)?;
        stream.write_nullable(self.message.as_ref())
    }
}
