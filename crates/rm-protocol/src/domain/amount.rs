//! # Amounts and Currencies
//!
//! - [`Amount`]: fixed point, 8 implied decimals, stored as `i64` units.
//! - [`Currency`]: three uppercase letters packed base-26 into an `i16`
//!   (`AAA` = 0, `ZZZ` = 17575).

use crate::domain::bytestream::{ByteStream, ByteStreamer};
use crate::domain::errors::{AmountError, CurrencyError, StreamError};
use std::fmt;
use std::str::FromStr;

/// Units per whole coin.
pub const UNITS_PER_COIN: i64 = 100_000_000;

/// Non-negative fixed-point amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Build from raw units.
    pub fn from_units(units: i64) -> Result<Self, AmountError> {
        if units < 0 {
            return Err(AmountError::NegativeUnits(units));
        }
        Ok(Self(units))
    }

    /// Convert a decimal amount, truncating toward zero after the 8th digit.
    ///
    /// The decimal is multiplied first and truncated second, so values such
    /// as `0.29` land one unit below their written value.
    pub fn from_decimal(decimal: f64) -> Result<Self, AmountError> {
        if !decimal.is_finite() {
            return Err(AmountError::NotFinite(decimal));
        }
        if decimal < 0.0 {
            return Err(AmountError::Negative(decimal));
        }
        let scaled = decimal * UNITS_PER_COIN as f64;
        // i64::MAX rounds up to 2^63 as f64, so >= rejects everything that overflows
        if scaled >= i64::MAX as f64 {
            return Err(AmountError::OutOfRange(decimal));
        }
        Ok(Self(scaled.trunc() as i64))
    }

    pub fn units(self) -> i64 {
        self.0
    }

    /// Decimal rendering, `units / 1e8`.
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / UNITS_PER_COIN as f64
    }
}

impl ByteStreamer for Amount {
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
        stream.write_i64(self.0);
        Ok(())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:08}",
            self.0 / UNITS_PER_COIN,
            self.0 % UNITS_PER_COIN
        )
    }
}

const SYMBOL_LENGTH: usize = 3;
const RADIX: i16 = 26;

/// Currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Currency(i16);

impl Currency {
    /// Largest valid code (`ZZZ`).
    pub const MAX_CODE: i16 = 17575;

    /// Native currency.
    pub const IRO: Currency = Currency(5864);

    /// Mined currency.
    pub const WOD: Currency = Currency(15239);

    /// Build from a packed code in [0, 17575].
    pub fn from_code(code: i16) -> Result<Self, CurrencyError> {
        if !(0..=Self::MAX_CODE).contains(&code) {
            return Err(CurrencyError::OutOfRange(code));
        }
        Ok(Self(code))
    }

    /// Pack a symbol of exactly three uppercase ASCII letters.
    pub fn from_symbol(symbol: &str) -> Result<Self, CurrencyError> {
        let bytes = symbol.as_bytes();
        if bytes.len() != SYMBOL_LENGTH || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(CurrencyError::InvalidSymbol(symbol.to_string()));
        }
        let code = bytes
            .iter()
            .fold(0i16, |code, &letter| code * RADIX + i16::from(letter - b'A'));
        Ok(Self(code))
    }

    pub fn code(self) -> i16 {
        self.0
    }

    /// Unpack to the three-letter symbol.
    pub fn symbol(self) -> String {
        let mut letters = [b'A'; SYMBOL_LENGTH];
        let mut rest = self.0;
        for letter in letters.iter_mut().rev() {
            *letter = b'A' + (rest % RADIX) as u8;
            rest /= RADIX;
        }
        letters.iter().map(|&b| b as char).collect()
    }
}

impl ByteStreamer for Currency {
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
        stream.write_i16(self.0);
        Ok(())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}
