//! rm-keytool: keys, addresses, signatures and transaction hashes for
//! Republic of Miner.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rm_keytool::{address, decode_address, hash_transaction, keygen, sign, verify, Message};
use rm_protocol::ProtocolConfig;
use rm_telemetry::{init_telemetry, log_tx_event, TelemetryConfig};

/// Republic of Miner key tool
#[derive(Parser, Debug)]
#[command(name = "rm-keytool", version)]
#[command(about = "Keys, addresses, signatures and transaction hashes for Republic of Miner")]
struct Cli {
    /// Signing domain; defaults to RM_NETWORK_DOMAIN or republicofminer.com
    #[arg(long, global = true)]
    network: Option<String>,

    /// Log level for diagnostics on stderr
    #[arg(long, global = true, env = "RM_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a private key and print it with its public key and address
    Keygen,

    /// Derive the address of a key
    Address {
        /// Base64 uncompressed public key
        #[arg(long, conflicts_with = "private_key")]
        public_key: Option<String>,

        /// Base64 private key
        #[arg(long, env = "RM_PRIVATE_KEY", hide_env_values = true)]
        private_key: Option<String>,
    },

    /// Sign a digest or a text
    Sign {
        /// Base64 private key
        #[arg(long, env = "RM_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,

        #[command(flatten)]
        message: MessageArgs,
    },

    /// Verify a signature over a digest or a text
    Verify {
        /// Base64 uncompressed public key
        #[arg(long)]
        public_key: String,

        /// Base64 65-byte signature
        #[arg(long)]
        signature: String,

        #[command(flatten)]
        message: MessageArgs,
    },

    /// Show the type and payload of an address
    DecodeAddress {
        address: String,
    },

    /// Hash a JSON transaction and check its signatures
    HashTx {
        /// JSON file, or - for stdin
        #[arg(default_value = "-")]
        input: String,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct MessageArgs {
    /// Base64 32-byte digest
    #[arg(long)]
    digest: Option<String>,

    /// Text, digested with double SHA-256
    #[arg(long)]
    text: Option<String>,
}

impl MessageArgs {
    fn into_message(self) -> Message {
        match (self.digest, self.text) {
            (Some(digest), _) => Message::Digest(digest),
            (None, text) => Message::Text(text.unwrap_or_default()),
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = ProtocolConfig::from_env();
    if let Some(network) = cli.network {
        config.network_domain = network;
    }

    match cli.command {
        Command::Keygen => {
            let report = keygen();
            println!("private key: {}", report.private_key);
            println!("public key:  {}", report.public_key);
            println!("address:     {}", report.address);
        }
        Command::Address {
            public_key,
            private_key,
        } => {
            println!("{}", address(public_key.as_deref(), private_key.as_deref())?);
        }
        Command::Sign {
            private_key,
            message,
        } => {
            let signature = sign(&private_key, &message.into_message(), config.network())?;
            println!("{}", signature.to_base64());
        }
        Command::Verify {
            public_key,
            signature,
            message,
        } => {
            let valid = verify(&public_key, &signature, &message.into_message(), config.network())?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::DecodeAddress { address } => {
            let (kind, payload) = decode_address(&address)?;
            println!("type:    {kind:?} ({})", kind.code());
            println!("payload: {payload}");
        }
        Command::HashTx { input } => {
            let report = hash_transaction(&read_input(&input)?, config.network())?;
            log_tx_event!(debug, "rm-keytool", "Transaction hashed", report.hash);
            println!("{}", report.hash);

            let mut all_valid = true;
            for (signer, valid) in &report.signatures {
                println!("{signer} {}", if *valid { "valid" } else { "invalid" });
                all_valid &= *valid;
            }
            if !all_valid {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::for_service("rm-keytool");
    telemetry.log_level = cli.log_level.clone();
    if let Err(e) = init_telemetry(telemetry) {
        eprintln!("Warning: logging disabled: {e}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
