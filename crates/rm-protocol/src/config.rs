//! Protocol configuration from environment variables.

use crate::domain::keys::NETWORK;
use std::env;

/// Default transaction lifetime, in seconds.
pub const DEFAULT_TX_TTL_SECS: u64 = 600;

/// Settings shared by the wallet and explorer services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Domain separator prepended to every signed digest
    pub network_domain: String,

    /// Lifetime given to new transactions
    pub tx_ttl_secs: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            network_domain: String::from_utf8_lossy(NETWORK).into_owned(),
            tx_ttl_secs: DEFAULT_TX_TTL_SECS,
        }
    }
}

impl ProtocolConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RM_NETWORK_DOMAIN`: Signing domain (default: republicofminer.com)
    /// - `RM_TX_TTL_SECS`: Transaction lifetime in seconds (default: 600)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            network_domain: lookup("RM_NETWORK_DOMAIN")
                .filter(|domain| !domain.is_empty())
                .unwrap_or(defaults.network_domain),

            tx_ttl_secs: lookup("RM_TX_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tx_ttl_secs),
        }
    }

    /// Signing domain as bytes.
    pub fn network(&self) -> &[u8] {
        self.network_domain.as_bytes()
    }

    /// Expiry for a transaction created at `now` (Unix seconds).
    pub fn expiry_from(&self, now: i64) -> i64 {
        let ttl = i64::try_from(self.tx_ttl_secs).unwrap_or(i64::MAX);
        now.saturating_add(ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ProtocolConfig::default();
        assert_eq!(config.network(), NETWORK);
        assert_eq!(config.tx_ttl_secs, DEFAULT_TX_TTL_SECS);
    }

    #[test]
    fn test_overrides() {
        let config = ProtocolConfig::from_lookup(lookup(&[
            ("RM_NETWORK_DOMAIN", "testnet.republicofminer.com"),
            ("RM_TX_TTL_SECS", "30"),
        ]));
        assert_eq!(config.network(), b"testnet.republicofminer.com");
        assert_eq!(config.tx_ttl_secs, 30);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ProtocolConfig::from_lookup(lookup(&[
            ("RM_NETWORK_DOMAIN", ""),
            ("RM_TX_TTL_SECS", "soon"),
        ]));
        assert_eq!(config, ProtocolConfig::default());
    }

    #[test]
    fn test_expiry() {
        let config = ProtocolConfig::default();
        assert_eq!(config.expiry_from(1_000), 1_600);

        let forever = ProtocolConfig {
            tx_ttl_secs: u64::MAX,
            ..ProtocolConfig::default()
        };
        assert_eq!(forever.expiry_from(1), i64::MAX);
    }
}
