//! # Client Configuration
//!
//! Connection parameters and example settings for the client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FISKAL_ENDPOINT=192.168.1.20:1400                                  │
//! │     FISKAL_CASHBOX_ID=737e2889-7d32-435d-a9e7-3de40e0fa156             │
//! │     FISKAL_EXAMPLES_DIR=receipt-examples/at                            │
//! │     FISKAL_PRECISION_POLICY=reject                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pos-client/pos-client.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     localhost:1400, sample cashbox, receipt-examples/de, truncate      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [service]
//! endpoint = "localhost:1400"
//!
//! [cashbox]
//! id = "737e2889-7d32-435d-a9e7-3de40e0fa156"
//!
//! [examples]
//! dir = "receipt-examples/de"
//! precision_policy = "truncate"
//! ```

use std::net::Ipv4Addr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use fiskal_core::validation::{validate_cashbox_id, CashboxId};
use fiskal_core::{PrecisionPolicy, TransformOptions};

use crate::error::{ClientError, ClientResult};

/// Default middleware endpoint.
pub const DEFAULT_ENDPOINT: &str = "localhost:1400";

/// Sample cashbox used when none is configured.
pub const DEFAULT_CASHBOX_ID: &str = "737e2889-7d32-435d-a9e7-3de40e0fa156";

/// Default example directory, relative to the working directory.
pub const DEFAULT_EXAMPLES_DIR: &str = "receipt-examples/de";

// =============================================================================
// Sections
// =============================================================================

/// Where the signing service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// `host:port`, an IPv4 address with optional port, or a URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            endpoint: default_endpoint(),
        }
    }
}

/// The cashbox every request is signed for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashboxSettings {
    #[serde(default = "default_cashbox_id")]
    pub id: String,
}

fn default_cashbox_id() -> String {
    DEFAULT_CASHBOX_ID.to_string()
}

impl Default for CashboxSettings {
    fn default() -> Self {
        CashboxSettings {
            id: default_cashbox_id(),
        }
    }
}

/// How examples are located and transformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleSettings {
    /// Root of the example tree. Carried for the caller; this crate never
    /// walks it.
    #[serde(default = "default_examples_dir")]
    pub dir: PathBuf,

    /// Truncate (legacy) or reject decimals over the wire budget.
    #[serde(default)]
    pub precision_policy: PrecisionPolicy,
}

fn default_examples_dir() -> PathBuf {
    PathBuf::from(DEFAULT_EXAMPLES_DIR)
}

impl Default for ExampleSettings {
    fn default() -> Self {
        ExampleSettings {
            dir: default_examples_dir(),
            precision_policy: PrecisionPolicy::default(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub cashbox: CashboxSettings,

    #[serde(default)]
    pub examples: ExampleSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pos-client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document; missing sections fall back to defaults.
    pub fn from_toml(contents: &str) -> ClientResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        validate_endpoint(&self.service.endpoint)?;
        validate_cashbox_id(&self.cashbox.id)?;

        if self.examples.dir.as_os_str().is_empty() {
            return Err(ClientError::InvalidConfig(
                "examples.dir must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("FISKAL_ENDPOINT") {
            debug!(endpoint = %endpoint, "Overriding endpoint from environment");
            self.service.endpoint = endpoint;
        }

        if let Some(id) = lookup("FISKAL_CASHBOX_ID") {
            debug!(cashbox_id = %id, "Overriding cashbox ID from environment");
            self.cashbox.id = id;
        }

        if let Some(dir) = lookup("FISKAL_EXAMPLES_DIR") {
            self.examples.dir = PathBuf::from(dir);
        }

        if let Some(policy) = lookup("FISKAL_PRECISION_POLICY") {
            match policy.parse() {
                Ok(parsed) => self.examples.precision_policy = parsed,
                Err(_) => warn!(policy = %policy, "Unknown precision policy in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fiskal", "pos-client")
            .map(|dirs| dirs.config_dir().join("pos-client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the service endpoint.
    pub fn endpoint(&self) -> &str {
        &self.service.endpoint
    }

    /// Returns the validated cashbox ID.
    pub fn cashbox_id(&self) -> ClientResult<CashboxId> {
        Ok(CashboxId::parse(&self.cashbox.id)?)
    }

    /// Transform options derived from the example settings.
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            precision: self.examples.precision_policy,
        }
    }
}

// =============================================================================
// Endpoint Validation
// =============================================================================

/// Accepts `a.b.c.d[:port][/path]` or anything `url` can parse
/// (`localhost:1400` parses as a URL with scheme `localhost`).
pub fn validate_endpoint(endpoint: &str) -> ClientResult<()> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(ClientError::InvalidUrl("endpoint is required".into()));
    }

    if is_ipv4_endpoint(endpoint) {
        return Ok(());
    }

    Url::parse(endpoint)?;
    Ok(())
}

fn is_ipv4_endpoint(endpoint: &str) -> bool {
    let authority = endpoint.split('/').next().unwrap_or_default();
    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    };

    host.parse::<Ipv4Addr>().is_ok() && port.map_or(true, |p| p.parse::<u16>().is_ok())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint(), "localhost:1400");
        assert_eq!(config.cashbox.id, DEFAULT_CASHBOX_ID);
        assert_eq!(config.examples.dir, PathBuf::from("receipt-examples/de"));
        assert_eq!(config.examples.precision_policy, PrecisionPolicy::Truncate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(validate_endpoint("localhost:1400").is_ok());
        assert!(validate_endpoint("192.168.0.10").is_ok());
        assert!(validate_endpoint("192.168.0.10:1400/pos").is_ok());
        assert!(validate_endpoint("http://pos.example.com:1400").is_ok());
        assert!(validate_endpoint("").is_err());
        assert!(validate_endpoint("not a url").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.cashbox.id = "not-a-guid".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
        assert!(config.cashbox_id().is_err());

        config.cashbox.id = DEFAULT_CASHBOX_ID.to_string();
        config.service.endpoint = "   ".to_string();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClientConfig::from_toml(
            r#"
            [examples]
            precision_policy = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.examples.precision_policy, PrecisionPolicy::Reject);
        assert_eq!(config.transform_options().precision, PrecisionPolicy::Reject);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FISKAL_ENDPOINT", "10.0.0.5:1500"),
            ("FISKAL_EXAMPLES_DIR", "receipt-examples/at"),
            ("FISKAL_PRECISION_POLICY", "bogus"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.endpoint(), "10.0.0.5:1500");
        assert_eq!(config.examples.dir, PathBuf::from("receipt-examples/at"));
        // Unknown policy is ignored
        assert_eq!(config.examples.precision_policy, PrecisionPolicy::Truncate);
        assert_eq!(config.cashbox.id, DEFAULT_CASHBOX_ID);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ClientConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[service]"));
        assert!(toml_str.contains("[cashbox]"));

        let parsed = ClientConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.cashbox.id, config.cashbox.id);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("fiskal-client-test-{}", std::process::id()))
            .join("pos-client.toml");

        let mut config = ClientConfig::default();
        config.service.endpoint = "127.0.0.1:1401".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = ClientConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.endpoint(), "127.0.0.1:1401");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
