//! Operator configuration for the driver.
//!
//! Loaded from a JSON file; every field is optional:
//!
//! ```json
//! {
//!   "source": { "allowed": "uid,gid", "defaults": "uid:1000", "mandatory": [] },
//!   "mount": { "allowed": "sloppy_mount,dircache", "defaults": "default_permissions:true" },
//!   "helpers": { "mount": "fuse-nfs", "unmount": "fusermount", "check": "mountpoint" },
//!   "ignore": ["source"],
//!   "check_timeout_secs": 5
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use nfsv3_options::{NegotiationConfig, OptionSet};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Allow-list, defaults and mandatory keys for one option target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OptionsConfig {
    /// Comma separated keys requests may set.
    pub allowed: String,
    /// Comma separated `key` or `key:value` defaults.
    pub defaults: String,
    /// Keys that must resolve for a mount to proceed.
    pub mandatory: Vec<String>,
}

impl OptionsConfig {
    fn option_set(&self) -> OptionSet {
        OptionSet::read_conf(&self.allowed, &self.defaults, &self.mandatory)
    }
}

/// Names of the external helper programs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HelperCommands {
    pub mount: String,
    pub unmount: String,
    pub check: String,
}

impl Default for HelperCommands {
    fn default() -> Self {
        Self {
            mount: "fuse-nfs".to_string(),
            unmount: "fusermount".to_string(),
            check: "mountpoint".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverConfig {
    /// Parameters carried by the share address.
    pub source: OptionsConfig,
    /// Parameters passed to the mount helper.
    pub mount: OptionsConfig,
    pub helpers: HelperCommands,
    /// Request keys consumed by the volume driver itself.
    pub ignore: Vec<String>,
    pub check_timeout_secs: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            source: OptionsConfig::default(),
            mount: OptionsConfig::default(),
            helpers: HelperCommands::default(),
            ignore: vec!["source".to_string()],
            check_timeout_secs: 5,
        }
    }
}

impl DriverConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the negotiation rules described by this config.
    pub fn negotiation_config(&self) -> NegotiationConfig {
        NegotiationConfig::from_sets(
            self.source.option_set(),
            self.mount.option_set().with_sloppy_switch(),
        )
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fuse_nfs_helpers() {
        let config = DriverConfig::default();
        assert_eq!(config.helpers.mount, "fuse-nfs");
        assert_eq!(config.helpers.unmount, "fusermount");
        assert_eq!(config.helpers.check, "mountpoint");
        assert_eq!(config.check_timeout(), Duration::from_secs(5));
        assert_eq!(config.ignore, vec!["source"]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: DriverConfig =
            serde_json::from_str(r#"{"mount": {"allowed": "uid,gid"}}"#).unwrap();

        assert_eq!(config.mount.allowed, "uid,gid");
        assert_eq!(config.mount.defaults, "");
        assert_eq!(config.helpers, HelperCommands::default());
        assert_eq!(config.check_timeout_secs, 5);
    }

    #[test]
    fn negotiation_config_carries_mandatory_keys() {
        let config = DriverConfig {
            source: OptionsConfig {
                allowed: "uid".to_string(),
                defaults: "gid:0".to_string(),
                mandatory: vec!["principal".to_string()],
            },
            ..Default::default()
        };

        let negotiation = config.negotiation_config();
        assert_eq!(negotiation.share().mandatory(), ["principal"]);
        assert_eq!(negotiation.share().forced()["gid"], "0");
        assert!(negotiation.mount().accepts("sloppy_mount"));
    }
}
