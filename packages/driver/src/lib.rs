//! # nfsv3-driver
//!
//! Mounts NFSv3 shares through the `fuse-nfs` helper.
//!
//! Options supplied with a mount request are negotiated against the
//! operator configuration (see [`nfsv3_options`]) before anything is run:
//!
//! ```ignore
//! use nfsv3_driver::{CommandInvoker, DriverConfig, Mounter, NfsV3Mounter};
//!
//! let config = DriverConfig::load(Path::new("/etc/nfsv3driver.json"))?;
//! let mounter = NfsV3Mounter::from_config(CommandInvoker::new(), &config);
//!
//! // fuse-nfs -n nfs://server/export?uid=1000 -m /var/vcap/data/volumes/v1 --default_permissions
//! mounter.mount("nfs://server/export", "/var/vcap/data/volumes/v1", &options).await?;
//! ```

pub mod config;
pub mod error;
pub mod invoker;
pub mod mounter;

pub use config::{DriverConfig, HelperCommands, OptionsConfig};
pub use error::{ConfigError, DriverError, InvokeError, Result};
pub use invoker::{CommandInvoker, InvokeContext, Invoker};
pub use mounter::{Mounter, NfsV3Mounter};
