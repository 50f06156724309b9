//! # nfsv3-options
//!
//! Reconciles operator configuration with the options a caller supplies at
//! mount time.
//!
//! Each target (the share address and the mount command) has an
//! [`OptionSet`]:
//! - an allow-list of keys requests may set,
//! - forced values for defaulted keys outside the allow-list,
//! - resolved options (defaults, then request values),
//! - mandatory keys that must resolve for a request to succeed.
//!
//! [`NegotiationConfig`] holds the operator configuration for both targets.
//! Every request is resolved on its own [`Negotiation`], so a single
//! configuration can serve concurrent requests.
//!
//! # Example
//!
//! ```rust
//! use nfsv3_options::{NegotiationConfig, OptionValue, RequestOptions};
//!
//! let config = NegotiationConfig::new("", "", "uid,gid", "ro:true");
//!
//! let mut request = RequestOptions::new();
//! request.insert("uid".to_string(), OptionValue::Int(1000));
//!
//! let negotiation = config.negotiate("nfs://host/export", &request, &[]).unwrap();
//! assert_eq!(negotiation.rendered_mount_args(), vec!["--ro", "--uid=1000"]);
//! assert_eq!(negotiation.rendered_share("nfs://host/export"), "nfs://host/export");
//! ```

mod error;
mod negotiation;
mod option_set;
pub mod parse;
mod value;

pub use error::{NegotiationError, Result};
pub use negotiation::{Negotiation, NegotiationConfig};
pub use option_set::{OptionSet, SLOPPY_MOUNT};
pub use value::{encodes_bool_as_int, uniformize, OptionValue, RequestOptions, BOOL_AS_INT_KEYS};
