//! Per-request negotiation of share and mount options.
//!
//! [`NegotiationConfig`] is built once from operator configuration and never
//! changes afterwards. Each request starts a [`Negotiation`], a private copy
//! of both option sets that is resolved, validated and rendered, then dropped.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{NegotiationError, Result};
use crate::option_set::{OptionSet, SLOPPY_MOUNT};
use crate::parse;
use crate::value::RequestOptions;

/// Operator configuration for the share and mount option sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NegotiationConfig {
    share: OptionSet,
    mount: OptionSet,
}

impl NegotiationConfig {
    /// Build the configuration from allow-list and default strings.
    ///
    /// A request may set `sloppy_mount` on the mount set even when neither
    /// allow-list names it, and a true value downgrades unknown keys to
    /// ignored. Listing `sloppy_mount:<bool>` in `mount_defaults` without
    /// allowing it pins the mode: the forced value wins and a request that
    /// tries to set `sloppy_mount` is rejected like any unknown key.
    ///
    /// No share or mount keys are mandatory until configured with
    /// [`with_share_mandatory`](Self::with_share_mandatory) or
    /// [`with_mount_mandatory`](Self::with_mount_mandatory).
    pub fn new(
        share_allowed: &str,
        share_defaults: &str,
        mount_allowed: &str,
        mount_defaults: &str,
    ) -> Self {
        Self {
            share: OptionSet::from_allowed(share_allowed).with_defaults(share_defaults),
            mount: OptionSet::from_allowed(mount_allowed)
                .with_defaults(mount_defaults)
                .with_sloppy_switch(),
        }
    }

    /// Build the configuration from prepared option sets.
    pub fn from_sets(share: OptionSet, mount: OptionSet) -> Self {
        Self { share, mount }
    }

    pub fn with_share_mandatory<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.share = self.share.with_mandatory(keys);
        self
    }

    pub fn with_mount_mandatory<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mount = self.mount.with_mandatory(keys);
        self
    }

    pub fn share(&self) -> &OptionSet {
        &self.share
    }

    pub fn mount(&self) -> &OptionSet {
        &self.mount
    }

    /// Start a negotiation on a fresh copy of the configuration.
    pub fn begin(&self) -> Negotiation {
        Negotiation {
            share: self.share.clone(),
            mount: self.mount.clone(),
            lenient: false,
            ignored: Vec::new(),
        }
    }

    /// Resolve one request, returning the negotiation ready for rendering.
    pub fn negotiate(
        &self,
        share: &str,
        request: &RequestOptions,
        ignore: &[String],
    ) -> Result<Negotiation> {
        let mut negotiation = self.begin();
        negotiation.set_entries(share, request, ignore)?;
        Ok(negotiation)
    }
}

/// Resolution state of a single request.
#[derive(Clone, Debug)]
pub struct Negotiation {
    share: OptionSet,
    mount: OptionSet,
    lenient: bool,
    ignored: Vec<String>,
}

impl Negotiation {
    /// Merge the request and the share address query into both option sets
    /// and validate the result.
    ///
    /// Keys outside every allow-list fail the request unless the mount set
    /// resolves `sloppy_mount` to true. Missing mandatory keys always fail.
    pub fn set_entries(
        &mut self,
        share: &str,
        request: &RequestOptions,
        ignore: &[String],
    ) -> Result<()> {
        self.share.parse_map(request, ignore);
        self.mount.parse_map(request, ignore);

        let mut acceptable: BTreeSet<&str> = ignore.iter().map(String::as_str).collect();
        acceptable.extend(self.share.allowed().iter().map(String::as_str));
        acceptable.extend(self.mount.allowed().iter().map(String::as_str));
        if self.mount.accepts(SLOPPY_MOUNT) {
            acceptable.insert(SLOPPY_MOUNT);
        }
        let acceptable: BTreeSet<String> = acceptable.into_iter().map(str::to_string).collect();

        let mut rejected = self.share.parse_url(share, ignore);
        self.lenient = self.mount.take_sloppy_mount();

        rejected.extend(
            request
                .keys()
                .filter(|key| !acceptable.contains(*key))
                .cloned(),
        );
        let rejected = dedup(rejected);

        if !rejected.is_empty() {
            if !self.lenient {
                return Err(NegotiationError::UnsupportedOptions { keys: rejected });
            }
            log::info!("ignoring unsupported options: {}", rejected.join(", "));
            self.ignored = rejected;
        }

        let mut missing = self.share.missing_mandatory();
        missing.extend(self.mount.missing_mandatory());
        if !missing.is_empty() {
            return Err(NegotiationError::MissingMandatoryOptions { keys: missing });
        }

        log::debug!(
            "resolved options: share={:?} mount={:?} lenient={}",
            self.share.make_config(),
            self.mount.make_config(),
            self.lenient
        );

        Ok(())
    }

    /// Whether unsupported keys were tolerated for this request.
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Unsupported keys tolerated because the request was lenient.
    pub fn ignored_options(&self) -> &[String] {
        &self.ignored
    }

    pub fn share_options(&self) -> &OptionSet {
        &self.share
    }

    pub fn mount_options(&self) -> &OptionSet {
        &self.mount
    }

    /// `share` with its query string replaced by the resolved share options.
    pub fn rendered_share(&self, share: &str) -> String {
        let (base, _) = parse::split_share(share);
        parse::join_share(base, &self.share.make_params(""))
    }

    /// Arguments for the mount helper.
    pub fn rendered_mount_args(&self) -> Vec<String> {
        self.mount.make_params("--")
    }

    /// Resolved mount options as an unformatted map.
    pub fn mount_config(&self) -> BTreeMap<String, String> {
        self.mount.make_config()
    }
}

fn dedup(keys: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
