//! Allowed, forced and resolved options for one parameter target.

use std::collections::{BTreeMap, BTreeSet};

use crate::parse;
use crate::value::{uniformize, OptionValue, RequestOptions};

/// Key that switches a request into lenient (sloppy) mode.
pub const SLOPPY_MOUNT: &str = "sloppy_mount";

/// Options for one target (the share address or the mount command).
///
/// An `OptionSet` built from operator configuration is a template: the
/// negotiation clones it and resolves requests against the copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionSet {
    allowed: BTreeSet<String>,
    forced: BTreeMap<String, String>,
    options: BTreeMap<String, String>,
    mandatory: Vec<String>,
    sloppy_switch: bool,
}

impl OptionSet {
    /// Create a set whose allow-list is the comma separated `allowed`.
    pub fn from_allowed(allowed: &str) -> Self {
        Self {
            allowed: parse::split_list(allowed).into_iter().collect(),
            ..Default::default()
        }
    }

    /// Create a set from an allow-list, a default list and mandatory keys.
    pub fn read_conf(allowed: &str, defaults: &str, mandatory: &[String]) -> Self {
        Self::from_allowed(allowed)
            .with_defaults(defaults)
            .with_mandatory(mandatory.iter().cloned())
    }

    /// Apply operator defaults.
    ///
    /// Allowed keys become overridable defaults, every other key is forced.
    pub fn with_defaults(mut self, defaults: &str) -> Self {
        for (key, value) in parse::parse_defaults(defaults) {
            if self.allowed.contains(&key) {
                self.forced.remove(&key);
                self.options.insert(key, value);
            } else {
                self.options.remove(&key);
                self.forced.insert(key, value);
            }
        }
        self
    }

    /// Replace the keys that must resolve before a request succeeds.
    pub fn with_mandatory<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Let requests set `sloppy_mount` without listing it in the allow-list.
    ///
    /// A forced `sloppy_mount` default still wins over the request.
    pub fn with_sloppy_switch(mut self) -> Self {
        self.sloppy_switch = true;
        self
    }

    pub fn allowed(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    pub fn forced(&self) -> &BTreeMap<String, String> {
        &self.forced
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn mandatory(&self) -> &[String] {
        &self.mandatory
    }

    /// Whether a request may set `key` on this set.
    pub fn accepts(&self, key: &str) -> bool {
        if self.allowed.contains(key) {
            return true;
        }
        key == SLOPPY_MOUNT && self.sloppy_switch && !self.forced.contains_key(SLOPPY_MOUNT)
    }

    /// Merge request options, returning the keys this set refused.
    pub fn parse_map(&mut self, entries: &RequestOptions, ignore: &[String]) -> Vec<String> {
        let mut rejected = Vec::new();

        for (key, value) in entries {
            if ignore.contains(key) {
                continue;
            }
            if !self.resolve(key, value) {
                rejected.push(key.clone());
            }
        }

        rejected
    }

    /// Merge the query parameters of a share address, returning the keys
    /// this set refused.
    pub fn parse_url(&mut self, url: &str, ignore: &[String]) -> Vec<String> {
        let mut rejected = Vec::new();
        let Some(query) = parse::split_share(url).1 else {
            return rejected;
        };

        for (key, value) in parse::query_pairs(query) {
            if ignore.iter().any(|k| k == key) {
                continue;
            }
            if !self.resolve(key, &OptionValue::from(value)) {
                rejected.push(key.to_string());
            }
        }

        rejected
    }

    /// Store `value` for an accepted key. Returns `false` if the key is
    /// refused. Values without an encoding are dropped and count as stored.
    fn resolve(&mut self, key: &str, value: &OptionValue) -> bool {
        let encoded = uniformize(key, value);
        if encoded.is_empty() {
            return true;
        }
        if !self.accepts(key) {
            return false;
        }
        self.options.insert(key.to_string(), encoded);
        true
    }

    /// Remove `sloppy_mount` from the set and report whether it was enabled.
    ///
    /// A forced value takes precedence over a resolved one. Values that are
    /// not booleans count as disabled.
    pub fn take_sloppy_mount(&mut self) -> bool {
        let from_options = self.options.remove(SLOPPY_MOUNT);
        let from_forced = self.forced.remove(SLOPPY_MOUNT);

        from_forced
            .or(from_options)
            .filter(|value| !value.is_empty())
            .and_then(|value| parse::parse_bool(&value))
            .unwrap_or(false)
    }

    /// Mandatory keys resolved neither by options nor by forced values.
    pub fn missing_mandatory(&self) -> Vec<String> {
        self.mandatory
            .iter()
            .filter(|key| !self.options.contains_key(*key) && !self.forced.contains_key(*key))
            .cloned()
            .collect()
    }

    /// Render the resolved values as `<prefix><key>[=<value>]` parameters.
    ///
    /// Boolean values render as a bare key when true and not at all when
    /// false. Values fitting a 16-bit signed integer are normalized. Anything
    /// else is passed through literally.
    pub fn make_params(&self, prefix: &str) -> Vec<String> {
        self.make_config()
            .into_iter()
            .filter(|(key, _)| key != SLOPPY_MOUNT)
            .filter_map(|(key, value)| {
                if let Some(flag) = parse::parse_bool(&value) {
                    return flag.then(|| format!("{}{}", prefix, key));
                }
                if let Some(number) = parse::parse_short_int(&value) {
                    return Some(format!("{}{}={}", prefix, key, number));
                }
                Some(format!("{}{}={}", prefix, key, value))
            })
            .collect()
    }

    /// All resolved values, forced values included.
    pub fn make_config(&self) -> BTreeMap<String, String> {
        let mut config = self.options.clone();
        config.extend(self.forced.iter().map(|(k, v)| (k.clone(), v.clone())));
        config
    }
}
