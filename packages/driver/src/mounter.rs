//! Mount, unmount and health check of NFSv3 volumes through fuse-nfs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nfsv3_options::{NegotiationConfig, RequestOptions};

use crate::config::{DriverConfig, HelperCommands};
use crate::error::Result;
use crate::invoker::{InvokeContext, Invoker};

/// Operations the volume driver needs from a filesystem-specific mounter.
#[async_trait]
pub trait Mounter: Send + Sync {
    /// Mount `share` on `target` using the caller's `options`.
    async fn mount(&self, share: &str, target: &str, options: &RequestOptions) -> Result<()>;

    /// Unmount `target`.
    async fn unmount(&self, target: &str) -> Result<()>;

    /// Whether `mount_point` is currently mounted. Never fails.
    async fn check(&self, name: &str, mount_point: &str) -> bool;
}

/// [`Mounter`] negotiating options before running the fuse-nfs helpers.
pub struct NfsV3Mounter<I> {
    invoker: I,
    config: Arc<NegotiationConfig>,
    helpers: HelperCommands,
    ignore: Vec<String>,
    check_timeout: Duration,
}

impl<I: Invoker> NfsV3Mounter<I> {
    pub fn new(invoker: I, config: Arc<NegotiationConfig>) -> Self {
        let defaults = DriverConfig::default();
        let check_timeout = defaults.check_timeout();
        Self {
            invoker,
            config,
            helpers: defaults.helpers,
            ignore: defaults.ignore,
            check_timeout,
        }
    }

    pub fn from_config(invoker: I, config: &DriverConfig) -> Self {
        Self {
            invoker,
            config: Arc::new(config.negotiation_config()),
            helpers: config.helpers.clone(),
            ignore: config.ignore.clone(),
            check_timeout: config.check_timeout(),
        }
    }

    pub fn helpers(&self) -> &HelperCommands {
        &self.helpers
    }

    /// Negotiate `options` and build the mount helper arguments.
    ///
    /// The helper receives `-a` when no mount option resolved.
    pub fn mount_args(
        &self,
        share: &str,
        target: &str,
        options: &RequestOptions,
    ) -> Result<Vec<String>> {
        let negotiation = self
            .config
            .negotiate(share, options, &self.ignore)
            .inspect_err(|e| log::warn!("rejected mount of {} on {}: {}", share, target, e))?;

        let mut args = vec![
            "-n".to_string(),
            negotiation.rendered_share(share),
            "-m".to_string(),
            target.to_string(),
        ];

        let mount_args = negotiation.rendered_mount_args();
        if mount_args.is_empty() {
            args.push("-a".to_string());
        } else {
            args.extend(mount_args);
        }

        Ok(args)
    }
}

#[async_trait]
impl<I: Invoker> Mounter for NfsV3Mounter<I> {
    async fn mount(&self, share: &str, target: &str, options: &RequestOptions) -> Result<()> {
        let args = self.mount_args(share, target, options)?;
        log::debug!("exec-mount: {} {}", self.helpers.mount, args.join(" "));

        self.invoker
            .invoke(&InvokeContext::background(), &self.helpers.mount, &args)
            .await?;
        Ok(())
    }

    async fn unmount(&self, target: &str) -> Result<()> {
        let args = vec!["-u".to_string(), target.to_string()];
        log::debug!("exec-unmount: {} {}", self.helpers.unmount, args.join(" "));

        self.invoker
            .invoke(&InvokeContext::background(), &self.helpers.unmount, &args)
            .await?;
        Ok(())
    }

    async fn check(&self, name: &str, mount_point: &str) -> bool {
        let context = InvokeContext::with_timeout(self.check_timeout);
        let args = vec!["-q".to_string(), mount_point.to_string()];

        match self.invoker.invoke(&context, &self.helpers.check, &args).await {
            Ok(_) => true,
            Err(e) => {
                log::info!("unable to verify volume {} ({})", name, e);
                false
            }
        }
    }
}
