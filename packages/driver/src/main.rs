use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nfsv3_driver::{CommandInvoker, DriverConfig, Mounter, NfsV3Mounter, Result};
use nfsv3_options::RequestOptions;

/// nfsv3driver - mount NFSv3 shares with negotiated fuse-nfs options
#[derive(Parser, Debug)]
#[command(name = "nfsv3driver")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma separated parameters callers may set in the share url
    #[arg(long = "allowed-in-source")]
    allowed_in_source: Option<String>,

    /// Comma separated `param:value` defaults for the share url. Defaults for
    /// parameters missing from the allowed list are forced
    #[arg(long = "default-in-source")]
    default_in_source: Option<String>,

    /// Comma separated parameters callers may pass to the mount helper
    #[arg(long = "allowed-in-mount")]
    allowed_in_mount: Option<String>,

    /// Comma separated `param:value` defaults for the mount helper
    #[arg(long = "default-in-mount")]
    default_in_mount: Option<String>,

    /// Share url parameters every mount must resolve
    #[arg(long = "mandatory-in-source", value_delimiter = ',')]
    mandatory_in_source: Option<Vec<String>>,

    /// Mount helper parameters every mount must resolve
    #[arg(long = "mandatory-in-mount", value_delimiter = ',')]
    mandatory_in_mount: Option<Vec<String>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the mount command a request would run, without running it
    Negotiate {
        #[arg(long)]
        share: String,
        #[arg(long, default_value = "/mnt")]
        target: String,
        /// Request options as a JSON object
        #[arg(long, default_value = "{}")]
        options: String,
    },
    /// Mount a share
    Mount {
        #[arg(long)]
        share: String,
        #[arg(long)]
        target: String,
        /// Request options as a JSON object
        #[arg(long, default_value = "{}")]
        options: String,
    },
    /// Unmount a target
    Unmount {
        #[arg(long)]
        target: String,
    },
    /// Exit successfully only if the mount point is mounted
    Check {
        #[arg(long)]
        mount_point: String,
        #[arg(long, default_value = "volume")]
        name: String,
    },
}

fn load_config(args: &Args) -> Result<DriverConfig> {
    let mut config = match &args.config {
        Some(path) => DriverConfig::load(path)?,
        None => DriverConfig::default(),
    };

    if let Some(allowed) = &args.allowed_in_source {
        config.source.allowed = allowed.clone();
    }
    if let Some(defaults) = &args.default_in_source {
        config.source.defaults = defaults.clone();
    }
    if let Some(allowed) = &args.allowed_in_mount {
        config.mount.allowed = allowed.clone();
    }
    if let Some(defaults) = &args.default_in_mount {
        config.mount.defaults = defaults.clone();
    }
    if let Some(mandatory) = &args.mandatory_in_source {
        config.source.mandatory = mandatory.clone();
    }
    if let Some(mandatory) = &args.mandatory_in_mount {
        config.mount.mandatory = mandatory.clone();
    }

    Ok(config)
}

async fn run(args: Args) -> Result<bool> {
    let config = load_config(&args)?;
    let mounter = NfsV3Mounter::from_config(CommandInvoker::new(), &config);

    match args.command {
        Command::Negotiate {
            share,
            target,
            options,
        } => {
            let options: RequestOptions = serde_json::from_str(&options)?;
            let mount_args = mounter.mount_args(&share, &target, &options)?;
            println!("{} {}", mounter.helpers().mount, mount_args.join(" "));
            Ok(true)
        }
        Command::Mount {
            share,
            target,
            options,
        } => {
            let options: RequestOptions = serde_json::from_str(&options)?;
            mounter.mount(&share, &target, &options).await?;
            log::info!("mounted {} on {}", share, target);
            Ok(true)
        }
        Command::Unmount { target } => {
            mounter.unmount(&target).await?;
            log::info!("unmounted {}", target);
            Ok(true)
        }
        Command::Check { mount_point, name } => Ok(mounter.check(&name, &mount_point).await),
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
