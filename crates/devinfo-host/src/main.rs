//! Device info host
//!
//! Stands in for the scripting host: boots the module registry, calls one
//! bridge method and prints what it settled with as JSON.
//!
//! Usage: `devinfo-host [--config <path>] [<module> <method> [<json-args>]]`
//!
//! Defaults to `DeviceInfoModule getDeviceInfo`. Exits with status 1 when the
//! call is rejected.

use anyhow::{Context, Result, bail};
use devinfo_bridge::{
    AppContext, BridgeError, DeviceInfoModule, DeviceInfoPackage, Host, ModuleRegistry, Package,
};
use devinfo_config::{DevInfoConfig, default_config_paths};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

/// Parsed command line
#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    module: String,
    method: String,
    params: Value,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut config = None;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-c" | "--config" => {
                    let path = args.next().context("--config requires a path")?;
                    config = Some(PathBuf::from(path));
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let module = positional
            .next()
            .unwrap_or_else(|| DeviceInfoModule::NAME.to_string());
        let method = positional
            .next()
            .unwrap_or_else(|| DeviceInfoModule::GET_DEVICE_INFO.to_string());
        let params = match positional.next() {
            Some(raw) => serde_json::from_str(&raw).context("arguments must be valid JSON")?,
            None => Value::Null,
        };
        if let Some(extra) = positional.next() {
            bail!("unexpected argument: {}", extra);
        }

        Ok(Self {
            config,
            module,
            method,
            params,
        })
    }
}

/// Packages the host exposes, in registration order
fn packages() -> Vec<Box<dyn Package>> {
    vec![Box::new(DeviceInfoPackage)]
}

/// Load the explicit config file, or the first default candidate.
///
/// The returned path is `None` when defaults were used. Nothing is logged
/// here since the subscriber depends on the loaded level.
fn load_config(
    explicit: Option<&Path>,
    candidates: &[PathBuf],
) -> Result<(DevInfoConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let config = DevInfoConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        return Ok((config, Some(path.to_path_buf())));
    }

    Ok(match DevInfoConfig::load_first(candidates)? {
        Some((config, path)) => (config, Some(path)),
        None => (DevInfoConfig::default(), None),
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse(std::env::args().skip(1))?;

    let (config, source) = load_config(args.config.as_deref(), &default_config_paths())?;

    setup_logging(&config.logging.level);
    match &source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => warn!("No configuration file found, using defaults"),
    }
    debug!("Using configuration: {:?}", config);

    let provider = config
        .provider
        .build_provider()
        .context("failed to create system info provider")?;
    let ctx = AppContext::new(provider);

    let registry = ModuleRegistry::builder()
        .add_packages(packages())
        .build(&ctx)
        .context("failed to build module registry")?;
    info!("Registered modules: {}", registry.names().join(", "));

    let host = Host::new(registry);
    match host.call(&args.module, &args.method, args.params).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(BridgeError::Rejected(rejection)) => {
            println!("{}", serde_json::to_string_pretty(&rejection)?);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

/// Configure tracing subscriber, `RUST_LOG` wins over the config level
fn setup_logging(default_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
