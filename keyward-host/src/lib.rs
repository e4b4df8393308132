//! Reference host for Keyward.
//!
//! Wires the license manager, update checker and scheduler to a SQLite
//! option store and a `reqwest` transport, and exposes them as commands.
//! Everything the commands print is returned as a string so that `main`
//! owns stdout.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use keyward_license::{
    IntervalScheduler, LicenseError, LicenseManager, ReqwestTransport, SiteIdentifier,
    UpdateChecker,
};
use keyward_store::{ConfigStore, LicenseStateStore, SqliteStore};
use keyward_types::{ProductInfo, ServerConfig};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "keyward")]
#[command(about = "Activate, check and keep a product license up to date")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Path to the license state database
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// URL of this installation (defaults to an identifier derived from this machine)
    #[arg(long, global = true)]
    pub site_url: Option<String>,

    /// Display name of the licensed product
    #[arg(long, global = true, default_value = "Licensed Product")]
    pub product_name: String,

    /// Slug the update system knows the product by
    #[arg(long, global = true, default_value = "licensed-product")]
    pub product_slug: String,

    /// Installed product version
    #[arg(long, global = true, default_value = env!("CARGO_PKG_VERSION"))]
    pub product_version: String,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Set the license server URL and product id
    Configure {
        #[arg(long)]
        server_url: String,
        #[arg(long)]
        product_id: u64,
    },
    /// Activate a license key (the stored key if none is given)
    Activate { key: Option<String> },
    /// Deactivate the stored license key
    Deactivate,
    /// Re-validate the stored license key now
    Revalidate,
    /// Show the stored license state without contacting the server
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Ask the server whether an update is available
    CheckUpdate {
        /// Version to check from (defaults to the installed version)
        #[arg(long)]
        version: Option<String>,
    },
    /// Show details of the available release
    ReleaseInfo {
        #[arg(long)]
        version: Option<String>,
    },
    /// Validate the stored key and keep re-validating it daily until interrupted
    Run,
    /// Release the stored key's activation before removing the product
    Uninstall,
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// The license core wired to this process's collaborators.
pub struct Host {
    manager: Arc<LicenseManager>,
    updates: UpdateChecker,
}

impl Host {
    /// Builds the license core on top of `store`.
    pub fn new(store: Arc<dyn ConfigStore>, opts: &GlobalOpts) -> Result<Self> {
        let site = match &opts.site_url {
            Some(url) => SiteIdentifier::from_url(url)?,
            None => SiteIdentifier::for_this_device(),
        };
        let transport = ReqwestTransport::new()?;
        let manager = match LicenseManager::from_store(store, Arc::new(transport), site) {
            Ok(manager) => Arc::new(manager),
            Err(LicenseError::Config(msg)) => bail!(
                "{msg}; run `keyward configure --server-url <URL> --product-id <ID>` first"
            ),
            Err(e) => return Err(e.into()),
        };
        let updates = UpdateChecker::new(Arc::clone(&manager), product_info(opts));
        Ok(Self { manager, updates })
    }

    pub fn manager(&self) -> &Arc<LicenseManager> {
        &self.manager
    }

    pub fn updates(&self) -> &UpdateChecker {
        &self.updates
    }
}

/// Stored license state as shown by `status`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub key: Option<String>,
    pub status: String,
    pub message: String,
    pub expires_at: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
    pub needs_attention: bool,
}

pub fn product_info(opts: &GlobalOpts) -> ProductInfo {
    ProductInfo {
        name: opts.product_name.clone(),
        slug: opts.product_slug.clone(),
        version: opts.product_version.clone(),
    }
}

/// Opens the option store, creating its directory if needed.
pub fn open_store(opts: &GlobalOpts) -> Result<SqliteStore> {
    let path = match &opts.store {
        Some(path) => path.clone(),
        None => dirs::data_dir()
            .map(|dir| dir.join("keyward").join("state.db"))
            .unwrap_or_else(|| PathBuf::from("keyward-state.db")),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    SqliteStore::open(&path).with_context(|| format!("failed to open {}", path.display()))
}

/// Runs one command and returns what it has to say.
pub async fn run(cli: Cli) -> Result<String> {
    let store: Arc<dyn ConfigStore> = Arc::new(open_store(&cli.global)?);
    match cli.command {
        Command::Configure {
            server_url,
            product_id,
        } => configure(store, &server_url, product_id),
        Command::Status { json } => status(&LicenseStateStore::new(store), json),
        command => {
            let host = Host::new(store, &cli.global)?;
            execute(&host, command).await
        }
    }
}

fn configure(store: Arc<dyn ConfigStore>, server_url: &str, product_id: u64) -> Result<String> {
    let config = ServerConfig::new(server_url.trim(), product_id)?;
    LicenseStateStore::new(store).set_server_config(&config)?;
    info!("license server set to {} (product {})", config.server_url, config.product_id);
    Ok(format!(
        "License server: {}\nProduct ID: {}",
        config.server_url, config.product_id
    ))
}

async fn execute(host: &Host, command: Command) -> Result<String> {
    let manager = host.manager();
    match command {
        Command::Configure { .. } | Command::Status { .. } => {
            bail!("command does not need a license host")
        }
        Command::Activate { key } => {
            let key = match key.filter(|k| !k.trim().is_empty()) {
                Some(key) => key,
                None => manager.record()?.key,
            };
            match manager.activate(&key).await {
                Ok(outcome) if outcome.valid => Ok("License activated successfully!".to_string()),
                Ok(outcome) => bail!("{}", outcome.message),
                Err(LicenseError::EmptyKey) => bail!(
                    "Please enter a license key, or store one first with `keyward activate <KEY>`."
                ),
                Err(e) => Err(e.into()),
            }
        }
        Command::Deactivate => {
            let key = manager.record()?.key;
            let result = manager.deactivate(&key).await?;
            if result.success {
                Ok("License deactivated successfully!".to_string())
            } else {
                bail!("{}", result.message)
            }
        }
        Command::Revalidate => match manager.revalidate().await? {
            Some(outcome) => Ok(format!("{}: {}", outcome.status, outcome.message)),
            None => Ok("No license key stored.".to_string()),
        },
        Command::CheckUpdate { version } => {
            let current = version.unwrap_or_else(|| host.updates().product().version.clone());
            let offer = host.updates().evaluate(&current).await;
            if offer.available {
                Ok(format!(
                    "Update available: {} -> {}\nDownload: {}",
                    current, offer.version, offer.download_url
                ))
            } else {
                Ok(format!("No update available for {current}."))
            }
        }
        Command::ReleaseInfo { version } => {
            let current = version.unwrap_or_else(|| host.updates().product().version.clone());
            match host.updates().release_details(&current).await {
                Some(details) => Ok(format!(
                    "{} {}\nDownload: {}\n\n{}",
                    details.name, details.version, details.download_link, details.changelog
                )),
                None => Ok(format!("No release newer than {current} is available.")),
            }
        }
        Command::Run => {
            let scheduler = IntervalScheduler::new();
            manager.schedule_revalidation(&scheduler);
            info!("license revalidation running, press Ctrl-C to stop");
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for shutdown signal")?;
            Ok(format!("Stopped. License status: {}", manager.status()))
        }
        Command::Uninstall => match manager.on_install_deactivated().await? {
            Some(result) if result.success => Ok("License released.".to_string()),
            Some(result) => bail!("{}", result.message),
            None => Ok("No license key stored.".to_string()),
        },
    }
}

/// Reads the stored record only, so it works offline and with a broken
/// server configuration.
fn status(state: &LicenseStateStore, json: bool) -> Result<String> {
    let report = status_report(state)?;
    if json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(render_status(&report))
    }
}

fn status_report(state: &LicenseStateStore) -> Result<StatusReport> {
    let record = state.load()?;
    Ok(StatusReport {
        key: record.has_key().then(|| record.masked_key()),
        status: record.status.to_string(),
        message: record.message.clone(),
        expires_at: record
            .expiry_date()
            .map(|d| d.to_string())
            .or(record.expires_at.clone()),
        last_checked: record.last_checked,
        needs_attention: !record.status.is_active(),
    })
}

fn render_status(report: &StatusReport) -> String {
    let mut lines = vec![
        format!("Status:  {}", report.status),
        format!("Key:     {}", report.key.as_deref().unwrap_or("(none)")),
    ];
    if !report.message.is_empty() {
        lines.push(format!("Message: {}", report.message));
    }
    if let Some(expires) = &report.expires_at {
        lines.push(format!("Expires: {expires}"));
    }
    if let Some(checked) = report.last_checked {
        lines.push(format!("Checked: {}", checked.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if report.needs_attention {
        lines.push("Your license is not active. Activate it to receive automatic updates.".into());
    }
    lines.join("\n")
}
