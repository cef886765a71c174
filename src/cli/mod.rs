//! Command-line interface.
//!
//! With no subcommand the binary starts the server. Other subcommands:
//! - `accounts` - List the built-in demo accounts
//! - `storage keys|get|reset` - Inspect or clear the local store
//! - `config check` - Validate the configuration file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::auth::DEMO_ACCOUNTS;
use crate::config::Config;
use crate::storage::LocalStore;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "clinic-portal")]
#[command(author, version, about = "Clinic management demo with admin, doctor and patient dashboards", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "CLINIC_CONFIG", default_value = "clinic.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// List the built-in demo accounts
    Accounts,

    /// Local store commands
    #[command(subcommand)]
    Storage(StorageCommands),

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum StorageCommands {
    /// List stored keys
    Keys,
    /// Print the raw value stored under a key
    Get {
        key: String,
    },
    /// Remove every stored key (session, sign-ups, appointments, prescriptions)
    Reset {
        /// Actually delete (without this flag, just shows what would be removed)
        #[arg(long)]
        execute: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

impl Cli {
    /// True when the server should start.
    pub fn is_serve(&self) -> bool {
        matches!(self.command, None | Some(Commands::Serve))
    }
}

/// Run a non-server CLI command
pub async fn run_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Accounts) => cmd_accounts(cli),
        Some(Commands::Storage(StorageCommands::Keys)) => cmd_storage_keys(cli).await,
        Some(Commands::Storage(StorageCommands::Get { key })) => cmd_storage_get(cli, key).await,
        Some(Commands::Storage(StorageCommands::Reset { execute })) => cmd_storage_reset(cli, *execute).await,
        Some(Commands::Config(ConfigCommands::Check)) => cmd_config_check(cli),
        // Serving is handled in main.rs
        None | Some(Commands::Serve) => Ok(()),
    }
}

async fn open_store(cli: &Cli) -> Result<LocalStore> {
    let config = Config::load(&cli.config)?;
    LocalStore::open(&config.server.data_dir)
        .await
        .with_context(|| format!("Failed to open local store in {}", config.server.data_dir.display()))
}

fn cmd_accounts(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    if !config.auth.demo_accounts_enabled {
        println!("Built-in demo accounts are disabled (auth.demo_accounts_enabled = false)");
        return Ok(());
    }

    println!("{:<8} {:<20} {:<12} NAME", "ROLE", "EMAIL", "PASSWORD");
    for account in DEMO_ACCOUNTS.iter() {
        println!(
            "{:<8} {:<20} {:<12} {}",
            account.role.as_str(), account.email, account.password, account.full_name
        );
    }
    Ok(())
}

async fn cmd_storage_keys(cli: &Cli) -> Result<()> {
    let store = open_store(cli).await?;
    let keys = store.keys().await?;

    if keys.is_empty() {
        println!("Local store is empty");
    } else {
        for key in keys {
            println!("{}", key);
        }
    }
    Ok(())
}

async fn cmd_storage_get(cli: &Cli, key: &str) -> Result<()> {
    let store = open_store(cli).await?;
    match store.get_item(key).await? {
        Some(value) => {
            // Pretty-print JSON values, fall back to raw text
            match serde_json::from_str::<serde_json::Value>(&value) {
                Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
                Err(_) => println!("{}", value),
            }
            Ok(())
        }
        None => anyhow::bail!("No value stored under '{}'", key),
    }
}

async fn cmd_storage_reset(cli: &Cli, execute: bool) -> Result<()> {
    let store = open_store(cli).await?;
    let keys = store.keys().await?;

    if keys.is_empty() {
        println!("Local store is already empty");
        return Ok(());
    }

    if !execute {
        println!("Would remove {} key(s):", keys.len());
        for key in &keys {
            println!("  {}", key);
        }
        println!();
        println!("Run with --execute to delete them.");
        return Ok(());
    }

    let removed = store.clear().await?;
    println!("[OK] Removed {} key(s)", removed);
    Ok(())
}

fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!("[!!] Configuration file not found: {}", config_path.display());
        println!();
        println!("The default configuration will be used when starting the server.");
        return Ok(());
    }

    let config = Config::load(config_path)?;
    let enabled = |on: bool| if on { "Enabled" } else { "Disabled" };

    println!("[OK] Configuration file is valid!");
    println!();
    println!("Server:");
    println!("  Host:          {}", config.server.host);
    println!("  Port:          {}", config.server.port);
    println!("  Data Dir:      {}", config.server.data_dir.display());
    println!();
    println!("Auth:");
    println!("  Demo Accounts: {}", enabled(config.auth.demo_accounts_enabled));
    println!("  Min Password:  {} characters", config.auth.min_password_length);
    println!();
    println!("Storage:");
    println!("  Demo Data:     {}", enabled(config.storage.seed_demo_data));
    println!();
    println!("Billing:");
    println!("  Currency:      {}", config.billing.currency);
    println!();
    println!("Logging:");
    println!("  Level:         {}", config.logging.level);

    Ok(())
}
