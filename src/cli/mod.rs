//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `start` (default) -- start the poll server
//! - `status` -- query a running instance for health info
//! - `config show|path` -- read configuration
//! - `version` -- print build/version info

use clap::{Parser, Subcommand};

use crate::config;

/// Live poll server with realtime vote tallies.
#[derive(Parser, Debug)]
#[command(
    name = "quickpoll",
    version = env!("CARGO_PKG_VERSION"),
    about = "quickpoll — create a poll, share the id, watch votes land live"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the poll server (default when no subcommand is given).
    Start {
        /// Listen port (overrides the config file and QUICKPOLL_PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Query a running instance for health information.
    Status {
        /// Port of the running instance (default: from config or 3000).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host of the running instance.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Read configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print version, build date, and git commit information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the fully loaded configuration as JSON.
    Show,

    /// Print the resolved configuration file path.
    Path,
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

/// Run the `status` subcommand.
pub fn handle_status(host: &str, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let port = match port {
        Some(port) => port,
        None => config::load_config()?.port,
    };
    let url = format!("http://{}:{}/health", host, port);

    let body: serde_json::Value = reqwest::blocking::get(&url)?.json()?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

/// Run the `config show` subcommand.
pub fn handle_config_show() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config()?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}

/// Run the `config path` subcommand.
pub fn handle_config_path() {
    println!("{}", config::get_config_path().display());
}

/// Run the `version` subcommand.
pub fn handle_version() {
    println!("quickpoll {}", env!("CARGO_PKG_VERSION"));
    println!("commit: {}", env!("QUICKPOLL_GIT_HASH"));
    println!("built:  {}", env!("QUICKPOLL_BUILD_DATE"));
}
