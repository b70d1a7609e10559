use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::convert::Infallible;
use std::time::Duration;

/// Default datastar client bundle referenced by the landing page.
pub const DEFAULT_DATASTAR_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/gh/starfederation/datastar@main/bundles/datastar.js";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 9001)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = parse_log_level,
        )]
    pub log_level: LevelFilter,

    /// Milliseconds between two events on a stream
    #[arg(long, env, default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_interval_ms: u64,

    /// Seconds that open streams get to finish on their own once shutdown begins
    #[arg(long, env, default_value_t = 5)]
    pub shutdown_grace_secs: u64,

    /// URL of the datastar client bundle the landing page loads
    #[arg(long, env, default_value = DEFAULT_DATASTAR_SCRIPT_URL)]
    datastar_script_url: String,
}

/// Accepts OFF, ERROR, WARN, INFO, DEBUG or TRACE in any case. Anything else
/// falls back to INFO rather than stopping the server from starting.
fn parse_log_level(value: &str) -> Result<LevelFilter, Infallible> {
    Ok(value.parse().unwrap_or(LevelFilter::Info))
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("0.0.0.0")
    }

    /// The `host:port` pair the server binds to.
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.interface(), self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn shutdown_grace_period(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn datastar_script_url(&self) -> &str {
        &self.datastar_script_url
    }

    pub fn set_datastar_script_url(mut self, url: String) -> Self {
        self.datastar_script_url = url;
        self
    }
}
