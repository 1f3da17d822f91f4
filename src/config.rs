use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::data::loader::LoadOptions;
use crate::data::model::SERIES_PREFIX;

/// Runtime settings.  Every flag falls back to an environment variable, and
/// a `.env` file in the working directory is read before parsing.
#[derive(Parser, Debug, Clone)]
#[command(name = "meter-corr")]
#[command(about = "Serve most-correlated-meter lookups over HTTP")]
pub struct Settings {
    /// Delimited meter table with a header row
    #[arg(long, env = "DATA_PATH", default_value = "static_data/LD2011_2014.csv")]
    pub data_path: PathBuf,

    /// Field delimiter (single ASCII character)
    #[arg(long, env = "CSV_DELIMITER", default_value = ";", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Decimal-point character of numeric fields
    #[arg(long, env = "CSV_DECIMAL", default_value_t = ',')]
    pub decimal: char,

    /// Header prefix that marks a column as a series
    #[arg(long, env = "SERIES_PREFIX", default_value = SERIES_PREFIX)]
    pub series_prefix: String,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Abort startup if loading and building take longer than this
    #[arg(long, env = "STARTUP_TIMEOUT_SECS")]
    pub startup_timeout_secs: Option<u64>,
}

impl Settings {
    /// Parse from the process arguments after loading `.env`.
    pub fn from_env_and_args() -> Self {
        dotenvy::dotenv().ok();
        Settings::parse()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter,
            decimal: self.decimal,
        }
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address {addr}: {e}"))
    }

    pub fn startup_timeout(&self) -> Option<Duration> {
        self.startup_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("delimiter must be one ASCII character, got '{s}'")),
    }
}
