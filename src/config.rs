//! Layered configuration: TOML file, environment, then CLI flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Runtime settings for the crawler. Every field has a serde default so a
/// partial TOML file only overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Proxy for all HTTP traffic (e.g., socks5://host:port).
    #[serde(default)]
    pub proxy: Option<String>,

    /// Base pause before each HTTP request, in milliseconds.
    #[serde(default = "defaults::delay_ms")]
    pub delay_ms: u64,

    /// Upper bound of the random jitter added to the request pause.
    #[serde(default = "defaults::delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Pause between search-term attempts for one product.
    #[serde(default = "defaults::term_delay_ms")]
    pub term_delay_ms: u64,

    /// Pause between products during a batch scrape.
    #[serde(default = "defaults::scrape_delay_ms")]
    pub scrape_delay_ms: u64,

    /// Cap on products per scrape run; 0 scrapes everything.
    #[serde(default)]
    pub limit: usize,

    /// Input spreadsheet with ID, EAN and Name columns.
    #[serde(default = "defaults::input_path")]
    pub input_path: PathBuf,

    /// Output spreadsheet refreshed after import and scrape runs.
    #[serde(default = "defaults::output_path")]
    pub output_path: PathBuf,

    /// JSON file holding the product records.
    #[serde(default = "defaults::store_path")]
    pub store_path: PathBuf,

    /// Console output format.
    #[serde(default)]
    pub format: OutputFormat,
}

mod defaults {
    use std::path::PathBuf;

    pub fn delay_ms() -> u64 {
        2000
    }

    pub fn delay_jitter_ms() -> u64 {
        3000
    }

    pub fn term_delay_ms() -> u64 {
        500
    }

    pub fn scrape_delay_ms() -> u64 {
        500
    }

    pub fn input_path() -> PathBuf {
        PathBuf::from("data/input/products.csv")
    }

    pub fn output_path() -> PathBuf {
        PathBuf::from("data/output/products_worten.csv")
    }

    pub fn store_path() -> PathBuf {
        PathBuf::from("data/products.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy: None,
            delay_ms: defaults::delay_ms(),
            delay_jitter_ms: defaults::delay_jitter_ms(),
            term_delay_ms: defaults::term_delay_ms(),
            scrape_delay_ms: defaults::scrape_delay_ms(),
            limit: 0,
            input_path: defaults::input_path(),
            output_path: defaults::output_path(),
            store_path: defaults::store_path(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses one TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolves the config: an explicit path must exist and parse; otherwise
    /// the first of ./config.toml and the XDG location that exists wins, and
    /// defaults apply when neither does.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let mut candidates = vec![PathBuf::from("config.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("worten-crawler").join("config.toml"));
        }

        for candidate in candidates {
            if candidate.exists() {
                debug!("Using config at {}", candidate.display());
                return Self::from_file(candidate);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Folds in environment overrides. Unset variables leave the current
    /// value alone; a malformed delay is ignored rather than fatal.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("WORTEN_PROXY") {
            self.proxy = Some(proxy);
        }
        if let Some(delay) = env_u64("WORTEN_DELAY") {
            self.delay_ms = delay;
        }
        self
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.parse().ok()
}

/// Console output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: table, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.proxy.is_none());
        assert_eq!(config.delay_ms, 2000);
        assert_eq!(config.delay_jitter_ms, 3000);
        assert_eq!(config.term_delay_ms, 500);
        assert_eq!(config.scrape_delay_ms, 500);
        assert_eq!(config.limit, 0);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.input_path, PathBuf::from("data/input/products.csv"));
        assert_eq!(config.store_path, PathBuf::from("data/products.json"));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            delay_ms = 3000
            limit = 25
            input_path = "in.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.delay_ms, 3000);
        assert_eq!(config.limit, 25);
        assert_eq!(config.input_path, PathBuf::from("in.csv"));
        assert_eq!(config.scrape_delay_ms, 500);
        assert_eq!(config.output_path, PathBuf::from("data/output/products_worten.csv"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "proxy = \"socks5://localhost:1080\"").unwrap();
        writeln!(file, "delay_ms = 4000").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.proxy.as_deref(), Some("socks5://localhost:1080"));
        assert_eq!(config.delay_ms, 4000);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/config.toml").unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_from_file_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "delay_ms = [[[").unwrap();

        let err = Config::from_file(file.path()).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_explicit_path_wins() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "limit = 7").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.limit, 7);
    }

    // One test covers both env vars and the malformed-delay case so nothing
    // else races on the same process environment.
    #[test]
    fn test_env_overrides() {
        let saved: Vec<_> = ["WORTEN_PROXY", "WORTEN_DELAY"]
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();

        std::env::set_var("WORTEN_PROXY", "http://proxy:8080");
        std::env::set_var("WORTEN_DELAY", "5000");
        let config = Config::new().with_env();
        assert_eq!(config.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(config.delay_ms, 5000);

        std::env::set_var("WORTEN_DELAY", "not_a_number");
        let config = Config::new().with_env();
        assert_eq!(config.delay_ms, 2000);

        for (name, value) in saved {
            match value {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = Config {
            proxy: Some("socks5://localhost:1080".to_string()),
            delay_ms: 3000,
            limit: 50,
            format: OutputFormat::Json,
            store_path: PathBuf::from("c.json"),
            ..Config::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.proxy, config.proxy);
        assert_eq!(parsed.delay_ms, config.delay_ms);
        assert_eq!(parsed.limit, config.limit);
        assert_eq!(parsed.format, config.format);
        assert_eq!(parsed.store_path, config.store_path);
    }
}
