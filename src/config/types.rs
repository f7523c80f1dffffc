//! Configuration types.
//!
//! This module defines the CLI configuration surface: the `Config` struct
//! parsed by clap and the logging enums shared with the logger setup.

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use super::constants::{CACHE_TTL_SECS, CHECKER_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Log level for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable colored output
    Plain,
    /// One JSON object per line
    Json,
}

/// Application configuration, parsed from the command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "riskprobe", about = "Analyze URLs for phishing and trustworthiness risk")]
pub struct Config {
    /// URLs or hostnames to analyze
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Emit the full analysis report as JSON instead of the plain verdict block
    #[arg(long)]
    pub json: bool,

    /// Minimum log level to display
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// TTL for cached analysis results, in seconds
    #[arg(long, default_value_t = CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    /// Skip the ML scorer
    #[arg(long)]
    pub no_ml: bool,

    /// Per-checker network timeout, in seconds
    #[arg(long, default_value_t = CHECKER_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// User-Agent header for HTTP requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            urls: Vec::new(),
            json: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            cache_ttl_secs: CACHE_TTL_SECS,
            no_ml: false,
            timeout_seconds: CHECKER_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::Error);
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(LogLevel::Info), LevelFilter::Info);
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::Debug);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::Trace);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.urls.is_empty());
        assert!(!config.json);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.cache_ttl_secs, CACHE_TTL_SECS);
        assert_eq!(config.timeout_seconds, CHECKER_TIMEOUT_SECS);
        assert!(!config.no_ml);
    }

    #[test]
    fn test_parse_minimal_args() {
        let config = Config::try_parse_from(["riskprobe", "example.com"]).unwrap();
        assert_eq!(config.urls, vec!["example.com"]);
        assert!(!config.json);
    }

    #[test]
    fn test_parse_requires_url() {
        assert!(Config::try_parse_from(["riskprobe"]).is_err());
    }

    #[test]
    fn test_parse_flags() {
        let config = Config::try_parse_from([
            "riskprobe",
            "https://example.com/login",
            "--json",
            "--no-ml",
            "--cache-ttl-secs",
            "60",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(config.json);
        assert!(config.no_ml);
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.log_level, LogLevel::Debug);
    }
}
