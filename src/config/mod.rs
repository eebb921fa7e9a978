// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LogLevel};
use types::{HealthConfig, HttpConfig, LedgerConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    /// Environment variables prefixed with `LEDGER` override file values
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("LEDGER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Builder pre-populated with every default
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "ledger-server")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("health.enabled", true)?
            .set_default("health.path", "/healthz")?
            .set_default("ledger.calendar_timezone", "local")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

impl Default for Config {
    /// Built-in defaults only, no file or environment lookup
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            logging: LoggingConfig {
                level: LogLevel::Info,
                access_log: true,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig {
                server_name: "ledger-server".to_string(),
                max_body_size: 1_048_576,
            },
            health: HealthConfig {
                enabled: true,
                path: "/healthz".to_string(),
            },
            ledger: LedgerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CalendarZone;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/ledger").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.logging.level, LogLevel::Info);
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert_eq!(cfg.ledger.calendar_timezone, CalendarZone::Local);
        assert!(cfg.performance.max_connections.is_none());
        assert!(cfg.health.enabled);
    }

    #[test]
    fn test_default_matches_loaded_defaults() {
        let loaded = Config::load_from("does-not-exist/ledger").unwrap();
        let built = Config::default();
        assert_eq!(loaded.server.port, built.server.port);
        assert_eq!(loaded.health.path, built.health.path);
        assert_eq!(loaded.http.server_name, built.http.server_name);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }
}
