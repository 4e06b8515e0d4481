//! Server configuration

use serde::Deserialize;

/// Runtime configuration, defaults overridable through `GENESIS_*`
/// environment variables (e.g. `GENESIS_PORT=9090`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Default time-range window, in hours, when a request omits bounds
    pub default_window_hours: i64,
}

impl ServerConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .set_default("default_window_hours", 24_i64)?
            .add_source(config::Environment::with_prefix("GENESIS"))
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.default_window_hours, 24);
    }
}
