//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Fields, Format};

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("BRIG_LOG") {
            config.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            config.level = level;
        }

        if let Ok(format) = std::env::var("BRIG_LOG_FORMAT") {
            config.format = format.parse().unwrap_or(Format::Compact);
        }

        config.fields = Fields::from_env();
        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug,kube=info,hyper=info".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            fields: Fields::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_is_json_without_colors() {
        let config = Config::production();
        assert_eq!(config.format, Format::Json);
        assert!(!config.display.colors);
        assert!(config.display.flatten);
    }

    #[test]
    fn development_is_pretty_with_source() {
        let config = Config::development();
        assert_eq!(config.format, Format::Pretty);
        assert!(config.display.source);
        assert!(config.level.starts_with("debug"));
    }
}
