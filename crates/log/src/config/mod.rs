//! Logger configuration types

mod presets;

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter directive (e.g., "info", "debug,kube=warn")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Display configuration
    pub display: DisplayConfig,

    /// Global fields attached to a root span
    pub fields: Fields,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            display: DisplayConfig::default(),
            fields: Fields::default(),
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable, multi-line
    Pretty,
    /// Compact single-line output
    Compact,
    /// Structured JSON output
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// What each line shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// ANSI colors
    pub colors: bool,
    /// Event target (module path)
    pub target: bool,
    /// Source file and line
    pub source: bool,
    /// Full span list in JSON output
    pub span_list: bool,
    /// Flatten event fields into the JSON root
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: true,
            target: true,
            source: false,
            span_list: false,
            flatten: false,
        }
    }
}

/// Global fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fields {
    /// Service name
    pub service: Option<String>,
    /// Environment (dev/staging/prod)
    pub env: Option<String>,
    /// Version
    pub version: Option<String>,
}

impl Fields {
    /// Read fields from `BRIG_SERVICE`, `BRIG_ENV` and `BRIG_VERSION`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            service: std::env::var("BRIG_SERVICE").ok(),
            env: std::env::var("BRIG_ENV").ok(),
            version: std::env::var("BRIG_VERSION")
                .ok()
                .or_else(|| option_env!("CARGO_PKG_VERSION").map(String::from)),
        }
    }

    /// Check if fields are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.env.is_none() && self.version.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("pretty", Format::Pretty)]
    #[case("JSON", Format::Json)]
    #[case("compact", Format::Compact)]
    fn format_parses(#[case] raw: &str, #[case] expected: Format) {
        assert_eq!(raw.parse::<Format>().unwrap(), expected);
    }

    #[test]
    fn format_rejects_unknown() {
        assert!("logfmt".parse::<Format>().is_err());
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: Config = serde_json::from_str(r#"{"format":"json"}"#).unwrap();
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.level, "info");
        assert!(config.fields.is_empty());
    }

    #[test]
    fn nested_display_keeps_unset_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"display":{"source":true,"colors":false}}"#).unwrap();
        assert_eq!(
            config.display,
            DisplayConfig {
                colors: false,
                source: true,
                ..DisplayConfig::default()
            }
        );
        assert_eq!(config.fields, Fields::default());
    }
}
