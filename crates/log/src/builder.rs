//! Logger builder implementation

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::{LogError, LogResult};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard that keeps the logger's root span entered
///
/// Hold it for the lifetime of the process.
#[derive(Debug)]
pub struct LoggerGuard {
    _root_span: Option<tracing::span::EnteredSpan>,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Parse the filter directive without installing anything.
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            filter: self.config.level.clone(),
            reason: e.to_string(),
        })
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the filter string cannot be parsed
    /// - a global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        let display = &self.config.display;
        let registry = tracing_subscriber::registry().with(filter);

        let installed = match self.config.format {
            Format::Pretty => registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr)
                        .with_ansi(display.colors)
                        .with_target(display.target)
                        .with_file(display.source)
                        .with_line_number(display.source),
                )
                .try_init(),
            Format::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr)
                        .with_ansi(display.colors)
                        .with_target(display.target)
                        .with_file(display.source)
                        .with_line_number(display.source),
                )
                .try_init(),
            Format::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_current_span(true)
                        .with_span_list(display.span_list)
                        .flatten_event(display.flatten)
                        .with_target(display.target)
                        .with_file(display.source)
                        .with_line_number(display.source),
                )
                .try_init(),
        };
        installed.map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        let fields = &self.config.fields;
        let root_span = (!fields.is_empty()).then(|| {
            tracing::info_span!(
                "brig",
                service = fields.service.as_deref().unwrap_or(""),
                env = fields.env.as_deref().unwrap_or(""),
                version = fields.version.as_deref().unwrap_or("")
            )
            .entered()
        });

        Ok(LoggerGuard {
            _root_span: root_span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_is_rejected_before_install() {
        let builder = LoggerBuilder::from_config(Config {
            level: "brig=loud".to_string(),
            ..Config::default()
        });
        assert!(matches!(builder.filter(), Err(LogError::Filter { .. })));
    }

    #[test]
    fn valid_filter_parses() {
        let builder = LoggerBuilder::from_config(Config {
            level: "debug,kube=warn".to_string(),
            ..Config::default()
        });
        assert!(builder.filter().is_ok());
    }
}
