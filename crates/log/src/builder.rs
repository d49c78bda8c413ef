//! Logger builder implementation

use tracing::dispatcher::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{Config, Format, WriterConfig};
use crate::{Error, Result};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Builds the format layer with the shared display options applied.
macro_rules! fmt_layer {
    ($display:expr, $writer:expr, $($format:tt)+) => {{
        let layer = tracing_subscriber::fmt::layer()
            .with_writer($writer)
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source)
            .with_thread_ids($display.thread_ids)
            .$($format)+;
        let boxed: BoxedLayer = if $display.time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        };
        boxed
    }};
}

/// Logger builder
pub struct LoggerBuilder {
    config: Config,
    writer: Option<BoxMakeWriter>,
}

/// Guard that keeps a scoped logger installed
///
/// Loggers installed globally stay for the life of the process; a scoped
/// logger is removed when its guard drops.
#[must_use = "dropping the guard uninstalls a scoped logger"]
pub struct LoggerGuard {
    scope: Option<DefaultGuard>,
}

impl std::fmt::Debug for LoggerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerGuard")
            .field("scoped", &self.scope.is_some())
            .finish()
    }
}

impl LoggerBuilder {
    /// Create builder from config
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            writer: None,
        }
    }

    /// Sends output to `writer` instead of the configured stream.
    pub fn with_writer<W>(mut self, writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.writer = Some(BoxMakeWriter::new(writer));
        self
    }

    /// Installs the logger as the global default.
    ///
    /// # Errors
    ///
    /// Returns error if the filter cannot be parsed or a global subscriber
    /// is already installed.
    pub fn build(self) -> Result<LoggerGuard> {
        let (filter, layer) = self.layers()?;
        tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .try_init()
            .map_err(|e| Error::Init(e.to_string()))?;
        Ok(LoggerGuard { scope: None })
    }

    /// Installs the logger for the current thread until the guard drops.
    pub fn build_scoped(self) -> Result<LoggerGuard> {
        let (filter, layer) = self.layers()?;
        let guard = tracing_subscriber::registry()
            .with(layer)
            .with(filter)
            .set_default();
        Ok(LoggerGuard {
            scope: Some(guard),
        })
    }

    fn layers(self) -> Result<(EnvFilter, BoxedLayer)> {
        let filter = EnvFilter::try_new(&self.config.level).map_err(|e| Error::Filter {
            directive: self.config.level.clone(),
            reason: e.to_string(),
        })?;

        let writer = self.writer.unwrap_or_else(|| match self.config.writer {
            WriterConfig::Stderr => BoxMakeWriter::new(std::io::stderr),
            WriterConfig::Stdout => BoxMakeWriter::new(std::io::stdout),
        });

        let display = &self.config.display;
        let layer = match self.config.format {
            Format::Pretty => fmt_layer!(display, writer, pretty()),
            Format::Compact => fmt_layer!(display, writer, compact()),
            Format::Json => fmt_layer!(
                display,
                writer,
                json().with_current_span(true).flatten_event(display.flatten)
            ),
        };

        Ok((filter, layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_reported() {
        let config = Config {
            level: "formguard=notalevel".to_string(),
            ..Config::test()
        };
        let err = LoggerBuilder::from_config(config).build_scoped().unwrap_err();
        assert!(matches!(err, Error::Filter { ref directive, .. } if directive == "formguard=notalevel"));
    }

    #[test]
    fn test_every_format_builds_scoped() {
        for format in [Format::Pretty, Format::Compact, Format::Json] {
            let config = Config {
                format,
                ..Config::test()
            };
            let guard = LoggerBuilder::from_config(config).build_scoped();
            assert!(guard.is_ok(), "{format:?}");
        }
    }
}
