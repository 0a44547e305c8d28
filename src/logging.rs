//! Logging setup: `tracing-subscriber` with pluggable suppression rules.
//!
//! Noisy third-party events are dropped by a `LogFilter` attached to the
//! output layer rather than by patching a global sink. The writer is
//! injectable so tests and embedders can capture output.

use crate::error::SdkError;

use std::fmt;
use std::sync::Arc;
use tracing::{Metadata, Subscriber};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

pub type Suppressor = Arc<dyn Fn(&Metadata<'_>) -> bool + Send + Sync>;

/// A set of predicates; an event matching any of them is dropped.
#[derive(Clone, Default)]
pub struct LogFilter {
    suppressors: Vec<Suppressor>,
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppress(mut self, predicate: impl Fn(&Metadata<'_>) -> bool + Send + Sync + 'static) -> Self {
        self.suppressors.push(Arc::new(predicate));
        self
    }

    /// Drop everything whose target starts with `prefix`.
    pub fn suppress_target(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.suppress(move |meta| meta.target().starts_with(&prefix))
    }

    pub fn allows(&self, meta: &Metadata<'_>) -> bool {
        !self.suppressors.iter().any(|s| s(meta))
    }

    pub fn len(&self) -> usize {
        self.suppressors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppressors.is_empty()
    }
}

impl fmt::Debug for LogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFilter")
            .field("suppressors", &self.suppressors.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `"info,towerview_client=debug"`.
    pub directives: String,
    pub filter: LogFilter,
    pub with_target: bool,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directives: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            filter: LogFilter::default(),
            with_target: true,
            ansi: false,
        }
    }
}

/// The fmt output layer with `config.filter` applied, writing to `writer`.
pub fn layer<S, W>(config: &LogConfig, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = config.filter.clone();
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .with_filter(filter_fn(move |meta| filter.allows(meta)))
}

/// Install the global subscriber, writing to stderr.
pub fn init_logging(config: LogConfig) -> Result<(), SdkError> {
    let env_filter =
        EnvFilter::try_new(&config.directives).map_err(|e| SdkError::Logging(e.to_string()))?;
    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer(&config, std::io::stderr))
        .try_init()
        .map_err(|e| SdkError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    #[test]
    fn test_filter_suppresses_matching_targets() {
        let capture = Capture::default();
        let sink = capture.clone();
        let config = LogConfig {
            directives: "trace".into(),
            filter: LogFilter::new().suppress_target("chart_lib"),
            with_target: true,
            ansi: false,
        };
        let subscriber = tracing_subscriber::registry().with(layer(&config, move || sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "chart_lib::axis", "defaultProps will be removed");
            tracing::error!(target: "towerview_client::binding", "query failed");
        });

        let out = capture.text();
        assert!(out.contains("query failed"));
        assert!(!out.contains("defaultProps"));
    }

    #[test]
    fn test_custom_predicate_by_level() {
        let filter = LogFilter::new().suppress(|meta| *meta.level() == tracing::Level::DEBUG);
        assert_eq!(filter.len(), 1);

        let capture = Capture::default();
        let sink = capture.clone();
        let config = LogConfig {
            directives: "trace".into(),
            filter,
            with_target: false,
            ansi: false,
        };
        let subscriber = tracing_subscriber::registry().with(layer(&config, move || sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("chatty");
            tracing::info!("useful");
        });

        let out = capture.text();
        assert!(out.contains("useful"));
        assert!(!out.contains("chatty"));
    }

    #[test]
    fn test_empty_filter_allows_everything() {
        let filter = LogFilter::new();
        assert!(filter.is_empty());
        let capture = Capture::default();
        let sink = capture.clone();
        let config = LogConfig {
            directives: "trace".into(),
            filter,
            with_target: true,
            ansi: false,
        };
        let subscriber = tracing_subscriber::registry().with(layer(&config, move || sink.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "anything", "kept");
        });
        assert!(capture.text().contains("kept"));
    }

    #[test]
    fn test_bad_directives_rejected() {
        let config = LogConfig {
            directives: "towerview_client=loud".into(),
            ..Default::default()
        };
        assert!(matches!(init_logging(config), Err(SdkError::Logging(_))));
    }
}
