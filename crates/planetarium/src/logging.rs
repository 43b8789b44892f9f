//! Logging setup.
//!
//! Output goes through `tracing`. The CLI flags pick a level for this crate and
//! for the request traces emitted by `tower_http`; `RUST_LOG` replaces the
//! whole filter when it is set. HTTP requests each get a `request` span
//! carrying the method, path and query, so handler events are attributed to
//! the request that caused them.

use axum::http::Request;
use tracing::{Level, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets whose level follows the CLI flags.
const TARGETS: [&str; 2] = ["planetarium", "tower_http"];

/// How much to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above (`-v`).
    Verbose,
    /// Everything (`-vv` or more).
    Trace,
}

impl Verbosity {
    /// Pick a verbosity from the `-v` count and the `-q` flag.
    ///
    /// `-q` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Maximum level enabled for the crate's own targets.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(self) -> String {
        let level = self.level();
        TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()))
    }
}

/// Install the global subscriber.
///
/// Later calls are no-ops, so tests and embedders may call it freely.
///
/// ```no_run
/// use planetarium::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(1, false));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let _ = tracing_subscriber::registry()
        .with(verbosity.filter())
        .with(fmt::layer().with_target(true))
        .try_init();
}

/// Span wrapping one HTTP request.
///
/// Used as the `make_span_with` hook of the router's trace layer.
pub fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        query = request.uri().query().unwrap_or_default(),
    )
}

/// Quiet subscriber for tests, writing through the test harness.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(5, false), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
    }

    #[test]
    fn test_level() {
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
        assert_eq!(Verbosity::default().level(), Level::INFO);
        assert_eq!(Verbosity::Trace.level(), Level::TRACE);
    }

    #[test]
    fn test_directive_covers_request_traces() {
        assert_eq!(
            Verbosity::Verbose.directive(),
            "planetarium=DEBUG,tower_http=DEBUG"
        );
        assert!(EnvFilter::try_new(Verbosity::Quiet.directive()).is_ok());
    }

    #[test]
    fn test_request_span_inside_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let request = Request::builder()
                .method("POST")
                .uri("/planete/upload_image?id=3")
                .body(())
                .unwrap();
            let span = request_span(&request);

            let metadata = span.metadata().unwrap();
            assert_eq!(metadata.name(), "request");
            for field in ["method", "path", "query"] {
                assert!(metadata.fields().field(field).is_some(), "{field}");
            }
        });
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
    }
}
