use crate::config::{LogConfig, LogDestination};
use crate::error::QuickPactError;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` wins over the configured level when it is set. Nothing is ever
/// written to stdout: the MCP transport owns it.
///
/// For file destinations the returned guard must be held for the lifetime of
/// the process, otherwise buffered lines are lost on exit.
pub fn init_logs(config: &LogConfig) -> Result<Option<WorkerGuard>, QuickPactError> {
    if !config.enabled {
        return Ok(None);
    }

    let filter = build_filter(config)?;

    match &config.destination {
        LogDestination::File { path } => {
            std::fs::create_dir_all(path)?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, path, "quickpact.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            Registry::default()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .try_init()
                .map_err(|e| QuickPactError::ConfigInvalid {
                    field: "observability.logs".to_string(),
                    reason: e.to_string(),
                })?;
            Ok(Some(guard))
        }
        LogDestination::Stderr => {
            // a subscriber installed earlier (tests, embedding host) is kept
            let _ = Registry::default()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr).with_ansi(false))
                .try_init();
            Ok(None)
        }
        LogDestination::Null => Ok(None),
    }
}

/// Run `f` with a temporary stderr subscriber at `info` (or `RUST_LOG`).
///
/// Configuration is loaded before [`init_logs`] can run, so events emitted
/// while loading it would otherwise reach no subscriber.
pub fn with_startup_logs<T>(f: impl FnOnce() -> T) -> T {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_ansi(false));
    tracing::subscriber::with_default(subscriber, f)
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter, QuickPactError> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }
    let invalid = |e: tracing_subscriber::filter::ParseError| QuickPactError::ConfigInvalid {
        field: "observability.logs.level".to_string(),
        reason: e.to_string(),
    };
    Ok(EnvFilter::try_new(&config.level)
        .map_err(invalid)?
        .add_directive("rmcp=warn".parse().map_err(invalid)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_logging_is_a_no_op() {
        let config = LogConfig {
            enabled: false,
            ..LogConfig::default()
        };
        assert!(init_logs(&config).unwrap().is_none());
    }

    #[test]
    fn test_null_destination_installs_nothing() {
        let config = LogConfig {
            destination: LogDestination::Null,
            ..LogConfig::default()
        };
        assert!(init_logs(&config).unwrap().is_none());
    }

    #[test]
    fn test_startup_logs_return_the_closure_value() {
        let loaded = with_startup_logs(|| {
            tracing::warn!("startup warning");
            42
        });
        assert_eq!(loaded, 42);
    }

    #[test]
    fn test_filter_accepts_directive_lists() {
        let config = LogConfig {
            level: "debug,quickpact=trace".to_string(),
            ..LogConfig::default()
        };
        assert!(build_filter(&config).is_ok());
    }
}
