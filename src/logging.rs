use crate::config::{AppConfig, LogRotation};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn file_appender(config: &AppConfig) -> RollingFileAppender {
    match config.rotation {
        LogRotation::Hourly => rolling::hourly(&config.log_dir, &config.log_file),
        LogRotation::Daily => rolling::daily(&config.log_dir, &config.log_file),
        LogRotation::Never => rolling::never(&config.log_dir, &config.log_file),
    }
}

/// Install the global subscriber: rolling file output, plus colored stdout in text mode.
///
/// `RUST_LOG` wins over `log_level`. Keep the returned guard alive for the
/// whole process or buffered lines are lost.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(file_appender(config));

    // sqlx logs every statement at info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_writer(writer)
                    .with_ansi(false),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(fmt::layer().with_target(false).with_ansi(true))
            .init();
    }

    guard
}
