use std::path::PathBuf;

use snafu::{ResultExt, Snafu};
use tracing_appender::rolling::{InitError, RollingFileAppender};
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::ParseError,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to initialize default tracing level to INFO"))]
    DefaultFilter { source: ParseError },

    #[snafu(display("failed to initialize rolling file appender in {directory:?}"))]
    FileAppender {
        source: InitError,
        directory: PathBuf,
    },

    #[snafu(display("failed to install the global tracing subscriber"))]
    InstallSubscriber { source: TryInitError },
}

/// Initializes `tracing` logging with options from the environment variable
/// given in the `env` parameter.
///
/// Events are written to stderr, stdout is reserved for the command output.
/// If the variable is not set, the maximum log level is INFO. Log output can
/// be copied to a file by setting `{env}_DIRECTORY` (e.g.
/// `OTEL_TARGETALLOCATOR_LOG_DIRECTORY`) to a directory path. This file is
/// rotated regularly.
pub fn initialize_logging(env: &str, app_name: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_env(env) {
        Ok(env_filter) => env_filter,
        _ => EnvFilter::try_new(tracing::Level::INFO.to_string()).context(DefaultFilterSnafu)?,
    };

    let file_appender_directory = std::env::var_os(format!("{env}_DIRECTORY")).map(PathBuf::from);
    let file_appender = file_appender_directory
        .as_deref()
        .map(|directory| {
            RollingFileAppender::builder()
                .filename_suffix(format!("{app_name}.log"))
                .max_log_files(6)
                .build(directory)
                .context(FileAppenderSnafu { directory })
        })
        .transpose()?;

    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let file = file_appender.map(|file_appender| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender)
    });

    Registry::default()
        .with(filter)
        .with(stderr)
        .with(file)
        .try_init()
        .context(InstallSubscriberSnafu)?;

    // need to delay logging until after tracing is initialized
    match file_appender_directory {
        Some(dir) => tracing::info!(directory = %dir.display(), "file logging enabled"),
        None => tracing::debug!("file logging disabled, because no log directory set"),
    }

    Ok(())
}
