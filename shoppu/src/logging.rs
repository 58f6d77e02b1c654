//! Tracing setup: a console layer and a daily-rolling log file layer,
//! each with its own level filter.

use std::path::Path;

use thiserror::Error;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
    Layer,
};


#[derive(Debug, Error)]
pub enum TracingInitializationError {
    #[error("a global tracing subscriber has already been set")]
    AlreadyInitialized {
        #[from]
        #[source]
        error: TryInitError,
    },
}


/// Installs the global tracing subscriber.
///
/// The log file output directory must already exist.
/// The returned guard flushes the log file writer when dropped,
/// so keep it alive until the server exits.
pub fn initialize_tracing<P>(
    console_level_filter: EnvFilter,
    log_file_level_filter: EnvFilter,
    log_file_output_directory: P,
    log_file_name_prefix: &str,
) -> Result<WorkerGuard, TracingInitializationError>
where
    P: AsRef<Path>,
{
    let console_layer = fmt::layer()
        .with_ansi(true)
        .with_thread_names(true)
        .with_filter(console_level_filter);


    let rolling_file_appender = rolling::daily(log_file_output_directory.as_ref(), log_file_name_prefix);
    let (non_blocking_file_writer, guard) = tracing_appender::non_blocking(rolling_file_appender);

    let log_file_layer = fmt::layer()
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(non_blocking_file_writer)
        .with_filter(log_file_level_filter);


    tracing_subscriber::registry()
        .with(console_layer)
        .with(log_file_layer)
        .try_init()?;

    Ok(guard)
}
