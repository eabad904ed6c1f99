//! Settings shared by every command.

use crate::Result;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use ohno::IntoAppError;
use std::fs::OpenOptions;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Logging options
#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", env = "LOG_LEVEL", global = true)]
    pub log_level: LogLevel,

    /// Append log output to this file instead of standard error
    #[arg(long, value_name = "PATH", env = "LOG_FILE", global = true)]
    pub log_file: Option<Utf8PathBuf>,
}

/// Initialize the logger. `RUST_LOG` overrides the level when set.
///
/// Only the first call in a process has any effect.
pub fn init_logging(args: &LoggingArgs) -> Result<()> {
    let level = match args.log_level {
        LogLevel::None => return Ok(()),
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let mut builder = env_logger::Builder::from_env(env);
    let _ = builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(args.log_level, LogLevel::Debug | LogLevel::Trace));

    if let Some(path) = &args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .into_app_err_with(|| format!("could not open log file '{path}'"))?;

        let _ = builder
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)));
    }

    let _ = builder.try_init();
    Ok(())
}
