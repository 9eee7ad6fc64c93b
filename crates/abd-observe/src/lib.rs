//! Process-wide logging for the dispatcher.
//!
//! Configure with [`LoggerConfig`] (usually the `[logger]` table of the config
//! file) and install once with [`init_logger`].
mod config;
mod error;
mod format;
mod init;
mod level;
mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use init::init_logger;
pub use level::LoggerLevel;
pub use timestamp::{LoggerTimeZone, init_local_offset};
