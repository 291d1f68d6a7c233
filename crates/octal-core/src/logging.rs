//! Logging setup and fatal assertions
//!
//! All engine crates log through `tracing`. There is no fatal level in
//! `tracing`, so fatal conditions are logged at error level with a
//! `fatal = true` field and then panic.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::CoreError;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` overrides `config.level` when it is set. Fails if a global
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<(), CoreError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| CoreError::LoggingInit(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(config.with_location)
        .with_line_number(config.with_location)
        .try_init()
        .map_err(|e| CoreError::LoggingInit(e.to_string()))
}

/// Log a fatal error and panic.
///
/// Use for programmer errors that must not be recovered from.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {{
        let message = ::std::format!($($arg)+);
        $crate::__tracing::error!(fatal = true, "{}", message);
        ::std::panic!("{}", message)
    }};
}

/// Like `assert!`, but the failure is logged through [`fatal!`] first.
#[macro_export]
macro_rules! fatal_assert {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::fatal!(
                "assertion `{}` failed: {}",
                ::std::stringify!($cond),
                ::std::format_args!($($arg)+)
            );
        }
    };
}
