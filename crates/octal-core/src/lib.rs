//! Octal Core - Core services for the Octal engine
//!
//! This crate provides the foundations shared by every engine crate:
//! - Engine configuration loaded from TOML
//! - Logging setup and the `fatal!` / `fatal_assert!` macros
//! - Frame time and frame pacing
//! - The layer stack and a headless application loop

pub mod app;
pub mod config;
pub mod error;
pub mod layer;
pub mod logging;
pub mod time;

pub use app::{Application, QuitHandle};
pub use config::{AppConfig, EcsConfig, EngineConfig, LogConfig, DEFAULT_MAX_ENTITIES};
pub use error::CoreError;
pub use layer::{Layer, LayerStack};
pub use time::{FramePacer, GameTime, TimeConfig};

#[doc(hidden)]
pub use tracing as __tracing;
