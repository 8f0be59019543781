pub mod config;
pub mod logging;
pub mod prompt;
pub mod render;
pub mod session;

pub use config::{ConfigError, ConfigValidationError, SimConfig};
pub use session::{SessionReport, run_session};
