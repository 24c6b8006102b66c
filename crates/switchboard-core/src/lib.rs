pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigOverrides, DashboardConfig, PageConfig, UpstreamConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::*;
