pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, APP_NAME, APP_VERSION};
pub use error::HearthError;
pub use types::*;
