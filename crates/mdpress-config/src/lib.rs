pub mod config;
pub mod documents;
pub mod error;
pub mod render;
pub mod site;
pub mod templates;

pub use config::{CategoryLayer, Config, ConfigLayer};
pub use error::ConfigError;
