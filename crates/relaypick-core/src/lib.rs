pub mod app_config;
pub mod cart;
pub mod config;
pub mod delivery_mode;
mod lenient;
pub mod location;

pub use app_config::{AppConfig, Environment};
pub use cart::{CartItem, CartSnapshot};
pub use config::{load_app_config, load_app_config_from_env};
pub use delivery_mode::{relay_pricing_mode, DeliveryMode, ModeId, RELAY_MODE_SENTINEL};
pub use location::{Location, LocationId};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
