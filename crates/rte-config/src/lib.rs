//! Smart RTE configuration system.
//!
//! TOML-based configuration for the editor page, the bridge, the browser
//! surface, undo history and the image menu. All sections use defaults so
//! partial configs work out of the box.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{RteConfig, CONFIG_SCHEMA_VERSION};

use rte_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<RteConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}
