//! User settings
//!
//! Settings live in a single TOML file under the platform config
//! directory. Every key is optional.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_settings, parse_settings_str, to_toml};
pub use schema::{CliSettings, RegistrySettings, SearchSettings, Settings};
pub use store::SettingsStore;
