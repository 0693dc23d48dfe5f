//! Configuration: the optional `config.toml`, environment, and command-line
//! overrides resolved into one [`Settings`] value at startup.
pub mod settings;
pub mod toml_loader;
pub mod validation;

pub use settings::{Environment, FileConfig, Overrides, Settings};
pub use validation::ValidationWarning;
