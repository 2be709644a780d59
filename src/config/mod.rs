pub mod toml_config;

pub use toml_config::{EtlConfig, DEFAULT_CONFIG_FILE};
