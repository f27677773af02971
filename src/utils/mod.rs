/// `strata.toml` configuration.
pub mod toml_config;
