/// Tracing subscriber setup.
pub mod logging;
/// TOML configuration (`scout.toml`).
pub mod toml_config;
