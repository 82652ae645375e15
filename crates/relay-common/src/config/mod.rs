//! Configuration structs

mod relay_config;

pub use relay_config::{
    AppSettings, ConfigError, CorsConfig, Environment, RelayConfig, ServerConfig, TransportConfig,
};
