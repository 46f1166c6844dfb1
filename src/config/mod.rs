//! Application configuration

mod app_config;

pub use app_config::{
    AdminSecret, AppConfig, LogFormat, LoggingConfig, ServerConfig, StartupConfigError,
    StorageSettings, ADMIN_KEY_ENV,
};
