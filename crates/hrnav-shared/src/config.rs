//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_COMPACT_BREAKPOINT_PX, DEVELOPMENT_ENV};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub menu: MenuSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// `json` (default) or `pretty`
    pub log_format: String,
    pub allowed_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MenuSettings {
    /// Path of the JSON menu document. The built-in HR dashboard menu is used when unset.
    pub source: Option<String>,
    /// Skip role filtering entirely. Only honoured in the development environment.
    pub dev_bypass: bool,
    pub collapsed_by_default: bool,
    pub compact_breakpoint_px: u32,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| DEVELOPMENT_ENV.into());
        let config = Self::builder_with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        let config: Self = config.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", DEVELOPMENT_ENV)?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "hrnav-server")?
            .set_default("app.log_format", "json")?
            .set_default("app.allowed_origin", "http://localhost:5173")?
            .set_default("menu.dev_bypass", false)?
            .set_default("menu.collapsed_by_default", false)?
            .set_default("menu.compact_breakpoint_px", DEFAULT_COMPACT_BREAKPOINT_PX)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.menu.compact_breakpoint_px == 0 {
            return Err(AppError::InvalidSetting {
                key: "menu.compact_breakpoint_px".into(),
                message: "must be greater than zero".into(),
            });
        }
        if !matches!(self.app.log_format.as_str(), "json" | "pretty") {
            return Err(AppError::InvalidSetting {
                key: "app.log_format".into(),
                message: format!("unsupported format {}", self.app.log_format),
            });
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.app.env == DEVELOPMENT_ENV
    }

    /// Development bypass: `menu.dev_bypass` set and running in the development environment.
    pub fn dev_bypass_enabled(&self) -> bool {
        self.menu.dev_bypass && self.is_development()
    }
}
