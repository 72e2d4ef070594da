//! # HRNav Shared
//! 
//! Shared configuration, constants, and telemetry for the navigation menu engine.

pub mod constants;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::{AppConfig, MenuSettings};
pub use error::AppError;
