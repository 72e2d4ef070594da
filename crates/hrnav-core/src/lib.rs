//! # HRNav Core
//! 
//! Menu domain, role filtering, active-path resolution, and expansion state
//! for the HR dashboard navigation menu.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::MenuError;
