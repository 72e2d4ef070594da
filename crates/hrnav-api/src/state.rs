use std::sync::Arc;

use hrnav_core::services::SessionSettings;
use hrnav_core::MenuTree;
use hrnav_shared::config::AppConfig;

/// Shared, read-only for the life of the server. Every request builds its own session from it.
#[derive(Clone)]
pub struct AppState {
    pub tree: Arc<MenuTree>,
    pub settings: SessionSettings,
}

impl AppState {
    pub fn new(tree: MenuTree, config: &AppConfig) -> Self {
        Self {
            tree: Arc::new(tree),
            settings: SessionSettings::from_config(config),
        }
    }
}
