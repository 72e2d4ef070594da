// ============================================================================
// HRNav Core - Menu Session
// File: crates/hrnav-core/src/services/menu_session.rs
// ============================================================================
//! One user's menu: filtered view, current route, selection, and expansion.

use std::sync::Arc;

use hrnav_shared::constants::DEFAULT_COMPACT_BREAKPOINT_PX;
use hrnav_shared::AppConfig;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::active_path::resolve;
use super::renderer::{MenuIntent, MenuRenderer, RenderMenu};
use super::role_filter::{FilterPolicy, MenuFilter, RoleFilter, ViewSelection};
use crate::domain::{
    AccessContext, ActiveSelection, ExpansionState, ExpansionStateMachine, MenuTree, NodeId, Role,
};
use crate::repositories::RoleProvider;

/// Per-deployment knobs of a menu session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub policy: FilterPolicy,
    pub collapsed_by_default: bool,
    pub compact_breakpoint_px: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            policy: FilterPolicy::default(),
            collapsed_by_default: false,
            compact_breakpoint_px: DEFAULT_COMPACT_BREAKPOINT_PX,
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            policy: FilterPolicy {
                dev_bypass: config.dev_bypass_enabled(),
            },
            collapsed_by_default: config.menu.collapsed_by_default,
            compact_breakpoint_px: config.menu.compact_breakpoint_px,
        }
    }
}

/// Viewport width as last reported by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width_px: Option<u32>,
    compact_breakpoint_px: u32,
}

impl Viewport {
    pub fn new(compact_breakpoint_px: u32) -> Self {
        Self {
            width_px: None,
            compact_breakpoint_px,
        }
    }

    /// Unknown widths count as wide.
    pub fn is_compact(&self) -> bool {
        self.width_px.is_some_and(|w| w < self.compact_breakpoint_px)
    }
}

pub struct MenuSession {
    tree: Arc<MenuTree>,
    settings: SessionSettings,
    view: Option<ViewSelection>,
    access: AccessContext,
    filtered: Arc<MenuTree>,
    route: Option<String>,
    selection: ActiveSelection,
    expansion: ExpansionStateMachine,
    viewport: Viewport,
}

impl MenuSession {
    /// Starts in the loading access context until a role is known.
    pub fn new(tree: Arc<MenuTree>, settings: SessionSettings) -> Self {
        let access = AccessContext::loading();
        let filtered = Arc::new(RoleFilter::new(&access, settings.policy).apply(&tree));
        Self {
            tree,
            settings,
            view: None,
            access,
            filtered,
            route: None,
            selection: ActiveSelection::none(),
            expansion: ExpansionStateMachine::new(settings.collapsed_by_default),
            viewport: Viewport::new(settings.compact_breakpoint_px),
        }
    }

    /// Restricts the session to a named view of the master tree.
    pub fn with_view(mut self, view: ViewSelection) -> Self {
        self.view = Some(view);
        self.refilter();
        self.reresolve();
        self.prune_expansion();
        self
    }

    /// Role resolution completed (or changed). Re-filters and re-resolves the current route.
    pub fn set_access(&mut self, access: AccessContext) {
        if access == self.access {
            debug!("Access context unchanged, keeping filtered menu");
            return;
        }
        self.access = access;
        self.refilter();
        self.reresolve();
        self.prune_expansion();
    }

    /// Looks the user's role up, behaving as most restrictive while it loads
    /// and when the lookup fails.
    pub async fn refresh_access<P>(&mut self, provider: &P, user_id: &Uuid)
    where
        P: RoleProvider + ?Sized,
    {
        self.set_access(AccessContext::loading());

        let access = match provider.fetch_role(user_id).await {
            Ok(snapshot) => AccessContext::from_snapshot(&snapshot),
            Err(e) => {
                warn!("Role lookup failed for {}: {}", user_id, e);
                AccessContext::for_role(Role::most_restrictive())
            }
        };
        info!("Menu access for {} resolved to {}", user_id, access.effective_role().as_str());
        self.set_access(access);
    }

    /// Navigation happened: resolve from scratch and reseed the expansion.
    /// A repeated event for the current route keeps the user's expansion.
    pub fn on_route_change(&mut self, path: &str) {
        let selection = resolve(&self.filtered, path);
        if self.route.as_deref() == Some(path) && selection == self.selection {
            debug!("Route {} unchanged, keeping expansion", path);
            return;
        }
        self.route = Some(path.to_string());
        self.selection = selection;
        self.expansion.seed(&self.selection);
        if self.viewport.is_compact() {
            self.expansion.collapse_globally();
        }
    }

    /// Click on the node at `path`. Toggles are applied here; navigation
    /// intents are returned for the router.
    pub fn click(&mut self, path: &[NodeId]) -> Vec<MenuIntent> {
        let intents = MenuRenderer::new(&self.filtered).activate(path);
        for intent in &intents {
            if let MenuIntent::Toggle { level, id } = intent {
                self.expansion.toggle(*level, id.clone());
            }
        }
        intents
    }

    /// Crossing the compact breakpoint collapses or re-expands the panel.
    pub fn set_viewport_width(&mut self, width_px: u32) {
        let was_compact = self.viewport.is_compact();
        self.viewport.width_px = Some(width_px);
        match (was_compact, self.viewport.is_compact()) {
            (false, true) => self.expansion.collapse_globally(),
            (true, false) => self.expansion.expand_globally(),
            _ => {}
        }
    }

    /// Explicit open/close of the whole panel (hamburger button).
    pub fn toggle_panel(&mut self) {
        if self.expansion.state().is_collapsed_globally() {
            self.expansion.expand_globally();
        } else {
            self.expansion.collapse_globally();
        }
    }

    pub fn restore_expansion(&mut self, state: ExpansionState) {
        self.expansion.restore(state);
    }

    pub fn render(&self) -> RenderMenu {
        MenuRenderer::new(&self.filtered).render(self.expansion.state(), &self.selection)
    }

    pub fn filtered_tree(&self) -> &MenuTree {
        &self.filtered
    }

    pub fn selection(&self) -> &ActiveSelection {
        &self.selection
    }

    pub fn expansion(&self) -> &ExpansionState {
        self.expansion.state()
    }

    pub fn access(&self) -> &AccessContext {
        &self.access
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn refilter(&mut self) {
        let role_filter = RoleFilter::new(&self.access, self.settings.policy);
        let filtered = match &self.view {
            Some(view) => role_filter.then(view.clone()).apply(&self.tree),
            None => role_filter.apply(&self.tree),
        };
        self.filtered = Arc::new(filtered);
    }

    fn prune_expansion(&mut self) {
        let filtered = &self.filtered;
        self.expansion.retain_existing(|path| filtered.node_at(path).is_some());
    }

    /// Keeps the user's expansion unless the selection itself moved.
    fn reresolve(&mut self) {
        let Some(route) = self.route.as_deref() else {
            return;
        };
        let selection = resolve(&self.filtered, route);
        if selection != self.selection {
            self.selection = selection;
            self.expansion.seed(&self.selection);
        }
    }
}
