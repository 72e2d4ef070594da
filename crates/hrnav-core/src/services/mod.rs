//! Menu services: filtering, resolution, rendering, and the session tying them together

pub mod role_filter;
pub mod active_path;
pub mod renderer;
pub mod menu_session;

pub use role_filter::{filter, BypassRule, FilterPolicy, MenuFilter, RoleFilter, ViewSelection};
pub use active_path::resolve;
pub use renderer::{MenuIntent, MenuRenderer, RenderCategory, RenderItem, RenderMenu};
pub use menu_session::{MenuSession, SessionSettings, Viewport};
