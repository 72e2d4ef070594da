//! Application-wide constants

/// Deepest nesting level a menu node may sit at (level 1 = item directly under a category).
pub const MAX_MENU_DEPTH: usize = 4;
/// Link value that marks a node as non-navigable.
pub const NON_NAVIGABLE_LINK: &str = "#";
/// Viewports narrower than this are treated as compact (offcanvas menu).
pub const DEFAULT_COMPACT_BREAKPOINT_PX: u32 = 768;
pub const DEVELOPMENT_ENV: &str = "development";
