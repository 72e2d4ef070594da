// ============================================================================
// HRNav Core - Menu Renderer
// File: crates/hrnav-core/src/services/renderer.rs
// ============================================================================
//! Turns a filtered tree, expansion state, and active selection into a render
//! description, and maps clicks back to intents.

use serde::{Deserialize, Serialize};

use crate::domain::{ActiveSelection, ExpansionState, Level, MenuNode, MenuTree, NodeId};

/// Render description of the whole menu panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderMenu {
    pub collapsed: bool,
    pub categories: Vec<RenderCategory>,
    pub breadcrumbs: Vec<String>,
}

impl RenderMenu {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderCategory {
    pub name: String,
    pub items: Vec<RenderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderItem {
    pub id: NodeId,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub level: Level,
    pub expandable: bool,
    pub open: bool,
    /// On the path from the root to the current route's node.
    pub on_active_path: bool,
    /// The node whose link is the current route.
    pub current: bool,
    /// Only populated for open branches.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderItem>,
}

/// What a click asks the outside world (or the expansion machine) to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MenuIntent {
    Toggle { level: Level, id: NodeId },
    Navigate { path: String },
}

pub struct MenuRenderer<'a> {
    tree: &'a MenuTree,
}

impl<'a> MenuRenderer<'a> {
    pub fn new(tree: &'a MenuTree) -> Self {
        Self { tree }
    }

    /// Categories without visible items are omitted.
    pub fn render(&self, state: &ExpansionState, selection: &ActiveSelection) -> RenderMenu {
        let mut trail = Vec::new();
        let categories = self
            .tree
            .categories
            .iter()
            .filter(|c| !c.is_empty())
            .map(|category| RenderCategory {
                name: category.name.clone(),
                items: category
                    .items
                    .iter()
                    .filter_map(|node| render_node(node, &mut trail, state, selection))
                    .collect(),
            })
            .collect();

        RenderMenu {
            collapsed: state.is_collapsed_globally(),
            categories,
            breadcrumbs: self.tree.breadcrumbs(selection),
        }
    }

    /// Intents for a click on the node at `path`: a toggle when it has
    /// children, a navigation when it has a real link. Unknown paths yield nothing.
    pub fn activate(&self, path: &[NodeId]) -> Vec<MenuIntent> {
        let (Some(node), Some(level)) = (self.tree.node_at(path), Level::from_depth(path.len())) else {
            return Vec::new();
        };

        let mut intents = Vec::with_capacity(2);
        if node.has_children() {
            intents.push(MenuIntent::Toggle {
                level,
                id: node.id.clone(),
            });
        }
        if let Some(route) = node.route() {
            intents.push(MenuIntent::Navigate {
                path: route.to_string(),
            });
        }
        intents
    }
}

fn render_node(
    node: &MenuNode,
    trail: &mut Vec<NodeId>,
    state: &ExpansionState,
    selection: &ActiveSelection,
) -> Option<RenderItem> {
    trail.push(node.id.clone());
    let Some(level) = Level::from_depth(trail.len()) else {
        trail.pop();
        return None;
    };

    let open = node.has_children() && state.is_branch_open(trail.as_slice());
    let children = if open {
        node.children
            .iter()
            .filter_map(|child| render_node(child, trail, state, selection))
            .collect()
    } else {
        Vec::new()
    };

    let item = RenderItem {
        id: node.id.clone(),
        label: node.label.clone(),
        link: node.route().map(str::to_string),
        icon: node.icon.clone(),
        level,
        expandable: node.has_children(),
        open,
        on_active_path: selection.is_on_path(trail.as_slice()),
        current: selection.is_current(trail.as_slice()),
        children,
    };
    trail.pop();
    Some(item)
}
