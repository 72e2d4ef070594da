// ============================================================================
// HRNav Core - Menu Node Entity
// File: crates/hrnav-core/src/domain/node.rs
// Description: Recursive menu node and category grouping
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use hrnav_shared::constants::NON_NAVIGABLE_LINK;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::access::{Capability, CapabilitySet};

/// Node identifier, unique among siblings. Menu documents may use integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawNodeId", into = "String")]
pub struct NodeId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNodeId {
    Int(i64),
    Text(String),
}

impl From<RawNodeId> for NodeId {
    fn from(raw: RawNodeId) -> Self {
        match raw {
            RawNodeId::Int(n) => NodeId(n.to_string()),
            RawNodeId::Text(s) => NodeId(s),
        }
    }
}

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        NodeId(n.to_string())
    }
}

impl From<u32> for NodeId {
    fn from(n: u32) -> Self {
        NodeId(n.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Formats an id path as `a/b/c` for logs and error messages.
pub fn display_path(path: &[NodeId]) -> String {
    path.iter().map(NodeId::as_str).collect::<Vec<_>>().join("/")
}

/// Menu node entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MenuNode {
    pub id: NodeId,

    #[validate(length(min = 1, max = 100, message = "Menu label must be between 1 and 100 characters"))]
    pub label: String,

    /// Destination route; `None` or `"#"` only expands children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Menu link must be between 1 and 255 characters"))]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Menu icon too long"))]
    pub icon: Option<String>,

    /// Every listed capability must be granted for the node to be visible.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub requires: BTreeSet<Capability>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Navigable leaf.
    pub fn leaf(id: impl Into<NodeId>, label: &str, link: &str) -> Self {
        Self {
            id: id.into(),
            label: label.to_string(),
            link: Some(link.to_string()),
            icon: None,
            requires: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    /// Grouping node without a link of its own.
    pub fn group(id: impl Into<NodeId>, label: &str, children: Vec<MenuNode>) -> Self {
        Self {
            id: id.into(),
            label: label.to_string(),
            link: None,
            icon: None,
            requires: BTreeSet::new(),
            children,
        }
    }

    pub fn requiring(mut self, capability: Capability) -> Self {
        self.requires.insert(capability);
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<MenuNode>) -> Self {
        self.children = children;
        self
    }

    /// The node's route, unless it is absent or the `"#"` placeholder.
    pub fn route(&self) -> Option<&str> {
        self.link
            .as_deref()
            .filter(|link| !link.is_empty() && *link != NON_NAVIGABLE_LINK)
    }

    pub fn is_navigable(&self) -> bool {
        self.route().is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_restricted(&self) -> bool {
        !self.requires.is_empty()
    }

    pub fn is_granted_by(&self, granted: &CapabilitySet) -> bool {
        granted.contains_all(&self.requires)
    }
}

/// Named grouping of level-1 nodes. Presentational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MenuCategory {
    #[validate(length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<MenuNode>,
}

impl MenuCategory {
    pub fn new(name: &str, items: Vec<MenuNode>) -> Self {
        Self {
            name: name.to_string(),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
