// ============================================================================
// HRNav Core - Menu Tree
// File: crates/hrnav-core/src/domain/tree.rs
// Description: Immutable menu snapshot, loading and load-time validation
// ============================================================================

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use hrnav_shared::constants::MAX_MENU_DEPTH;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use super::node::{display_path, MenuCategory, MenuNode, NodeId};
use super::selection::ActiveSelection;
use crate::error::MenuError;

/// Menu document shipped with the crate: the HR dashboard sidebar.
pub const HR_DASHBOARD_MENU: &str = include_str!("../../menu/hr_dashboard.json");

/// Ordered categories of menu nodes. Built once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MenuTree {
    #[validate(nested)]
    pub categories: Vec<MenuCategory>,
}

impl MenuTree {
    pub fn new(categories: Vec<MenuCategory>) -> Self {
        Self { categories }
    }

    /// Parses and validates a JSON menu document.
    pub fn from_json_str(document: &str) -> Result<Self, MenuError> {
        let tree: MenuTree = serde_json::from_str(document)?;
        tree.validate_structure()?;
        Ok(tree)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MenuError> {
        let path = path.as_ref();
        info!("Loading menu from {}", path.display());
        let document = std::fs::read_to_string(path)?;
        let tree = Self::from_json_str(&document)?;
        info!(
            "Menu loaded: {} categories, {} nodes",
            tree.categories.len(),
            tree.id_paths().len()
        );
        Ok(tree)
    }

    pub fn hr_dashboard() -> Result<Self, MenuError> {
        Self::from_json_str(HR_DASHBOARD_MENU)
    }

    /// Load-time checks the type system cannot express:
    /// field lengths, depth, sibling id uniqueness, and link uniqueness.
    ///
    /// Level-1 ids must be unique across all categories because they share
    /// the level-1 expansion slot.
    pub fn validate_structure(&self) -> Result<(), MenuError> {
        self.validate()?;

        let mut level_one = HashSet::new();
        let mut links: HashMap<&str, String> = HashMap::new();
        let mut trail = Vec::with_capacity(MAX_MENU_DEPTH);

        for category in &self.categories {
            for item in &category.items {
                if !level_one.insert(&item.id) {
                    return Err(MenuError::DuplicateId {
                        parent: "menu root".to_string(),
                        id: item.id.clone(),
                    });
                }
                check_node(item, &mut trail, &mut links)?;
            }
        }

        debug!("Menu structure valid: {} links", links.len());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(MenuCategory::is_empty)
    }

    /// All level-1 nodes in document order.
    pub fn level_one(&self) -> impl Iterator<Item = &MenuNode> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }

    /// Looks a node up by its root-first id path.
    pub fn node_at(&self, path: &[NodeId]) -> Option<&MenuNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.level_one().find(|n| &n.id == first)?;
        for id in rest {
            node = node.children.iter().find(|c| &c.id == id)?;
        }
        Some(node)
    }

    /// Depth-first, document-order walk handing each node its id path.
    pub fn visit<'a, F>(&'a self, mut visitor: F)
    where
        F: FnMut(&[NodeId], &'a MenuNode),
    {
        let mut trail = Vec::with_capacity(MAX_MENU_DEPTH);
        for node in self.level_one() {
            visit_node(node, &mut trail, &mut visitor);
        }
    }

    /// Every navigable node as `(id path, link)`, in document order.
    pub fn linked_nodes(&self) -> Vec<(Vec<NodeId>, &str)> {
        let mut linked = Vec::new();
        self.visit(|path, node| {
            if let Some(route) = node.route() {
                linked.push((path.to_vec(), route));
            }
        });
        linked
    }

    pub fn id_paths(&self) -> BTreeSet<Vec<NodeId>> {
        let mut paths = BTreeSet::new();
        self.visit(|path, _| {
            paths.insert(path.to_vec());
        });
        paths
    }

    /// Labels along the selected path, root first.
    pub fn breadcrumbs(&self, selection: &ActiveSelection) -> Vec<String> {
        let path = selection.path();
        (1..=path.len())
            .map_while(|len| self.node_at(&path[..len]).map(|n| n.label.clone()))
            .collect()
    }
}

fn visit_node<'a, F>(node: &'a MenuNode, trail: &mut Vec<NodeId>, visitor: &mut F)
where
    F: FnMut(&[NodeId], &'a MenuNode),
{
    trail.push(node.id.clone());
    visitor(trail.as_slice(), node);
    for child in &node.children {
        visit_node(child, trail, visitor);
    }
    trail.pop();
}

fn check_node<'a>(
    node: &'a MenuNode,
    trail: &mut Vec<NodeId>,
    links: &mut HashMap<&'a str, String>,
) -> Result<(), MenuError> {
    trail.push(node.id.clone());
    let here = display_path(trail);

    if trail.len() > MAX_MENU_DEPTH {
        return Err(MenuError::DepthExceeded {
            path: here,
            max: MAX_MENU_DEPTH,
        });
    }

    if let Some(route) = node.route() {
        if let Some(first) = links.get(route) {
            return Err(MenuError::DuplicateLink {
                link: route.to_string(),
                first: first.clone(),
                second: here,
            });
        }
        links.insert(route, here.clone());
    }

    let mut siblings = HashSet::new();
    for child in &node.children {
        if !siblings.insert(&child.id) {
            return Err(MenuError::DuplicateId {
                parent: here,
                id: child.id.clone(),
            });
        }
        check_node(child, trail, links)?;
    }

    trail.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::Capability;

    fn sample() -> MenuTree {
        MenuTree::new(vec![
            MenuCategory::new(
                "Main",
                vec![MenuNode::leaf(1, "Dashboard", "/dashboard")],
            ),
            MenuCategory::new(
                "HRM",
                vec![MenuNode::group(
                    "hrm",
                    "HRM",
                    vec![
                        MenuNode::leaf(1, "Leaves", "/hrm/leaves"),
                        MenuNode::group(
                            2,
                            "Payroll",
                            vec![MenuNode::leaf(1, "Salaries", "/hrm/payroll/salaries")
                                .requiring(Capability::ManagePayroll)],
                        ),
                    ],
                )],
            ),
        ])
    }

    #[test]
    fn test_builtin_menu_is_valid() {
        let tree = MenuTree::hr_dashboard().unwrap();
        assert_eq!(tree.categories.len(), 4);
        assert!(!tree.is_empty());
        let deepest = tree.id_paths().into_iter().map(|p| p.len()).max();
        assert_eq!(deepest, Some(MAX_MENU_DEPTH));
    }

    #[test]
    fn test_node_at_and_breadcrumbs() {
        let tree = sample();
        let path = vec![NodeId::from("hrm"), NodeId::from(2), NodeId::from(1)];
        assert_eq!(tree.node_at(&path).map(|n| n.label.as_str()), Some("Salaries"));
        assert!(tree.node_at(&[NodeId::from("nope")]).is_none());
        assert!(tree.node_at(&[]).is_none());
        let crumbs = tree.breadcrumbs(&ActiveSelection::from_path(&path));
        assert_eq!(crumbs, vec!["HRM", "Payroll", "Salaries"]);
    }

    #[test]
    fn test_linked_nodes_in_document_order() {
        let tree = sample();
        let links: Vec<&str> = tree.linked_nodes().into_iter().map(|(_, l)| l).collect();
        assert_eq!(links, vec!["/dashboard", "/hrm/leaves", "/hrm/payroll/salaries"]);
    }

    #[test]
    fn test_rejects_duplicate_link() {
        let tree = MenuTree::new(vec![MenuCategory::new(
            "Main",
            vec![
                MenuNode::leaf(1, "Leaves", "/leaves"),
                MenuNode::group(2, "HRM", vec![MenuNode::leaf(1, "Leaves again", "/leaves")]),
            ],
        )]);
        match tree.validate_structure() {
            Err(MenuError::DuplicateLink { link, first, second }) => {
                assert_eq!(link, "/leaves");
                assert_eq!(first, "1");
                assert_eq!(second, "2/1");
            }
            other => panic!("expected duplicate link, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_links_may_repeat() {
        let tree = MenuTree::new(vec![MenuCategory::new(
            "Main",
            vec![
                MenuNode::leaf(1, "A", "#").with_children(vec![MenuNode::leaf(1, "x", "/x")]),
                MenuNode::leaf(2, "B", "#").with_children(vec![MenuNode::leaf(1, "y", "/y")]),
            ],
        )]);
        assert!(tree.validate_structure().is_ok());
    }

    #[test]
    fn test_rejects_duplicate_level_one_id_across_categories() {
        let tree = MenuTree::new(vec![
            MenuCategory::new("A", vec![MenuNode::leaf(1, "One", "/one")]),
            MenuCategory::new("B", vec![MenuNode::leaf(1, "Uno", "/uno")]),
        ]);
        assert!(matches!(tree.validate_structure(), Err(MenuError::DuplicateId { .. })));
    }

    #[test]
    fn test_rejects_duplicate_sibling_id() {
        let tree = MenuTree::new(vec![MenuCategory::new(
            "A",
            vec![MenuNode::group(
                1,
                "Group",
                vec![MenuNode::leaf(1, "x", "/x"), MenuNode::leaf(1, "y", "/y")],
            )],
        )]);
        assert!(matches!(tree.validate_structure(), Err(MenuError::DuplicateId { .. })));
    }

    #[test]
    fn test_rejects_fifth_level() {
        let tree = MenuTree::new(vec![MenuCategory::new(
            "A",
            vec![MenuNode::group(
                1,
                "L1",
                vec![MenuNode::group(
                    1,
                    "L2",
                    vec![MenuNode::group(
                        1,
                        "L3",
                        vec![MenuNode::group(1, "L4", vec![MenuNode::leaf(1, "L5", "/deep")])],
                    )],
                )],
            )],
        )]);
        assert!(matches!(
            tree.validate_structure(),
            Err(MenuError::DepthExceeded { max: 4, .. })
        ));
    }

    #[test]
    fn test_parse_errors_surface() {
        assert!(matches!(MenuTree::from_json_str("{"), Err(MenuError::ParseError(_))));
        assert!(matches!(
            MenuTree::from_json_str(r#"{"categories":[{"name":"","items":[]}]}"#),
            Err(MenuError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            MenuTree::load("/definitely/not/here.json"),
            Err(MenuError::IoError(_))
        ));
    }
}
