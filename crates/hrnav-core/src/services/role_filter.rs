// ============================================================================
// HRNav Core - Role Filter
// File: crates/hrnav-core/src/services/role_filter.rs
// ============================================================================
//! Reduces a menu tree to what an access context may see.
//!
//! Filters are pure and composable: a role filter can be followed by a named
//! view that picks level-1 items into a custom single-category menu.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{AccessContext, CapabilitySet, MenuCategory, MenuNode, MenuTree, NodeId, Role};

/// A pure transformation of a menu tree.
pub trait MenuFilter {
    fn apply(&self, tree: &MenuTree) -> MenuTree;

    /// Runs `next` on this filter's output.
    fn then<F: MenuFilter>(self, next: F) -> Chain<Self, F>
    where
        Self: Sized,
    {
        Chain { first: self, second: next }
    }
}

/// Two filters applied in sequence.
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: MenuFilter, B: MenuFilter> MenuFilter for Chain<A, B> {
    fn apply(&self, tree: &MenuTree) -> MenuTree {
        self.second.apply(&self.first.apply(tree))
    }
}

/// Deployment-level switches of the role filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FilterPolicy {
    /// Unauthenticated localhost development: show everything.
    pub dev_bypass: bool,
}

/// Named reasons to skip filtering altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassRule {
    /// Operators see the full menu.
    SuperAdmin,
    /// Local development with `menu.dev_bypass` enabled.
    DevelopmentBypass,
}

impl BypassRule {
    pub fn applies(access: &AccessContext, policy: FilterPolicy) -> Option<Self> {
        if policy.dev_bypass {
            Some(BypassRule::DevelopmentBypass)
        } else if access.effective_role() == Role::SuperAdmin {
            Some(BypassRule::SuperAdmin)
        } else {
            None
        }
    }
}

/// Filters by the capabilities the access context grants.
#[derive(Debug, Clone)]
pub struct RoleFilter<'a> {
    access: &'a AccessContext,
    policy: FilterPolicy,
}

impl<'a> RoleFilter<'a> {
    pub fn new(access: &'a AccessContext, policy: FilterPolicy) -> Self {
        Self { access, policy }
    }
}

impl MenuFilter for RoleFilter<'_> {
    fn apply(&self, tree: &MenuTree) -> MenuTree {
        if let Some(rule) = BypassRule::applies(self.access, self.policy) {
            debug!("Menu filter bypassed: {:?}", rule);
            return tree.clone();
        }

        let granted = self.access.granted();
        debug!(
            "Filtering menu for role {} ({} capabilities, loading: {})",
            self.access.effective_role().as_str(),
            granted.len(),
            self.access.is_loading()
        );

        MenuTree::new(
            tree.categories
                .iter()
                .map(|category| MenuCategory {
                    name: category.name.clone(),
                    items: filter_nodes(&category.items, &granted),
                })
                .collect(),
        )
    }
}

/// Convenience wrapper: `filter(tree, access)` with the given policy.
pub fn filter(tree: &MenuTree, access: &AccessContext, policy: FilterPolicy) -> MenuTree {
    RoleFilter::new(access, policy).apply(tree)
}

fn filter_nodes(nodes: &[MenuNode], granted: &CapabilitySet) -> Vec<MenuNode> {
    nodes
        .iter()
        .filter_map(|node| filter_node(node, granted))
        .collect()
}

fn filter_node(node: &MenuNode, granted: &CapabilitySet) -> Option<MenuNode> {
    if !node.is_granted_by(granted) {
        return None;
    }

    let children = filter_nodes(&node.children, granted);

    // A grouping node that lost every child has nothing left to expand.
    if node.has_children() && children.is_empty() && !node.is_navigable() {
        return None;
    }

    Some(MenuNode {
        id: node.id.clone(),
        label: node.label.clone(),
        link: node.link.clone(),
        icon: node.icon.clone(),
        requires: node.requires.clone(),
        children,
    })
}

/// Custom view assembled from named level-1 items of the master tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSelection {
    name: String,
    items: Vec<NodeId>,
}

impl ViewSelection {
    /// Repeated ids keep their first position only: level-1 ids share one expansion slot.
    pub fn new(name: &str, items: Vec<NodeId>) -> Self {
        let mut seen = HashSet::new();
        Self {
            name: name.to_string(),
            items: items.into_iter().filter(|id| seen.insert(id.clone())).collect(),
        }
    }
}

impl MenuFilter for ViewSelection {
    fn apply(&self, tree: &MenuTree) -> MenuTree {
        let items: Vec<MenuNode> = self
            .items
            .iter()
            .filter_map(|id| {
                let found = tree.level_one().find(|n| &n.id == id).cloned();
                if found.is_none() {
                    debug!("View {} skips missing item {}", self.name, id);
                }
                found
            })
            .collect();

        MenuTree::new(vec![MenuCategory::new(&self.name, items)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Capability;

    fn tree() -> MenuTree {
        MenuTree::new(vec![
            MenuCategory::new(
                "Main",
                vec![
                    MenuNode::leaf(1, "Leaves", "/leaves"),
                    MenuNode::leaf(2, "Companies", "/companies").requiring(Capability::ManageCompanies),
                ],
            ),
            MenuCategory::new(
                "HRM",
                vec![
                    MenuNode::group(
                        "payroll",
                        "Payroll",
                        vec![
                            MenuNode::leaf(1, "Salaries", "/payroll/salaries")
                                .requiring(Capability::ManagePayroll),
                            MenuNode::leaf(2, "Runs", "/payroll/runs").requiring(Capability::ManagePayroll),
                        ],
                    ),
                    MenuNode::leaf("projects", "Projects", "/projects").with_children(vec![
                        MenuNode::leaf(1, "Settings", "/projects/settings")
                            .requiring(Capability::ManageProjects),
                    ]),
                ],
            ),
        ])
    }

    fn labels(tree: &MenuTree) -> Vec<String> {
        let mut labels = Vec::new();
        tree.visit(|_, node| labels.push(node.label.clone()));
        labels
    }

    #[test]
    fn test_employee_sees_only_unrestricted() {
        let filtered = filter(&tree(), &AccessContext::for_role(Role::Employee), FilterPolicy::default());
        assert_eq!(labels(&filtered), vec!["Leaves", "Projects"]);
    }

    #[test]
    fn test_grouping_node_dropped_when_emptied() {
        let filtered = filter(&tree(), &AccessContext::for_role(Role::Manager), FilterPolicy::default());
        assert!(filtered.node_at(&[NodeId::from("payroll")]).is_none());
    }

    #[test]
    fn test_linked_parent_kept_without_children() {
        let filtered = filter(&tree(), &AccessContext::for_role(Role::Employee), FilterPolicy::default());
        let projects = filtered.node_at(&[NodeId::from("projects")]).unwrap();
        assert!(projects.children.is_empty());
    }

    #[test]
    fn test_admin_sees_payroll_but_not_companies() {
        let filtered = filter(&tree(), &AccessContext::for_role(Role::Admin), FilterPolicy::default());
        assert_eq!(
            labels(&filtered),
            vec!["Leaves", "Payroll", "Salaries", "Runs", "Projects", "Settings"]
        );
    }

    #[test]
    fn test_super_admin_is_identity() {
        let source = tree();
        let access = AccessContext::for_role(Role::SuperAdmin);
        assert_eq!(BypassRule::applies(&access, FilterPolicy::default()), Some(BypassRule::SuperAdmin));
        assert_eq!(filter(&source, &access, FilterPolicy::default()), source);
    }

    #[test]
    fn test_dev_bypass_is_identity_even_while_loading() {
        let source = tree();
        let policy = FilterPolicy { dev_bypass: true };
        let access = AccessContext::loading();
        assert_eq!(BypassRule::applies(&access, policy), Some(BypassRule::DevelopmentBypass));
        assert_eq!(filter(&source, &access, policy), source);
    }

    #[test]
    fn test_loading_super_admin_is_restricted() {
        let snapshot = crate::domain::RoleSnapshot {
            role: Some("super-admin".into()),
            capabilities: None,
            is_loading: true,
        };
        let access = AccessContext::from_snapshot(&snapshot);
        let filtered = filter(&tree(), &access, FilterPolicy::default());
        assert_eq!(labels(&filtered), vec!["Leaves", "Projects"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        for role in Role::ORDERED {
            let access = AccessContext::for_role(role);
            let once = filter(&tree(), &access, FilterPolicy::default());
            let twice = filter(&once, &access, FilterPolicy::default());
            assert_eq!(once, twice, "{:?}", role);
        }
    }

    #[test]
    fn test_view_selection_composes_after_role_filter() {
        let access = AccessContext::for_role(Role::Employee);
        let view = RoleFilter::new(&access, FilterPolicy::default()).then(ViewSelection::new(
            "Self Service",
            vec![NodeId::from("projects"), NodeId::from(2), NodeId::from(1)],
        ));
        let result = view.apply(&tree());
        assert_eq!(result.categories.len(), 1);
        assert_eq!(result.categories[0].name, "Self Service");
        let ids: Vec<&str> = result.categories[0].items.iter().map(|n| n.id.as_str()).collect();
        // item 2 (Companies) was removed by the role filter
        assert_eq!(ids, vec!["projects", "1"]);
    }

    #[test]
    fn test_view_selection_drops_repeated_ids() {
        let view = ViewSelection::new(
            "Picks",
            vec![NodeId::from("projects"), NodeId::from(1), NodeId::from("projects")],
        );
        let result = view.apply(&tree());
        let ids: Vec<&str> = result.categories[0].items.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["projects", "1"]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let only_restricted = MenuTree::new(vec![MenuCategory::new(
            "Admin",
            vec![MenuNode::leaf(1, "Companies", "/companies").requiring(Capability::ManageCompanies)],
        )]);
        let filtered = filter(&only_restricted, &AccessContext::loading(), FilterPolicy::default());
        assert!(filtered.is_empty());
    }
}
