//! Active path resolution: which node chain the current route points at.

use hrnav_shared::constants::MAX_MENU_DEPTH;
use tracing::debug;

use crate::domain::node::display_path;
use crate::domain::{ActiveSelection, MenuNode, MenuTree, NodeId};

/// Finds the first node, in document order, whose link equals `current_path`.
///
/// Matching is exact string equality: `/hrm/leaves?id=1` does not match
/// `/hrm/leaves`. Non-navigable nodes never match. No match yields an
/// all-empty selection.
pub fn resolve(tree: &MenuTree, current_path: &str) -> ActiveSelection {
    let mut trail = Vec::with_capacity(MAX_MENU_DEPTH);
    for node in tree.level_one() {
        if search(node, current_path, &mut trail) {
            debug!("Route {} resolved to {}", current_path, display_path(&trail));
            return ActiveSelection::from_path(&trail);
        }
    }
    debug!("Route {} matches no menu node", current_path);
    ActiveSelection::none()
}

fn search(node: &MenuNode, current_path: &str, trail: &mut Vec<NodeId>) -> bool {
    if trail.len() == MAX_MENU_DEPTH {
        return false;
    }
    trail.push(node.id.clone());

    if node.route() == Some(current_path) {
        return true;
    }
    for child in &node.children {
        if search(child, current_path, trail) {
            return true;
        }
    }

    trail.pop();
    false
}
