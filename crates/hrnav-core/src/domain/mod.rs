//! # HRNav Core - Domain Module
//! 
//! Menu tree, access context, selection, and expansion state.

pub mod node;
pub mod tree;
pub mod access;
pub mod selection;
pub mod expansion;

// Re-export all entities and enums
pub use node::{MenuNode, MenuCategory, NodeId};
pub use tree::{MenuTree, HR_DASHBOARD_MENU};
pub use access::{AccessContext, Capability, CapabilitySet, Role, RoleSnapshot};
pub use selection::{ActiveSelection, Level};
pub use expansion::{ExpansionAction, ExpansionState, ExpansionStateMachine};
