// ============================================================================
// HRNav Core - Expansion State
// File: crates/hrnav-core/src/domain/expansion.rs
// Description: Which branch is open at each level, as a reducer over one value
// ============================================================================

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::selection::{ActiveSelection, Level};

/// Open node per nesting level plus the collapse flag of the whole menu panel.
///
/// Setting a level (to a new id or to `None`) always clears every deeper level,
/// so at most one branch is open per level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionState {
    open: [Option<NodeId>; 4],
    collapsed_globally: bool,
}

/// Transitions accepted by [`ExpansionState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpansionAction {
    Seed { selection: ActiveSelection },
    Toggle { level: Level, id: NodeId },
    CollapseGlobally,
    ExpandGlobally,
}

impl ExpansionState {
    pub fn new(collapsed_globally: bool) -> Self {
        Self {
            open: Default::default(),
            collapsed_globally,
        }
    }

    pub fn open_at(&self, level: Level) -> Option<&NodeId> {
        self.open[level.index()].as_ref()
    }

    pub fn is_collapsed_globally(&self) -> bool {
        self.collapsed_globally
    }

    /// True when no level has an open node.
    pub fn is_fully_collapsed(&self) -> bool {
        self.open.iter().all(Option::is_none)
    }

    /// Whether every prefix of `path` is the open node at its level.
    pub fn is_branch_open(&self, path: &[NodeId]) -> bool {
        !path.is_empty()
            && path.len() <= self.open.len()
            && path
                .iter()
                .zip(&self.open)
                .all(|(id, open)| open.as_ref() == Some(id))
    }

    pub fn reduce(&self, action: ExpansionAction) -> Self {
        let mut next = self.clone();
        match action {
            ExpansionAction::Seed { selection } => {
                for level in Level::ALL {
                    next.open[level.index()] = selection.get(level).cloned();
                }
            }
            ExpansionAction::Toggle { level, id } => {
                let slot = &mut next.open[level.index()];
                if slot.as_ref() == Some(&id) {
                    *slot = None;
                } else {
                    *slot = Some(id);
                }
                next.clear_below(level);
            }
            ExpansionAction::CollapseGlobally => next.collapsed_globally = true,
            ExpansionAction::ExpandGlobally => next.collapsed_globally = false,
        }
        next
    }

    /// Closes the first open branch whose id path fails `exists`, and every
    /// level below it. Orphan slots past a closed level are left alone.
    pub fn retain_existing<F>(&self, exists: F) -> Self
    where
        F: Fn(&[NodeId]) -> bool,
    {
        let mut next = self.clone();
        let mut path = Vec::with_capacity(self.open.len());
        for level in Level::ALL {
            let Some(id) = next.open[level.index()].clone() else {
                break;
            };
            path.push(id);
            if !exists(path.as_slice()) {
                next.open[level.index()] = None;
                next.clear_below(level);
                break;
            }
        }
        next
    }

    fn clear_below(&mut self, level: Level) {
        for slot in &mut self.open[level.index() + 1..] {
            *slot = None;
        }
    }
}

/// Owns the expansion state of one menu session.
#[derive(Debug, Clone, Default)]
pub struct ExpansionStateMachine {
    state: ExpansionState,
}

impl ExpansionStateMachine {
    pub fn new(collapsed_by_default: bool) -> Self {
        Self {
            state: ExpansionState::new(collapsed_by_default),
        }
    }

    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    pub fn dispatch(&mut self, action: ExpansionAction) {
        self.state = self.state.reduce(action);
    }

    /// Replaces all open slots with the resolved selection.
    pub fn seed(&mut self, selection: &ActiveSelection) {
        self.dispatch(ExpansionAction::Seed {
            selection: selection.clone(),
        });
    }

    pub fn toggle(&mut self, level: Level, id: NodeId) {
        self.dispatch(ExpansionAction::Toggle { level, id });
    }

    pub fn collapse_globally(&mut self) {
        self.dispatch(ExpansionAction::CollapseGlobally);
    }

    pub fn expand_globally(&mut self) {
        self.dispatch(ExpansionAction::ExpandGlobally);
    }

    /// Drops open branches that no longer exist (e.g. after a re-filter).
    pub fn retain_existing<F>(&mut self, exists: F)
    where
        F: Fn(&[NodeId]) -> bool,
    {
        self.state = self.state.retain_existing(exists);
    }

    /// Swaps in a state carried from elsewhere (e.g. a stateless request).
    pub fn restore(&mut self, state: ExpansionState) {
        self.state = state;
    }
}
