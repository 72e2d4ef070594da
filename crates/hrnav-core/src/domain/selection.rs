//! Nesting levels and the active selection derived from the current route

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use crate::error::MenuError;

/// Nesting level of a node. Level 1 sits directly under a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::One, Level::Two, Level::Three, Level::Four];

    /// Zero-based slot index.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Level of a node whose id path has `depth` elements.
    pub fn from_depth(depth: usize) -> Option<Self> {
        depth.checked_sub(1).and_then(|i| Level::ALL.get(i).copied())
    }

    pub fn deeper(self) -> Option<Self> {
        Level::from_depth(self.number() as usize + 1)
    }
}

impl TryFrom<u8> for Level {
    type Error = MenuError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::from_depth(value as usize).ok_or(MenuError::InvalidLevel(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.number()
    }
}

/// Ids along the path to the node whose link equals the current route.
/// Unmatched levels are `None`; no match at all leaves every level empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSelection {
    pub level1: Option<NodeId>,
    pub level2: Option<NodeId>,
    pub level3: Option<NodeId>,
    pub level4: Option<NodeId>,
}

impl ActiveSelection {
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a selection from a root-first id path; ids beyond level 4 are dropped.
    pub fn from_path(path: &[NodeId]) -> Self {
        let mut selection = Self::none();
        for (level, id) in Level::ALL.into_iter().zip(path) {
            *selection.slot_mut(level) = Some(id.clone());
        }
        selection
    }

    pub fn get(&self, level: Level) -> Option<&NodeId> {
        match level {
            Level::One => self.level1.as_ref(),
            Level::Two => self.level2.as_ref(),
            Level::Three => self.level3.as_ref(),
            Level::Four => self.level4.as_ref(),
        }
    }

    fn slot_mut(&mut self, level: Level) -> &mut Option<NodeId> {
        match level {
            Level::One => &mut self.level1,
            Level::Two => &mut self.level2,
            Level::Three => &mut self.level3,
            Level::Four => &mut self.level4,
        }
    }

    /// Leading populated levels, root first.
    pub fn path(&self) -> Vec<NodeId> {
        Level::ALL
            .into_iter()
            .map_while(|level| self.get(level).cloned())
            .collect()
    }

    pub fn deepest(&self) -> Option<(Level, &NodeId)> {
        Level::ALL
            .into_iter()
            .rev()
            .find_map(|level| self.get(level).map(|id| (level, id)))
    }

    pub fn is_empty(&self) -> bool {
        self.level1.is_none()
    }

    /// True when `path` is the selection's path or one of its ancestors.
    pub fn is_on_path(&self, path: &[NodeId]) -> bool {
        !path.is_empty()
            && path.len() <= Level::ALL.len()
            && Level::ALL
                .into_iter()
                .zip(path)
                .all(|(level, id)| self.get(level) == Some(id))
    }

    pub fn is_current(&self, path: &[NodeId]) -> bool {
        self.is_on_path(path) && self.path().len() == path.len()
    }
}
