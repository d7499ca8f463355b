//! Support conditions

use serde::{Deserialize, Serialize};

/// Support condition at a node
///
/// Restraints are listed per local DOF `[DX, DY, RZ]`. Roller names follow
/// the direction the node is free to slide in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Support {
    /// No restraint
    #[default]
    Free,
    /// All three DOFs restrained
    Fixed,
    /// Translations restrained, rotation free
    Pinned,
    /// Slides along X: only DY restrained
    RollerX,
    /// Slides along Y: only DX restrained
    RollerY,
}

impl Support {
    /// Restraint flags `[DX, DY, RZ]`
    pub fn restraints(&self) -> [bool; 3] {
        match self {
            Support::Free => [false, false, false],
            Support::Fixed => [true, true, true],
            Support::Pinned => [true, true, false],
            Support::RollerX => [false, true, false],
            Support::RollerY => [true, false, false],
        }
    }

    /// Get list of restrained DOF indices (0-2)
    pub fn restrained_dofs(&self) -> Vec<usize> {
        self.restraints()
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| r.then_some(i))
            .collect()
    }

    /// Get list of free DOF indices (0-2)
    pub fn free_dofs(&self) -> Vec<usize> {
        self.restraints()
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| (!r).then_some(i))
            .collect()
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        !matches!(self, Support::Free)
    }
}
