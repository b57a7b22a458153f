//! The role module derives the attack/defense role of a claim from its
//! position encoding. The bit-level strategy lives here alone so a corrected
//! encoding stays a one-file change.

use crate::{position::ROOT_POSITION, Position};
use serde::{Deserialize, Serialize};

/// The [ClaimRole] enum describes the role a claim plays against its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimRole {
    /// The claim disagrees with its parent and commits to the left child
    /// position.
    Attack,
    /// The claim agrees with its parent but disagrees further up the lineage,
    /// committing to the right child position.
    Defend,
}

impl ClaimRole {
    /// Derives the role of a claim from its position. The root claim carries
    /// no role of its own; it *is* the proposal.
    pub fn from_position(position: Position) -> Option<Self> {
        if position <= ROOT_POSITION {
            return None;
        }
        // A left child has an even generalized index.
        if position & 1 == 0 {
            Some(Self::Attack)
        } else {
            Some(Self::Defend)
        }
    }
}
