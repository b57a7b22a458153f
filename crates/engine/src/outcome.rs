//! The outcome module resolves, per distinguished address, whether each of
//! its claims was countered and whether the top-level and subgame verdicts
//! are consistent with the role it took against the root claim.

use crate::{
    role::ClaimRole,
    state::MoveEvent,
    tree::ClaimTree,
    Violation,
};
use alloy_primitives::Address;
use anyhow::{anyhow, Result};
use sentinel_primitives::GameStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The [TargetRole] enum describes the side a distinguished address took in
/// the top-level game, resolved once from its earliest observed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRole {
    /// The address is challenging the root claim.
    Attacking,
    /// The address is defending the root claim.
    Defending,
}

impl fmt::Display for TargetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attacking => write!(f, "challenging"),
            Self::Defending => write!(f, "defending"),
        }
    }
}

/// The result of auditing the distinguished challenger's claims.
#[derive(Debug, Clone, Default)]
pub struct ChallengerOutcome {
    /// The role resolved for the challenger, when it moved at all.
    pub role: Option<TargetRole>,
    /// The violations found.
    pub violations: Vec<Violation>,
}

/// Audits the outcome of the game from the perspective of the distinguished
/// challenger address.
///
/// The challenger's intended role follows from the depth of the claim its
/// earliest move countered: moves against even-depth claims side with the
/// challenger of the root, moves against odd-depth claims with its defender.
/// A resolved status contradicting that role is a top-level loss, and every
/// countered claim owned by the challenger is a subgame loss regardless of
/// the top-level verdict.
pub fn check_challenger(
    tree: &ClaimTree,
    moves: &[MoveEvent],
    status: GameStatus,
    challenger: Address,
) -> Result<ChallengerOutcome> {
    // A block with no moves or no claims beyond the root has nothing to
    // evaluate yet.
    if moves.is_empty() || tree.len() <= 1 {
        return Ok(ChallengerOutcome::default());
    }
    let Some(first_move) = moves.iter().find(|m| m.claimant == challenger) else {
        return Ok(ChallengerOutcome::default());
    };

    let parent_depth = tree
        .depth_of(first_move.parent_index)
        .map_err(|e| anyhow!("move references unknown claim: {e}"))?;
    let role = if parent_depth % 2 == 0 {
        TargetRole::Attacking
    } else {
        TargetRole::Defending
    };

    let mut violations = Vec::new();
    let lost_top_level = matches!(
        (role, status),
        (TargetRole::Attacking, GameStatus::DefenderWins)
            | (TargetRole::Defending, GameStatus::ChallengerWins)
    );
    if lost_top_level {
        tracing::warn!(
            target: "sentinel-engine",
            "challenger {challenger} lost the top-level game while {role} the root"
        );
        violations.push(Violation::ChallengerLostTopLevel { role });
    }

    // Countered claims lose their bond on that branch even when the top-level
    // game went the challenger's way, so this fires independently, once per
    // countered claim index.
    for (index, claim) in tree.claims_by(challenger) {
        if !claim.is_root() && claim.is_countered() {
            violations.push(Violation::ChallengerLostSubgame { claim_index: index });
        }
    }

    Ok(ChallengerOutcome { role: Some(role), violations })
}

/// Audits whether the watched challenger attacked a root claim proposed by
/// the watched proposer. Defense moves and third parties never raise, and a
/// block without move events has nothing to evaluate.
pub fn check_challenged_proposal(
    tree: &ClaimTree,
    moves: &[MoveEvent],
    proposer: Address,
    challenger: Address,
) -> Result<Vec<Violation>> {
    if moves.is_empty() {
        return Ok(Vec::new());
    }
    let Some((root_index, root)) = tree.root() else {
        return Ok(Vec::new());
    };
    if root.claimant != proposer {
        return Ok(Vec::new());
    }

    let violations = tree
        .claims_by(challenger)
        .filter(|(_, claim)| {
            !claim.is_root()
                && claim.parent_index == root_index
                && ClaimRole::from_position(claim.position) == Some(ClaimRole::Attack)
        })
        .map(|(claim_index, _)| Violation::ProposalChallenged { claim_index })
        .collect();
    Ok(violations)
}
