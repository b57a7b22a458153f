//! The report module holds the violation and response types that make up the
//! engine's output. Violations are the expected product of a correctly
//! functioning engine and are ordinary values; exceptions are data-integrity
//! faults raised by malformed input. The two categories are disjoint and
//! neither suppresses the other.

use crate::outcome::TargetRole;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The [Violation] enum describes a breached invariant detected for a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    /// The distinguished challenger's side lost the top-level game.
    ChallengerLostTopLevel {
        /// The role the challenger took against the root claim.
        role: TargetRole,
    },
    /// A claim made by the distinguished challenger was countered, losing its
    /// bond regardless of the top-level outcome.
    ChallengerLostSubgame {
        /// The index of the countered claim.
        claim_index: u32,
    },
    /// The watched challenger attacked a root claim proposed by the watched
    /// proposer.
    ProposalChallenged {
        /// The index of the attacking claim.
        claim_index: u32,
    },
    /// The credit unlocked for a resolved claim does not match its bond, or
    /// was credited to the wrong address.
    CreditBondMismatch {
        /// The index of the resolved claim.
        claim_index: u32,
    },
    /// Bonded ETH accounting does not balance against the game's balance.
    EthDeficit {
        /// The total implied by the bond and credit ledger.
        expected: U256,
        /// The total observed on-chain.
        actual: U256,
    },
    /// A withdrawal was paid out before its delay elapsed, or without a
    /// matching set of unlocks.
    WithdrawnTooEarly {
        /// The recipient of the withdrawal.
        recipient: Address,
    },
    /// A newly created game shares its UUID with another game of the same type.
    DuplicateDisputeGame {
        /// The colliding UUID.
        uuid: B256,
    },
    /// The game has exceeded its resolution time limit without resolving.
    UnresolvableGame {
        /// The number of seconds elapsed past the limit.
        overdue_by: u64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChallengerLostTopLevel { role } => {
                write!(f, "Challenger lost the dispute game while {role} a state root")
            }
            Self::ChallengerLostSubgame { claim_index } => {
                write!(f, "Challenger lost one or more subgames (claim index {claim_index})")
            }
            Self::ProposalChallenged { claim_index } => {
                write!(
                    f,
                    "Root claim proposed by the watched proposer was attacked by the watched challenger (claim index {claim_index})"
                )
            }
            Self::CreditBondMismatch { claim_index } => {
                write!(f, "Unlocked credit does not match the bond for claim index {claim_index}")
            }
            Self::EthDeficit { expected, actual } => {
                write!(f, "ETH deficit on the dispute game: expected {expected}, found {actual}")
            }
            Self::WithdrawnTooEarly { recipient } => {
                write!(f, "ETH withdrawn too early or without a matching unlock for {recipient}")
            }
            Self::DuplicateDisputeGame { uuid } => {
                write!(f, "Duplicate dispute game created with UUID {uuid}")
            }
            Self::UnresolvableGame { overdue_by } => {
                write!(f, "Dispute game unresolved {overdue_by}s past its resolution time limit")
            }
        }
    }
}

/// Structured intermediate state surfaced for debugging alongside the
/// violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationTrace {
    /// The role resolved for the distinguished challenger, when one applied.
    pub target_role: Option<TargetRole>,
    /// The claim index created by each in-block move, when matched.
    pub created_claims: Vec<Option<u32>>,
    /// The ETH still owed to future subgame resolutions.
    pub future_eth_unlocked: Option<U256>,
    /// The ETH already credited, net of past withdrawals.
    pub current_eth_unlocked: Option<U256>,
    /// One flag per newly created game: `true` if it duplicated an existing
    /// UUID.
    pub duplicate_games: Vec<bool>,
}

/// The [ValidateReport] struct is the engine's response for one evaluation:
/// every violated invariant, every data-integrity fault, and the trace of
/// intermediate state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateReport {
    /// The invariants violated in the block.
    pub violations: Vec<Violation>,
    /// Data-integrity faults encountered while evaluating. A fault in one
    /// check never suppresses the findings of independent checks.
    pub exceptions: Vec<String>,
    /// Intermediate state for debugging.
    pub trace: EvaluationTrace,
}

impl ValidateReport {
    /// Folds a check result into the report: violations are appended,
    /// exceptions recorded under the check's name.
    pub(crate) fn record(&mut self, check: &str, result: anyhow::Result<Vec<Violation>>) {
        match result {
            Ok(mut violations) => self.violations.append(&mut violations),
            Err(e) => self.exceptions.push(format!("{check}: {e}")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Violation;
    use crate::outcome::TargetRole;

    #[test]
    fn top_level_messages() {
        let challenging = Violation::ChallengerLostTopLevel { role: TargetRole::Attacking };
        let defending = Violation::ChallengerLostTopLevel { role: TargetRole::Defending };
        assert_eq!(
            challenging.to_string(),
            "Challenger lost the dispute game while challenging a state root"
        );
        assert_eq!(
            defending.to_string(),
            "Challenger lost the dispute game while defending a state root"
        );
    }

    #[test]
    fn subgame_message() {
        let violation = Violation::ChallengerLostSubgame { claim_index: 3 };
        assert!(violation.to_string().contains("Challenger lost one or more subgames"));
    }
}
