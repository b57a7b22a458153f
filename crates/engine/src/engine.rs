//! The engine module is the boundary of the crate: one request carrying a
//! per-block snapshot goes in, one report carrying violations, exceptions,
//! and the evaluation trace comes out. Evaluation is pure and synchronous.

use crate::{
    bonds, checks, outcome,
    state::{GameSnapshot, TargetParams},
    tree::ClaimTree,
    ValidateReport,
};
use alloy_primitives::Address;
use sentinel_primitives::DisputeGame;
use serde::{Deserialize, Serialize};

/// The [ValidateRequest] struct bundles everything one evaluation needs: the
/// watched game, the parties and thresholds to audit, and the block snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRequest {
    /// The address of the dispute game under audit.
    pub game_address: Address,
    /// The distinguished addresses and thresholds the checks run against.
    pub params: TargetParams,
    /// The per-block chain state.
    pub snapshot: GameSnapshot,
}

/// The [InvariantEngine] struct evaluates the dispute game invariants over a
/// block snapshot. The engine itself is stateless; every evaluation stands
/// alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvariantEngine;

impl InvariantEngine {
    /// Creates a new [InvariantEngine].
    pub fn new() -> Self {
        Self
    }

    /// Evaluates every invariant over the given request.
    ///
    /// Checks that depend on game-local activity only run when the game
    /// address appears in the block's call trace; the factory-level checks
    /// run unconditionally. A data-integrity fault in one check is recorded
    /// as an exception and never suppresses the findings of the others.
    pub fn validate(&self, request: &ValidateRequest) -> ValidateReport {
        let ValidateRequest { game_address, params, snapshot } = request;
        let mut report = ValidateReport::default();

        tracing::debug!(
            target: "sentinel-engine",
            game = %game_address,
            claims = snapshot.claims.len(),
            moves = snapshot.moves.len(),
            "evaluating dispute game invariants"
        );

        let tree = match ClaimTree::new(snapshot.claims.clone()) {
            Ok(tree) => Some(tree),
            Err(e) => {
                report.exceptions.push(format!("claim tree: {e}"));
                None
            }
        };

        let touched = snapshot.touches(*game_address);
        if let Some(tree) = &tree {
            report.trace.created_claims = tree.created_claims(&snapshot.moves);

            if touched {
                if let Some(challenger) = params.honest_challenger {
                    match outcome::check_challenger(
                        tree,
                        &snapshot.moves,
                        snapshot.status(),
                        challenger,
                    ) {
                        Ok(outcome) => {
                            report.trace.target_role = outcome.role;
                            report.violations.extend(outcome.violations);
                        }
                        Err(e) => report.exceptions.push(format!("challenger outcome: {e}")),
                    }
                }

                report.record(
                    "credit reconciliation",
                    bonds::check_credit_bond(
                        tree,
                        &snapshot.resolve_claim_calls,
                        &snapshot.unlocks,
                    ),
                );
                match bonds::check_conservation(
                    tree,
                    &snapshot.resolve_claim_calls,
                    &snapshot.unlocks,
                    &snapshot.past_withdrawals,
                    snapshot.eth_balance,
                ) {
                    Ok(outcome) => {
                        report.trace.future_eth_unlocked = outcome.future_eth_unlocked;
                        report.trace.current_eth_unlocked = outcome.current_eth_unlocked;
                        report.violations.extend(outcome.violations);
                    }
                    Err(e) => report.exceptions.push(format!("eth conservation: {e}")),
                }
            }

            // The challenged-proposal check watches the factory's proposer
            // and runs regardless of the call trace.
            if let (Some(proposer), Some(challenger)) = (params.proposer, params.challenger) {
                report.record(
                    "challenged proposal",
                    outcome::check_challenged_proposal(
                        tree,
                        &snapshot.moves,
                        proposer,
                        challenger,
                    ),
                );
            }
        }

        if touched {
            report.violations.extend(bonds::check_withdrawals(
                &snapshot.withdrawals,
                &snapshot.unlocks,
                &snapshot.claim_calls,
                params.withdrawal_delay,
            ));
        }

        // Coverage compares balances read directly from the game and its
        // vault, so it runs regardless of the call trace.
        report.violations.extend(bonds::check_credit_coverage(
            snapshot.credit_balances,
            snapshot.eth_balance,
        ));

        let (duplicates, flags) =
            checks::check_duplicate_games(&snapshot.new_games, &snapshot.historical_games);
        report.trace.duplicate_games = flags;
        report.violations.extend(duplicates);
        report.violations.extend(checks::check_unresolvable(
            snapshot.timestamps,
            snapshot.current_timestamp,
            params.extra_time,
        ));

        if !report.violations.is_empty() || !report.exceptions.is_empty() {
            tracing::warn!(
                target: "sentinel-engine",
                game = %game_address,
                violations = report.violations.len(),
                exceptions = report.exceptions.len(),
                "dispute game invariants breached"
            );
        }
        report
    }
}
