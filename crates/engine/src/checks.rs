//! The checks module holds the factory-level checks: duplicate game
//! detection over content UUIDs and the resolution-timeout check. Neither is
//! gated on the call trace; a duplicate or stalled game is reportable even
//! when the watched game saw no activity.

use crate::{
    state::{GameTimestamps, HistoricalGame, NewGame},
    Violation,
};
use alloy_primitives::{keccak256, Bytes, B256};
use alloy_sol_types::SolValue;
use sentinel_primitives::{Claim, GameType};

/// Computes the content UUID of a dispute game, the keccak-256 digest of the
/// ABI-encoded `(uint32 gameType, bytes32 rootClaim, bytes extraData)` tuple.
/// This mirrors the factory's own dedup key.
pub fn game_uuid(game_type: GameType, root_claim: Claim, extra_data: &Bytes) -> B256 {
    let preimage = (game_type as u8 as u32, root_claim, extra_data.clone());
    keccak256(preimage.abi_encode())
}

/// Checks each newly created game against every previously seen UUID and
/// against its same-block siblings. UUIDs only collide within the same game
/// type; re-proposing the same root under a different game type is legal.
///
/// ### Returns
/// - The violations found, plus one flag per new game marking whether it
///   duplicated an existing UUID.
pub fn check_duplicate_games(
    new_games: &[NewGame],
    historical_games: &[HistoricalGame],
) -> (Vec<Violation>, Vec<bool>) {
    let mut violations = Vec::new();
    let mut flags = Vec::with_capacity(new_games.len());
    let mut seen: Vec<(GameType, B256)> = historical_games
        .iter()
        .map(|g| (g.game_type, g.uuid))
        .collect();

    for game in new_games {
        let uuid = game_uuid(game.game_type, game.root_claim, &game.extra_data);
        let duplicate = seen.contains(&(game.game_type, uuid));
        if duplicate {
            tracing::warn!(target: "sentinel-engine", %uuid, "duplicate dispute game created");
            violations.push(Violation::DuplicateDisputeGame { uuid });
        }
        flags.push(duplicate);
        seen.push((game.game_type, uuid));
    }
    (violations, flags)
}

/// Checks whether an unresolved game has outlived its resolution time limit,
/// `created_at + 2 * game_duration` plus the configured slack.
pub fn check_unresolvable(
    timestamps: Option<GameTimestamps>,
    current_timestamp: u64,
    extra_time: u64,
) -> Vec<Violation> {
    let Some(ts) = timestamps else {
        return Vec::new();
    };
    if ts.resolved_at != 0 {
        return Vec::new();
    }
    let deadline = ts
        .created_at
        .saturating_add(ts.game_duration.saturating_mul(2))
        .saturating_add(extra_time);
    if current_timestamp > deadline {
        vec![Violation::UnresolvableGame { overdue_by: current_timestamp - deadline }]
    } else {
        Vec::new()
    }
}
