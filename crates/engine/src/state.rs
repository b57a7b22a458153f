//! This module contains the in-memory representation of the per-block
//! snapshot that the engine evaluates. Every type here is a read-only view
//! over on-chain data; nothing in a snapshot outlives a single evaluation.

use crate::{Clock, Position};
use alloy_primitives::{Address, Bytes, B256, U256};
use sentinel_primitives::{Claim, DisputeGame, GameStatus, GameType};
use serde::{Deserialize, Serialize};

/// The sentinel parent index carried by the root claim, `type(uint32).max`.
pub const ROOT_PARENT_INDEX: u32 = u32::MAX;

/// The [ClaimData] struct holds the data associated with a claim within a
/// fault dispute game's state on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimData {
    /// The index of the parent claim in the claim array, or [ROOT_PARENT_INDEX]
    /// for the root claim.
    pub parent_index: u32,
    /// The address that countered this claim, or the zero address if the claim
    /// stands uncountered.
    pub countered_by: Address,
    /// The address that made this claim.
    pub claimant: Address,
    /// The ETH bonded against the claim.
    pub bond: U256,
    /// The claimed value at this position.
    pub value: Claim,
    /// The generalized index of the claim within the position tree.
    pub position: Position,
    /// The chess clock state of the claim.
    pub clock: Clock,
}

impl ClaimData {
    /// Returns `true` if this claim is the root claim of its game.
    pub fn is_root(&self) -> bool {
        self.parent_index == ROOT_PARENT_INDEX
    }

    /// Returns `true` if an opposing claim has been recorded against this claim.
    pub fn is_countered(&self) -> bool {
        self.countered_by != Address::ZERO
    }
}

/// A `move` call observed on-chain, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    /// The index of the claim being moved against.
    pub parent_index: u32,
    /// The claim hash committed to by the move.
    pub claim: Claim,
    /// The address that made the move.
    pub claimant: Address,
}

/// A `resolveClaim` call observed on-chain, signaling progress walking a
/// claim's subgame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveClaimCall {
    /// The index of the claim whose subgame is being resolved.
    pub claim_index: u32,
    /// The number of subgames resolved by the call. A count of
    /// [crate::FULL_SUBGAME_RESOLUTION] or more means the subgame has been
    /// fully walked.
    pub resolved_subgames: u64,
}

/// A credit unlock recorded on the DelayedWETH vault for a game participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditUnlock {
    /// The dispute game that unlocked the credit.
    pub source: Address,
    /// The recipient of the credit.
    pub recipient: Address,
    /// The amount of ETH credited.
    pub amount: U256,
    /// The timestamp at which the unlock occurred. Each unlock restarts the
    /// withdrawal delay for its `(source, recipient)` pair.
    pub timestamp: u64,
}

/// A withdrawal of previously unlocked credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// The recipient of the withdrawal.
    pub recipient: Address,
    /// The amount of ETH withdrawn.
    pub amount: U256,
    /// The timestamp at which the withdrawal occurred.
    pub timestamp: u64,
}

/// A dispute game created by the factory in the current block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    /// The type of the created game.
    pub game_type: GameType,
    /// The root claim the game was created with.
    pub root_claim: Claim,
    /// The factory-supplied extra data (e.g. the disputed L2 block number).
    pub extra_data: Bytes,
}

/// A previously created dispute game, supplied as an immutable lookup for the
/// duplicate-game detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalGame {
    /// The type the game was created with.
    pub game_type: GameType,
    /// The content UUID of the game.
    pub uuid: B256,
}

/// Credit balances read from the game and its DelayedWETH vault, used by the
/// credit-coverage check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalances {
    /// The credit recorded on the dispute game for the audited claim.
    pub claim_credit: U256,
    /// The total credit recorded on the DelayedWETH vault for the game.
    pub total_credit: U256,
}

/// The creation and resolution timestamps of the game, used by the
/// resolution-timeout check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTimestamps {
    /// The UNIX timestamp of the game's creation.
    pub created_at: u64,
    /// The duration of one side of the game's chess clock, in seconds.
    pub game_duration: u64,
    /// The UNIX timestamp at which the game resolved, or zero if unresolved.
    pub resolved_at: u64,
}

/// Role-specific addresses and thresholds the invariant checks are
/// parameterized by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetParams {
    /// The honest challenger address whose claims are audited by the subgame
    /// outcome resolver.
    pub honest_challenger: Option<Address>,
    /// The proposer whose root claims are watched by the challenged-proposal
    /// check.
    pub proposer: Option<Address>,
    /// The challenger paired with `proposer` for the challenged-proposal check.
    pub challenger: Option<Address>,
    /// The DelayedWETH withdrawal delay, in seconds.
    pub withdrawal_delay: u64,
    /// The slack granted past `2 * game_duration` before a game is considered
    /// unresolvable, in seconds.
    pub extra_time: u64,
}

/// The [GameSnapshot] struct bundles the per-block chain state relevant to
/// the invariant checks. Checks whose inputs are absent from the snapshot
/// evaluate to no violations; they never guess at missing data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// The claim array of the game, in on-chain order.
    pub claims: Vec<ClaimData>,
    /// The move history supplied for this evaluation, in emission order.
    pub moves: Vec<MoveEvent>,
    /// The status of the game from its resolution event.
    pub resolution: GameStatus,
    /// The `resolveClaim` calls observed for the game.
    pub resolve_claim_calls: Vec<ResolveClaimCall>,
    /// The credit unlocks observed on the DelayedWETH vault.
    pub unlocks: Vec<CreditUnlock>,
    /// The withdrawals observed on the DelayedWETH vault.
    pub withdrawals: Vec<Withdrawal>,
    /// The recipients that issued a `claim` call in the current block. Only
    /// withdrawals for these recipients are audited for delay violations.
    pub claim_calls: Vec<Address>,
    /// The amounts of withdrawals already paid out in past blocks.
    pub past_withdrawals: Vec<U256>,
    /// The current ETH balance of the dispute game, when read this block.
    pub eth_balance: Option<U256>,
    /// Credit balances for the coverage check, when read this block.
    pub credit_balances: Option<CreditBalances>,
    /// The game's creation/resolution timestamps, when read this block.
    pub timestamps: Option<GameTimestamps>,
    /// The UNIX timestamp of the current block.
    pub current_timestamp: u64,
    /// The addresses touched by the current block's call trace. Trace-gated
    /// checks perform no work when the game address is absent from this list.
    pub addresses_in_trace: Vec<Address>,
    /// Dispute games created by the factory in the current block.
    pub new_games: Vec<NewGame>,
    /// UUIDs of games created in past blocks, as an immutable lookup.
    pub historical_games: Vec<HistoricalGame>,
}

impl GameSnapshot {
    /// Returns `true` if the given game address was touched by the current
    /// block's call trace.
    pub fn touches(&self, game: Address) -> bool {
        self.addresses_in_trace.contains(&game)
    }
}

impl DisputeGame for GameSnapshot {
    fn root_claim(&self) -> Claim {
        self.claims
            .iter()
            .find(|c| c.is_root())
            .map(|c| c.value)
            .unwrap_or_default()
    }

    fn status(&self) -> GameStatus {
        self.resolution
    }
}
