//! The traits module contains traits used throughout the library.

use crate::{dispute_game::Claim, GameStatus};

/// The [DisputeGame] trait describes the state of a simple primitive dispute.
/// It has several key properties:
///
/// - It houses a root [Claim], a 32 byte commitment, which is the claim being
///   disputed.
/// - It can exist in one of three states, as indicated by the [GameStatus] enum.
///     1. [GameStatus::InProgress] - The dispute game is still in progress.
///     2. [GameStatus::ChallengerWins] - The challenger of the root claim has won
///        the dispute game.
///     3. [GameStatus::DefenderWins] - The defender of the root claim has won the
///        dispute game.
///
/// Sentinel never resolves disputes itself; implementors only expose the state
/// that was observed on-chain so that the invariant checks can audit it.
pub trait DisputeGame {
    /// Returns the root claim of the dispute game. The root claim is a 32 byte
    /// commitment to what is being disputed.
    fn root_claim(&self) -> Claim;

    /// Returns the status of the dispute game as observed in the snapshot.
    fn status(&self) -> GameStatus;
}
