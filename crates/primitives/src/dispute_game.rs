//! Types related to the [crate::DisputeGame] trait.

use alloy_primitives::B256;
use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// The [Claim] type is an alias to [B256], used to deliniate a claim hash from a regular hash.
pub type Claim = B256;

/// The [GameType] enum is used to indicate which type of dispute game was cloned from the
/// dispute game factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameType {
    /// The [GameType::Fault] variant is used to indicate that the dispute game is being played
    /// over a FaultDisputeGame backed by a fault proof VM.
    Fault = 0,
    /// The [GameType::Validity] variant is used to indicate that the dispute game is resolved
    /// by a validity proof.
    Validity = 1,
    /// The [GameType::OutputAttestation] variant is used to indicate that the dispute game is
    /// resolved by attestations over the proposed output root.
    OutputAttestation = 2,
}

impl TryFrom<u8> for GameType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameType::Fault),
            1 => Ok(GameType::Validity),
            2 => Ok(GameType::OutputAttestation),
            _ => bail!("Invalid game type"),
        }
    }
}

/// The [GameStatus] enum is used to indicate the status of a dispute game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// The [GameStatus::InProgress] variant is used to indicate that the dispute game is still
    /// in progress.
    #[default]
    InProgress = 0,
    /// The [GameStatus::ChallengerWins] variant is used to indicate that the challenger of the
    /// root claim has won the dispute game.
    ChallengerWins = 1,
    /// The [GameStatus::DefenderWins] variant is used to indicate that the defender of the
    /// root claim has won the dispute game.
    DefenderWins = 2,
}

impl TryFrom<u8> for GameStatus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameStatus::InProgress),
            1 => Ok(GameStatus::ChallengerWins),
            2 => Ok(GameStatus::DefenderWins),
            _ => bail!("Invalid game status"),
        }
    }
}
