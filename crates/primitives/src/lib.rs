//! Primitives for Sentinel, an invariant engine for the OP Stack's dispute
//! protocol. These types describe the on-chain vocabulary shared by every
//! invariant check: claims, game types, and game statuses.

mod dispute_game;
pub use dispute_game::{Claim, GameStatus, GameType};

mod traits;
pub use traits::DisputeGame;
