//! The engine crate contains the dispute game invariant engine. Given a
//! snapshot of one block's on-chain activity for a single dispute game, the
//! engine determines the attack/defense role of every move, whether a
//! distinguished party's claims were countered, whether the top-level and
//! subgame outcomes are consistent with that party's intent, and whether the
//! bonded ETH accounting stays conserved across resolution and withdrawal.

extern crate sentinel_primitives;

mod traits;
pub use traits::{ChessClock, Gindex};

mod position;
pub use position::{compute_gindex, Position};

mod clock;
pub use clock::Clock;

mod state;
pub use state::{
    ClaimData, CreditBalances, CreditUnlock, GameSnapshot, GameTimestamps, HistoricalGame,
    MoveEvent, NewGame, ResolveClaimCall, TargetParams, Withdrawal,
};

mod tree;
pub use tree::ClaimTree;

mod role;
pub use role::ClaimRole;

mod outcome;
pub use outcome::{ChallengerOutcome, TargetRole};

mod bonds;
pub use bonds::{ConservationOutcome, FULL_SUBGAME_RESOLUTION};

mod checks;
pub use checks::game_uuid;

mod report;
pub use report::{EvaluationTrace, ValidateReport, Violation};

mod engine;
pub use engine::{InvariantEngine, ValidateRequest};
