//! The clock module holds the [Clock] type.

use crate::ChessClock;

/// A packed chess clock value as stored on each claim: the high 64 bits hold
/// the duration elapsed and the low 64 bits the timestamp of the last update.
pub type Clock = u128;

impl ChessClock for Clock {
    fn duration(&self) -> u64 {
        (self >> 64) as u64
    }

    fn timestamp(&self) -> u64 {
        (self & u64::MAX as u128) as u64
    }
}
