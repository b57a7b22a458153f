//! The position module holds the [Position] type and its [Gindex] implementation.

use crate::Gindex;

/// A generalized index within the dispute game's binary position tree.
pub type Position = u128;

/// The position of the root claim within the tree.
pub const ROOT_POSITION: Position = 1;

/// Computes a generalized index from a depth and index at depth.
///
/// ### Takes
/// - `depth`: The depth of the generalized index.
/// - `index_at_depth`: The index at depth of the generalized index.
///
/// ### Returns
/// - `u128`: The generalized index: `2^{depth} + index_at_depth`.
pub fn compute_gindex(depth: u8, index_at_depth: u64) -> u128 {
    2u128.pow(depth as u32) + index_at_depth as u128
}

/// Implementation of the [Gindex] trait for the [Position] type alias.
impl Gindex for Position {
    fn depth(&self) -> u8 {
        127 - self.leading_zeros() as u8
    }

    fn index_at_depth(&self) -> u64 {
        (self - (1 << self.depth())) as u64
    }

    fn left(&self) -> Self {
        self << 1
    }

    fn right(&self) -> Self {
        self.left() | 1
    }

    fn parent(&self) -> Self {
        self >> 1
    }

    fn make_move(&self, is_attack: bool) -> Self {
        self.left() | !is_attack as u128
    }
}
