//! This module holds traits shared by the invariant checks.

/// The [Gindex] trait defines the interface of a generalized index within a binary tree.
/// A "Generalized Index" is calculated as `2^{depth} + index_at_depth`.
pub trait Gindex {
    /// Returns the depth of the position within the tree.
    fn depth(&self) -> u8;

    /// Returns the index at depth of the position within the tree.
    fn index_at_depth(&self) -> u64;

    /// Returns the left child position relative to the current position.
    fn left(&self) -> Self;

    /// Returns the right child position relative to the current position.
    fn right(&self) -> Self;

    /// Returns the parent position relative to the current position.
    fn parent(&self) -> Self;

    /// Returns the relative position for an attack or defense move against the
    /// current position. An attack commits to the left child, a defense to the
    /// right child.
    fn make_move(&self, is_attack: bool) -> Self;
}

/// The [ChessClock] trait defines the interface of a single side of a chess clock at a given
/// state in time.
pub trait ChessClock {
    /// Returns the seconds elapsed on the chess clock in seconds when it was last stopped.
    fn duration(&self) -> u64;

    /// Returns the timestamp of when the chess clock was last stopped.
    fn timestamp(&self) -> u64;
}
