//! The tree module assembles the claim forest for one game from the raw claim
//! array. Claims form a DAG of parent references, so the tree is kept as an
//! arena indexed by `u32` with a children index derived once per evaluation.

use crate::state::{ClaimData, MoveEvent};
use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;

/// The [ClaimTree] struct holds the claim arena of a single dispute game
/// along with a derived child index. Construction validates the parent
/// references; a dangling parent is a data-integrity fault and is propagated
/// as an error rather than reported as a violation.
#[derive(Debug, Clone, Default)]
pub struct ClaimTree {
    /// The claim arena, in on-chain order.
    claims: Vec<ClaimData>,
    /// The indices of each claim's children, derived from the parent links.
    children: HashMap<u32, Vec<u32>>,
}

impl ClaimTree {
    /// Builds a [ClaimTree] from the raw claim array.
    ///
    /// ### Takes
    /// - `claims`: The claim array of the game, in on-chain order.
    ///
    /// ### Returns
    /// - `Ok(ClaimTree)`: The assembled tree.
    /// - `Err(anyhow::Error)`: A claim references a parent that does not exist
    ///   or was created after it.
    pub fn new(claims: Vec<ClaimData>) -> Result<Self> {
        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        for (index, claim) in claims.iter().enumerate() {
            if claim.is_root() {
                continue;
            }
            // Moves may only counter claims that already exist, so a valid
            // parent index is always smaller than the claim's own index.
            if claim.parent_index as usize >= index {
                bail!(
                    "claim {} references dangling parent index {}",
                    index,
                    claim.parent_index
                );
            }
            children.entry(claim.parent_index).or_default().push(index as u32);
        }
        Ok(Self { claims, children })
    }

    /// Returns the number of claims in the tree.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns `true` if the tree holds no claims.
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Fetches the [ClaimData] at the given index in the arena.
    pub fn get(&self, index: u32) -> Option<&ClaimData> {
        self.claims.get(index as usize)
    }

    /// Returns the indices of the claims made against the claim at `index`.
    pub fn children(&self, index: u32) -> &[u32] {
        self.children.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the index and data of the root claim, if present.
    pub fn root(&self) -> Option<(u32, &ClaimData)> {
        self.claims
            .iter()
            .enumerate()
            .find(|(_, c)| c.is_root())
            .map(|(i, c)| (i as u32, c))
    }

    /// Returns the depth of the claim at `index`, derived by walking the
    /// parent links up to the root. The root claim has depth zero.
    pub fn depth_of(&self, index: u32) -> Result<u64> {
        let mut depth = 0u64;
        let mut cursor = index;
        loop {
            let claim = self
                .get(cursor)
                .ok_or_else(|| anyhow!("claim index {} out of bounds", cursor))?;
            if claim.is_root() {
                return Ok(depth);
            }
            depth += 1;
            cursor = claim.parent_index;
        }
    }

    /// Returns an iterator over `(index, claim)` pairs for the claims made by
    /// the given address.
    pub fn claims_by(
        &self,
        claimant: alloy_primitives::Address,
    ) -> impl Iterator<Item = (u32, &ClaimData)> {
        self.claims
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.claimant == claimant)
            .map(|(i, c)| (i as u32, c))
    }

    /// Matches each in-block move to the claim record it created. Claims are
    /// matched by their `(parent_index, claimant)` pair and list position:
    /// when the same address moves against the same parent twice, the k-th
    /// such move pairs with the k-th such claim.
    ///
    /// ### Takes
    /// - `moves`: The moves observed in the current block, in emission order.
    ///
    /// ### Returns
    /// - One entry per move: the index of the created claim, or `None` if no
    ///   matching claim appears in the arena.
    pub fn created_claims(&self, moves: &[MoveEvent]) -> Vec<Option<u32>> {
        let mut occurrence: HashMap<(u32, alloy_primitives::Address), usize> = HashMap::new();
        moves
            .iter()
            .map(|mv| {
                let nth = occurrence.entry((mv.parent_index, mv.claimant)).or_insert(0);
                let found = self
                    .claims
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| {
                        !c.is_root()
                            && c.parent_index == mv.parent_index
                            && c.claimant == mv.claimant
                    })
                    .nth(*nth)
                    .map(|(i, _)| i as u32);
                *nth += 1;
                found
            })
            .collect()
    }
}
