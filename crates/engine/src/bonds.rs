//! The bonds module reconciles the ETH side of a dispute game: unlocked
//! credit against claim bonds, total bonded ETH against the game's balance,
//! credit coverage on the DelayedWETH vault, and the withdrawal delay.

use crate::{
    state::{CreditBalances, CreditUnlock, ResolveClaimCall, Withdrawal},
    tree::ClaimTree,
    Violation,
};
use alloy_primitives::{Address, U256};
use anyhow::{bail, Result};
use std::collections::HashMap;

/// The `resolvedSubgames` count at which a claim's subgame has been fully
/// walked and its bond fully distributed.
pub const FULL_SUBGAME_RESOLUTION: u64 = 512;

/// The result of the ETH conservation check: the violations found plus the
/// two sides of the ledger, surfaced for the evaluation trace.
#[derive(Debug, Clone, Default)]
pub struct ConservationOutcome {
    /// The violations found.
    pub violations: Vec<Violation>,
    /// The ETH still owed to unresolved and partially resolved subgames.
    pub future_eth_unlocked: Option<U256>,
    /// The ETH already credited, net of past withdrawals.
    pub current_eth_unlocked: Option<U256>,
}

/// Checks that each resolved claim unlocked exactly its bond to the right
/// party.
///
/// The k-th `resolveClaim` call pairs with the k-th credit unlock. The
/// rewarded address must be the claim's `countered_by` when set, else its
/// claimant, and the amount must equal the claim's bond. A resolve call that
/// references a claim outside the arena is a data-integrity fault.
pub fn check_credit_bond(
    tree: &ClaimTree,
    resolve_calls: &[ResolveClaimCall],
    unlocks: &[CreditUnlock],
) -> Result<Vec<Violation>> {
    let mut violations = Vec::new();
    for (nth, call) in resolve_calls.iter().enumerate() {
        let Some(claim) = tree.get(call.claim_index) else {
            bail!("resolveClaim references unknown claim index {}", call.claim_index);
        };
        let expected_recipient = if claim.is_countered() {
            claim.countered_by
        } else {
            claim.claimant
        };
        let matches = unlocks
            .get(nth)
            .is_some_and(|u| u.recipient == expected_recipient && u.amount == claim.bond);
        if !matches {
            violations.push(Violation::CreditBondMismatch { claim_index: call.claim_index });
        }
    }
    Ok(violations)
}

/// Checks that the bonded ETH ledger balances against the game's on-chain
/// balance.
///
/// The ETH still owed to future resolutions is the sum of the bonds of every
/// claim with no `resolveClaim` call, plus a `resolvedSubgames / 512`
/// proportion of the bond of each partially resolved claim. That sum, plus
/// everything already unlocked, must equal the game's balance plus everything
/// already withdrawn. With no resolve calls the whole balance is future ETH
/// and the check has nothing to compare.
pub fn check_conservation(
    tree: &ClaimTree,
    resolve_calls: &[ResolveClaimCall],
    unlocks: &[CreditUnlock],
    past_withdrawals: &[U256],
    eth_balance: Option<U256>,
) -> Result<ConservationOutcome> {
    let Some(balance) = eth_balance else {
        return Ok(ConservationOutcome::default());
    };
    if resolve_calls.is_empty() {
        return Ok(ConservationOutcome::default());
    }

    let mut resolved: HashMap<u32, u64> = HashMap::new();
    for call in resolve_calls {
        if tree.get(call.claim_index).is_none() {
            bail!("resolveClaim references unknown claim index {}", call.claim_index);
        }
        resolved.insert(call.claim_index, call.resolved_subgames);
    }

    let mut future = U256::ZERO;
    for index in 0..tree.len() as u32 {
        let Some(claim) = tree.get(index) else {
            continue;
        };
        match resolved.get(&index) {
            None => future += claim.bond,
            Some(&subgames) if subgames < FULL_SUBGAME_RESOLUTION => {
                future += claim.bond * U256::from(subgames) / U256::from(FULL_SUBGAME_RESOLUTION);
            }
            Some(_) => {}
        }
    }

    let unlocked: U256 = unlocks.iter().map(|u| u.amount).sum();
    let withdrawn: U256 = past_withdrawals.iter().copied().sum();
    let current = unlocked.saturating_sub(withdrawn);

    let mut violations = Vec::new();
    if future + unlocked != balance + withdrawn {
        tracing::warn!(
            target: "sentinel-engine",
            %future,
            %unlocked,
            %withdrawn,
            %balance,
            "bonded ETH ledger does not balance"
        );
        violations.push(Violation::EthDeficit { expected: future + current, actual: balance });
    }

    Ok(ConservationOutcome {
        violations,
        future_eth_unlocked: Some(future),
        current_eth_unlocked: Some(current),
    })
}

/// Checks that the credit recorded for a claim is covered by the vault, and
/// the vault by the game's balance: `claim_credit <= total_credit <=
/// balance`. A vault with credit but none of it attributed to the claim is
/// also a deficit.
pub fn check_credit_coverage(
    credit_balances: Option<CreditBalances>,
    eth_balance: Option<U256>,
) -> Vec<Violation> {
    let Some(credit) = credit_balances else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    if credit.claim_credit > credit.total_credit {
        violations.push(Violation::EthDeficit {
            expected: credit.claim_credit,
            actual: credit.total_credit,
        });
    }
    if let Some(balance) = eth_balance {
        if credit.total_credit > balance {
            violations.push(Violation::EthDeficit {
                expected: credit.total_credit,
                actual: balance,
            });
        }
    }
    if credit.total_credit > U256::ZERO && credit.claim_credit.is_zero() {
        violations.push(Violation::EthDeficit {
            expected: credit.total_credit,
            actual: U256::ZERO,
        });
    }
    violations
}

/// Checks that withdrawn credit respected the DelayedWETH withdrawal delay.
///
/// Only withdrawals whose recipient issued a `claim` call in the block are
/// audited. A withdrawal must be backed by unlocks for its recipient that sum
/// to the withdrawn amount, and the delay clock runs from the latest
/// contributing unlock. An exactly elapsed delay passes.
pub fn check_withdrawals(
    withdrawals: &[Withdrawal],
    unlocks: &[CreditUnlock],
    claim_calls: &[Address],
    withdrawal_delay: u64,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for withdrawal in withdrawals {
        if !claim_calls.contains(&withdrawal.recipient) {
            continue;
        }

        let contributing: Vec<&CreditUnlock> = unlocks
            .iter()
            .filter(|u| u.recipient == withdrawal.recipient)
            .collect();
        let Some(latest) = contributing.iter().map(|u| u.timestamp).max() else {
            violations.push(Violation::WithdrawnTooEarly { recipient: withdrawal.recipient });
            continue;
        };
        let unlocked: U256 = contributing.iter().map(|u| u.amount).sum();
        if unlocked != withdrawal.amount {
            violations.push(Violation::WithdrawnTooEarly { recipient: withdrawal.recipient });
            continue;
        }
        // Every unlock restarts the clock for its recipient.
        if withdrawal.timestamp.saturating_sub(latest) < withdrawal_delay {
            violations.push(Violation::WithdrawnTooEarly { recipient: withdrawal.recipient });
        }
    }
    violations
}

#[cfg(test)]
mod test {
    use super::{
        check_conservation, check_credit_bond, check_credit_coverage, check_withdrawals,
        FULL_SUBGAME_RESOLUTION,
    };
    use crate::{
        state::{
            ClaimData, CreditBalances, CreditUnlock, ResolveClaimCall, Withdrawal,
            ROOT_PARENT_INDEX,
        },
        tree::ClaimTree,
        Violation,
    };
    use alloy_primitives::{Address, U256};
    use proptest::prelude::*;
    use sentinel_primitives::Claim;

    fn game() -> Address {
        Address::with_last_byte(0x47)
    }

    fn claim(
        parent_index: u32,
        claimant: Address,
        countered_by: Address,
        bond: u64,
    ) -> ClaimData {
        ClaimData {
            parent_index,
            countered_by,
            claimant,
            bond: U256::from(bond),
            value: Claim::default(),
            position: if parent_index == ROOT_PARENT_INDEX { 1 } else { 2 },
            clock: 0,
        }
    }

    fn unlock(recipient: Address, amount: u64, timestamp: u64) -> CreditUnlock {
        CreditUnlock { source: game(), recipient, amount: U256::from(amount), timestamp }
    }

    #[test]
    fn credit_matches_bond() {
        let proposer = Address::with_last_byte(0x01);
        let challenger = Address::with_last_byte(0x02);
        let tree = ClaimTree::new(vec![
            claim(ROOT_PARENT_INDEX, proposer, challenger, 100),
            claim(0, challenger, Address::ZERO, 50),
        ])
        .unwrap();
        let calls = [
            ResolveClaimCall { claim_index: 1, resolved_subgames: FULL_SUBGAME_RESOLUTION },
            ResolveClaimCall { claim_index: 0, resolved_subgames: FULL_SUBGAME_RESOLUTION },
        ];
        // Index 1 stands uncountered, so its claimant is rewarded; the root
        // was countered, so its challenger is.
        let unlocks = [unlock(challenger, 50, 10), unlock(challenger, 100, 10)];

        assert!(check_credit_bond(&tree, &calls, &unlocks).unwrap().is_empty());
    }

    #[test]
    fn credit_mismatches_raise_per_claim() {
        let proposer = Address::with_last_byte(0x01);
        let challenger = Address::with_last_byte(0x02);
        let tree = ClaimTree::new(vec![
            claim(ROOT_PARENT_INDEX, proposer, challenger, 100),
            claim(0, challenger, Address::ZERO, 50),
        ])
        .unwrap();
        let calls = [
            ResolveClaimCall { claim_index: 1, resolved_subgames: FULL_SUBGAME_RESOLUTION },
            ResolveClaimCall { claim_index: 0, resolved_subgames: FULL_SUBGAME_RESOLUTION },
        ];

        // Wrong amount on the first unlock, wrong recipient on the second.
        let unlocks = [unlock(challenger, 49, 10), unlock(proposer, 100, 10)];
        assert_eq!(
            check_credit_bond(&tree, &calls, &unlocks).unwrap(),
            vec![
                Violation::CreditBondMismatch { claim_index: 1 },
                Violation::CreditBondMismatch { claim_index: 0 },
            ]
        );

        // A resolve call with no paired unlock at all.
        let unlocks = [unlock(challenger, 50, 10)];
        assert_eq!(
            check_credit_bond(&tree, &calls, &unlocks).unwrap(),
            vec![Violation::CreditBondMismatch { claim_index: 0 }]
        );
    }

    #[test]
    fn unknown_claim_index_is_an_error() {
        let tree = ClaimTree::new(vec![claim(
            ROOT_PARENT_INDEX,
            Address::with_last_byte(0x01),
            Address::ZERO,
            100,
        )])
        .unwrap();
        let calls = [ResolveClaimCall { claim_index: 9, resolved_subgames: 512 }];
        assert!(check_credit_bond(&tree, &calls, &[]).is_err());
        assert!(check_conservation(&tree, &calls, &[], &[], Some(U256::from(100))).is_err());
    }

    #[test]
    fn conserved_ledger_passes() {
        let a = Address::with_last_byte(0x01);
        let b = Address::with_last_byte(0x02);
        let tree = ClaimTree::new(vec![
            claim(ROOT_PARENT_INDEX, a, b, 100),
            claim(0, b, Address::ZERO, 50),
        ])
        .unwrap();
        // The leaf resolved fully and its bond was unlocked; the root's bond
        // is still future ETH, so the game holds 100 + 50.
        let calls = [ResolveClaimCall { claim_index: 1, resolved_subgames: 512 }];
        let unlocks = [unlock(b, 50, 10)];

        let outcome =
            check_conservation(&tree, &calls, &unlocks, &[], Some(U256::from(150))).unwrap();
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.future_eth_unlocked, Some(U256::from(100)));
        assert_eq!(outcome.current_eth_unlocked, Some(U256::from(50)));
    }

    #[test]
    fn past_withdrawals_reduce_the_balance() {
        let a = Address::with_last_byte(0x01);
        let b = Address::with_last_byte(0x02);
        let tree = ClaimTree::new(vec![
            claim(ROOT_PARENT_INDEX, a, b, 100),
            claim(0, b, Address::ZERO, 50),
        ])
        .unwrap();
        let calls = [ResolveClaimCall { claim_index: 1, resolved_subgames: 512 }];
        let unlocks = [unlock(b, 50, 10)];
        let withdrawn = [U256::from(50)];

        let outcome =
            check_conservation(&tree, &calls, &unlocks, &withdrawn, Some(U256::from(100)))
                .unwrap();
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.current_eth_unlocked, Some(U256::ZERO));
    }

    #[test]
    fn partial_resolution_interpolates_the_bond() {
        let a = Address::with_last_byte(0x01);
        let tree = ClaimTree::new(vec![claim(ROOT_PARENT_INDEX, a, Address::ZERO, 512)]).unwrap();
        // Half the root's subgames walked: half its bond is still future ETH.
        let calls = [ResolveClaimCall { claim_index: 0, resolved_subgames: 256 }];

        let outcome =
            check_conservation(&tree, &calls, &[], &[], Some(U256::from(256))).unwrap();
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.future_eth_unlocked, Some(U256::from(256)));
    }

    #[test]
    fn skips_without_resolve_calls_or_balance() {
        let tree = ClaimTree::new(vec![claim(
            ROOT_PARENT_INDEX,
            Address::with_last_byte(0x01),
            Address::ZERO,
            100,
        )])
        .unwrap();

        // No resolve calls: the whole balance is future ETH by definition.
        let outcome = check_conservation(&tree, &[], &[], &[], Some(U256::from(7))).unwrap();
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.future_eth_unlocked, None);

        // No balance read this block.
        let calls = [ResolveClaimCall { claim_index: 0, resolved_subgames: 512 }];
        let outcome = check_conservation(&tree, &calls, &[], &[], None).unwrap();
        assert!(outcome.violations.is_empty());
    }

    proptest! {
        #[test]
        fn conservation_holds_iff_the_ledger_balances(
            bond in 1u64..1_000_000,
            unlocked in 0u64..1_000_000,
            drift in prop_oneof![Just(-1i64), Just(0i64), Just(1i64)],
        ) {
            let a = Address::with_last_byte(0x01);
            let tree = ClaimTree::new(vec![
                claim(ROOT_PARENT_INDEX, a, Address::ZERO, bond),
                claim(0, a, Address::ZERO, unlocked),
            ]).unwrap();
            let calls = [ResolveClaimCall { claim_index: 1, resolved_subgames: 512 }];
            let unlocks = [unlock(a, unlocked, 10)];

            // The root's bond is still future ETH and the leaf's bond was
            // unlocked without being withdrawn, so the conserved balance is
            // their sum; perturb it by at most one wei in either direction.
            let exact = i64::try_from(bond + unlocked).unwrap();
            let balance = U256::from((exact + drift) as u64);

            let outcome =
                check_conservation(&tree, &calls, &unlocks, &[], Some(balance)).unwrap();
            if drift == 0 {
                prop_assert!(outcome.violations.is_empty());
            } else {
                prop_assert_eq!(outcome.violations.len(), 1);
                let is_deficit = matches!(outcome.violations[0], Violation::EthDeficit { .. });
                prop_assert!(is_deficit);
            }
        }
    }

    #[test]
    fn credit_coverage_orders_the_balances() {
        let covered = CreditBalances {
            claim_credit: U256::from(10),
            total_credit: U256::from(25),
        };
        assert!(check_credit_coverage(Some(covered), Some(U256::from(25))).is_empty());

        // Claim credit exceeding the vault total.
        let inverted = CreditBalances {
            claim_credit: U256::from(30),
            total_credit: U256::from(25),
        };
        assert_eq!(check_credit_coverage(Some(inverted), Some(U256::from(25))).len(), 1);

        // Vault total exceeding the game's balance.
        assert_eq!(check_credit_coverage(Some(covered), Some(U256::from(24))).len(), 1);

        // Credit in the vault with none attributed to the claim.
        let unattributed = CreditBalances {
            claim_credit: U256::ZERO,
            total_credit: U256::from(25),
        };
        assert_eq!(check_credit_coverage(Some(unattributed), Some(U256::from(25))).len(), 1);

        // Nothing read this block.
        assert!(check_credit_coverage(None, Some(U256::from(25))).is_empty());
    }

    #[test]
    fn withdrawal_delay_runs_from_the_latest_unlock() {
        let recipient = Address::with_last_byte(0x05);
        let delay = 100u64;

        // Two unlocks: the later one restarts the clock.
        let unlocks = [unlock(recipient, 30, 1_000), unlock(recipient, 20, 1_050)];
        let early = [Withdrawal {
            recipient,
            amount: U256::from(50),
            timestamp: 1_149,
        }];
        assert_eq!(
            check_withdrawals(&early, &unlocks, &[recipient], delay),
            vec![Violation::WithdrawnTooEarly { recipient }]
        );

        // Exactly elapsed passes.
        let on_time = [Withdrawal {
            recipient,
            amount: U256::from(50),
            timestamp: 1_150,
        }];
        assert!(check_withdrawals(&on_time, &unlocks, &[recipient], delay).is_empty());
    }

    #[test]
    fn withdrawals_require_matching_unlocks() {
        let recipient = Address::with_last_byte(0x05);
        let withdrawal = [Withdrawal {
            recipient,
            amount: U256::from(50),
            timestamp: 2_000,
        }];

        // No unlocks at all for the recipient.
        assert_eq!(check_withdrawals(&withdrawal, &[], &[recipient], 100).len(), 1);

        // Unlocked sum differs from the withdrawn amount.
        let short = [unlock(recipient, 49, 1_000)];
        assert_eq!(check_withdrawals(&withdrawal, &short, &[recipient], 100).len(), 1);
    }

    #[test]
    fn only_claiming_recipients_are_audited() {
        let recipient = Address::with_last_byte(0x05);
        let withdrawal = [Withdrawal {
            recipient,
            amount: U256::from(50),
            timestamp: 1_001,
        }];
        let unlocks = [unlock(recipient, 50, 1_000)];

        // The withdrawal is early, but the recipient issued no claim call
        // this block.
        assert!(check_withdrawals(&withdrawal, &unlocks, &[], 100).is_empty());
    }
}
