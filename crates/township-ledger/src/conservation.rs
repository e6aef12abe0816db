//! Conservation law verification for the currency ledger.
//!
//! Currency is only created by the minting flows, which raise circulating
//! supply and a holder's balance together. Every other flow moves currency
//! between holders. Holders are the agents and the treasury, so at any
//! point between passes:
//!
//! ```text
//! sum(balances) + treasury == circulating_supply
//! ```
//!
//! A violation produces a [`LedgerAnomaly`].

use rust_decimal::Decimal;

use township_types::EconomyLedger;

use crate::LedgerAnomaly;

/// The result of a conservation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// Holdings reconcile with circulating supply.
    Balanced,
    /// Holdings and supply disagree.
    Anomaly(LedgerAnomaly),
}

impl ConservationResult {
    /// Whether the check passed.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Total currency held by agents and the treasury.
///
/// Returns `None` on overflow.
pub fn total_held(economy: &EconomyLedger) -> Option<Decimal> {
    economy
        .balances
        .values()
        .try_fold(economy.treasury, |acc, balance| acc.checked_add(*balance))
}

/// Verify the conservation law for `economy` at `epoch`.
pub fn verify(epoch: u64, economy: &EconomyLedger) -> ConservationResult {
    let circulating = economy.circulating_supply;
    let Some(held) = total_held(economy) else {
        return ConservationResult::Anomaly(LedgerAnomaly {
            epoch,
            held: Decimal::MAX,
            circulating,
            message: format!(
                "LEDGER_ANOMALY at epoch {epoch}: arithmetic overflow while summing holdings",
            ),
        });
    };

    if held == circulating {
        ConservationResult::Balanced
    } else {
        ConservationResult::Anomaly(LedgerAnomaly {
            epoch,
            held,
            circulating,
            message: format!(
                "LEDGER_ANOMALY at epoch {epoch}: holdings {held} do not match circulating supply {circulating}",
            ),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use township_types::AgentId;

    #[test]
    fn empty_economy_balances() {
        assert!(verify(0, &EconomyLedger::default()).is_balanced());
    }

    #[test]
    fn detects_unminted_balance() {
        let mut economy = EconomyLedger::default();
        economy
            .balances
            .insert(AgentId::from("ada"), Decimal::new(10, 0));
        let result = verify(4, &economy);
        match result {
            ConservationResult::Anomaly(anomaly) => {
                assert_eq!(anomaly.epoch, 4);
                assert_eq!(anomaly.held, Decimal::new(10, 0));
                assert_eq!(anomaly.circulating, Decimal::ZERO);
            }
            ConservationResult::Balanced => panic!("expected an anomaly"),
        }
    }

    #[test]
    fn treasury_counts_as_held() {
        let economy = EconomyLedger {
            treasury: Decimal::new(5, 0),
            circulating_supply: Decimal::new(5, 0),
            ..EconomyLedger::default()
        };
        assert!(verify(1, &economy).is_balanced());
    }
}
