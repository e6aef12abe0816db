//! Currency ledger for the Township simulation.
//!
//! Currency enters circulation only through the designated minting flows
//! (payroll, rent, mining rewards). Every other movement is a transfer
//! between balances or into the treasury. The conservation law is checked
//! at the end of every tick.
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`Ledger`] view: minting, wages, transfers, purchases.
//! - [`transaction`] -- The [`TransactionBuilder`] for validated log entries.
//! - [`conservation`] -- Conservation law verification and anomaly detection.
//! - [`pricing`] -- Per-tick price discovery, market cap, and volume.
//!
//! # Conservation Law
//!
//! After every pass:
//!
//! ```text
//! sum(balances) + treasury == circulating_supply
//! ```
//!
//! A violation produces a [`LedgerAnomaly`]. The ledger never panics; it
//! returns errors.
//!
//! # Usage
//!
//! ```
//! use township_ledger::{ConservationResult, Ledger, conservation};
//! use township_types::{AgentId, EconomyLedger};
//! use rust_decimal::Decimal;
//!
//! let mut economy = EconomyLedger::default();
//! let ada = AgentId::from("ada");
//!
//! let mut ledger = Ledger::new(&mut economy, 500);
//! ledger.pay_wages(1, &ada, Decimal::new(100, 0)).ok();
//!
//! assert_eq!(economy.balance(&ada), Decimal::new(90, 0));
//! assert_eq!(conservation::verify(1, &economy), ConservationResult::Balanced);
//! ```

pub mod conservation;
pub mod ledger;
pub mod pricing;
pub mod transaction;

// Re-export primary types at crate root.
pub use conservation::ConservationResult;
pub use ledger::{Ledger, WageSplit};
pub use pricing::{PriceMove, PricingConfig};
pub use transaction::TransactionBuilder;

use rust_decimal::Decimal;

use township_types::{AgentId, TransactionKind};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when moving currency.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Amount must be strictly positive.
    #[error("transaction amount must be non-zero")]
    ZeroAmount,

    /// Amount must not be negative.
    #[error("transaction amount must be positive, got {amount}")]
    NegativeAmount {
        /// The invalid amount.
        amount: Decimal,
    },

    /// The paying agent cannot cover the amount.
    #[error("agent {agent} has {balance}, needs {required}")]
    InsufficientFunds {
        /// The paying agent.
        agent: AgentId,
        /// Their current balance.
        balance: Decimal,
        /// The amount requested.
        required: Decimal,
    },

    /// A transfer named the same agent on both sides.
    #[error("agent {0} cannot transfer to themselves")]
    SelfTransfer(AgentId),

    /// The endpoints do not match what the transaction kind expects.
    #[error("invalid endpoints for {kind:?}: {reason}")]
    InvalidEndpoints {
        /// The kind being validated.
        kind: TransactionKind,
        /// What was wrong.
        reason: &'static str,
    },

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Checked arithmetic overflowed.
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A conservation law violation detected at the end of a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// The epoch where the anomaly was detected.
    pub epoch: u64,
    /// Sum of all balances plus the treasury.
    pub held: Decimal,
    /// Recorded circulating supply.
    pub circulating: Decimal,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
