//! Error types for agent passes and acquisitions.

use rust_decimal::Decimal;

use township_ledger::LedgerError;
use township_types::AgentId;
use township_world::WorldError;

/// Errors that can occur while running agent passes or buying assets.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The requested catalog key does not exist.
    #[error("unknown {category} type: {key}")]
    UnknownCatalogEntry {
        /// Which catalog was searched ("mining machine" or "property").
        category: &'static str,
        /// The key that was not found.
        key: String,
    },

    /// The buyer cannot afford the item.
    #[error("insufficient funds: {agent} has {balance}, needs {required}")]
    InsufficientFunds {
        /// The buyer.
        agent: AgentId,
        /// Their balance.
        balance: Decimal,
        /// The price.
        required: Decimal,
    },

    /// A ledger operation failed.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// A world-level pass failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of the operation that overflowed.
        context: String,
    },
}

impl AgentError {
    /// Whether this error is a validation failure that left the world
    /// untouched.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownCatalogEntry { .. } | Self::InsufficientFunds { .. }
        )
    }
}
