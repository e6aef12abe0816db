//! Error types for the `township-world` crate.

use township_ledger::LedgerError;

/// Errors that can occur in world-level passes.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No machine with this key exists in the catalog.
    #[error("unknown mining machine type: {0}")]
    UnknownMachineKind(String),

    /// No property with this key exists in the catalog.
    #[error("unknown property type: {0}")]
    UnknownPropertyKind(String),

    /// A ledger operation failed while minting rewards.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },
}
