//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a startup or shutdown failure so `main` can propagate
/// with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: township_core::config::ConfigError,
    },

    /// The initial world could not be loaded or synthesized.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: township_core::store::StoreError,
    },

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
