use thiserror::Error;

/// Errors raised while loading or validating a router configuration.
///
/// The per-tick decision path has no error type: missing data resolves to
/// an empty order list.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate policy for instrument: {0}")]
    DuplicateInstrument(String),

    #[error("Invalid position limit for {instrument_id}: {limit}")]
    InvalidPositionLimit { instrument_id: String, limit: i64 },

    #[error("Invalid window for {instrument_id}: capacity {capacity}, min samples {min_samples}")]
    InvalidWindow {
        instrument_id: String,
        capacity: usize,
        min_samples: usize,
    },

    #[error("Pairs policy for {0} cannot use itself as peer")]
    SelfPaired(String),

    #[error("Index policy for {0} has no components")]
    EmptyIndex(String),

    #[error("Invalid index component {component} for {instrument_id}: {reason}")]
    InvalidComponent {
        instrument_id: String,
        component: String,
        reason: String,
    },

    #[error("Invalid parameter {name} for {instrument_id}: {reason}")]
    InvalidParameter {
        instrument_id: String,
        name: &'static str,
        reason: String,
    },
}
