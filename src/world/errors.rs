use thiserror::Error;

/// Errors that can arise while operating on the Zone 25 world store.
#[derive(Debug, Error)]
pub enum WorldError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Station pool debit requested beyond the current reserve.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Action preconditions unmet (crafting a non-material, reporting
    /// yourself, displaying on a shelf you don't own, ...). Nothing was
    /// mutated when this is returned.
    #[error("invalid combination: {0}")]
    InvalidCombination(String),

    /// Internal error (unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}
