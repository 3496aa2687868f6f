use thiserror::Error;

/// Unified error type for the entire shop-ledger-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Import ──────────────────────────────────────────────────────
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    // ── Storage / File ──────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),
}

/// Why an inbound snapshot was rejected.
///
/// Returned before any state is touched: a rejected import leaves the
/// ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The input could not be parsed as JSON at all.
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    /// The input parsed, but is not a ledger snapshot.
    #[error("Invalid snapshot shape: {0}")]
    InvalidShape(String),

    /// Only produced when strict version checking is enabled in settings.
    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u64),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
