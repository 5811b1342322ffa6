use thiserror::Error;

/// Unified error type for the entire ledger-view-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Loading ─────────────────────────────────────────────────────
    #[error("Malformed record at index {index} (id {id}): {reason}")]
    MalformedRecord {
        index: usize,
        id: String,
        reason: String,
    },

    #[error("Failed to load ledger records: {0}")]
    LoadFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({source_name}): {message}")]
    Api {
        source_name: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),
}

impl CoreError {
    /// `true` when the bulk data source failed and the UI should show its
    /// load-error state rather than an empty ledger.
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(self, CoreError::LoadFailure(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; drop the query string.
        let msg = e.to_string();
        CoreError::Network(redact_query(&msg))
    }
}

pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_strips_everything_after_question_mark() {
        assert_eq!(
            redact_query("error sending request for url (https://x/api?token=abc)"),
            "error sending request for url (https://x/api?<query redacted>"
        );
    }

    #[test]
    fn redact_leaves_plain_messages() {
        assert_eq!(redact_query("connection refused"), "connection refused");
    }
}
