//! Error types for the transfer classifier.

use thiserror::Error;

/// Errors from classifying an incoming transfer descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The wire type tag is not in the known set.
    #[error("unknown transfer type: {0}")]
    UnknownTransferType(String),

    /// The payload shape does not match the tagged kind.
    #[error("payload does not match {kind}: {detail}")]
    PayloadMismatch {
        /// The kind the tag resolved to.
        kind: &'static str,
        /// What was wrong with the payload.
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TransferError::UnknownTransferType("Ping".into());
        assert_eq!(err.to_string(), "unknown transfer type: Ping");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransferError>();
    }
}
