//! Error types for the crypt facade.

use bcrypt::BcryptError;
use thiserror::Error;

/// Errors that can occur when hashing or comparing.
#[derive(Debug, Error)]
pub enum CryptError {
    /// A digest or prebuilt salt string is not a well-formed bcrypt string.
    #[error("invalid hash format: {0}")]
    HashFormat(String),

    /// The cost factor is outside the range bcrypt accepts.
    #[error("invalid cost {0}: must be between 4 and 31")]
    InvalidCost(u32),

    /// The radix requested for a fast-hash digest is outside `2..=36`.
    #[error("invalid base {0}: must be between 2 and 36")]
    InvalidBase(u32),

    /// The fast-hash input has no canonical JSON form.
    #[error("failed to serialize input: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other failure reported by the bcrypt library.
    #[error(transparent)]
    Delegate(BcryptError),

    /// The blocking worker running the hash was cancelled or panicked.
    #[error("hash worker failed: {0}")]
    Worker(String),

    /// An async operation was started outside a Tokio runtime.
    #[error("no Tokio runtime available to run the hash worker")]
    NoRuntime,
}

impl From<BcryptError> for CryptError {
    fn from(err: BcryptError) -> Self {
        match err {
            BcryptError::CostNotAllowed(cost) => CryptError::InvalidCost(cost),
            BcryptError::InvalidCost(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidHash(_)
            | BcryptError::InvalidSaltLen(_)
            | BcryptError::InvalidBase64(_) => CryptError::HashFormat(err.to_string()),
            other => CryptError::Delegate(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_not_allowed_maps_to_invalid_cost() {
        let err = CryptError::from(BcryptError::CostNotAllowed(40));
        assert!(matches!(err, CryptError::InvalidCost(40)));
    }

    #[test]
    fn malformed_hash_maps_to_hash_format() {
        let err = CryptError::from(BcryptError::InvalidHash("nope".to_string()));
        assert!(matches!(err, CryptError::HashFormat(_)));

        let err = CryptError::from(BcryptError::InvalidPrefix("3z".to_string()));
        assert!(matches!(err, CryptError::HashFormat(_)));
    }

    #[test]
    fn io_failures_pass_through_unmodified() {
        let io = std::io::Error::other("exhausted");
        let err = CryptError::from(BcryptError::Io(io));
        assert!(matches!(err, CryptError::Delegate(BcryptError::Io(_))));
        assert!(err.to_string().contains("exhausted"));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            CryptError::InvalidCost(2).to_string(),
            "invalid cost 2: must be between 4 and 31"
        );
        assert_eq!(
            CryptError::InvalidBase(37).to_string(),
            "invalid base 37: must be between 2 and 36"
        );
    }
}
