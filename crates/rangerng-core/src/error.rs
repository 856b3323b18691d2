//! Error kinds returned by every generation path.
//!
//! Failures are always surfaced to the immediate caller. Nothing in the core
//! logs, swallows an error into a sentinel value, or retries anything other
//! than the hardware instruction's bounded loop.

use crate::source::BackendId;

/// Errors produced while validating a range or acquiring entropy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// `lo >= hi`. Detected before any entropy is consumed.
    #[error("invalid range: min ({lo}) must be < max ({hi})")]
    InvalidRange { lo: i64, hi: i64 },

    /// The backend cannot run on this host, or its OS source failed.
    #[error("{backend} is unavailable: {reason}")]
    SourceUnavailable { backend: BackendId, reason: String },

    /// The platform cryptographic provider refused to hand out a context.
    #[error("CryptAcquireContextW failed (0x{code:08X})")]
    ContextAcquisitionFailed { code: u32 },

    /// A context was acquired but the provider could not produce bytes.
    #[error("CryptGenRandom failed (0x{code:08X})")]
    RandomGenerationFailed { code: u32 },

    /// Executable memory for the hardware instruction could not be obtained.
    #[error("could not allocate executable memory (os error {code})")]
    AllocationFailed { code: i32 },

    /// Every attempt in the retry budget reported carry-flag failure.
    #[error("RDRAND returned CF=0 {attempts} times")]
    HardwareRandomExhausted { attempts: u32 },
}

impl GenerationError {
    /// Whether a caller may reasonably retry the same request later.
    ///
    /// Only hardware exhaustion is transient. Every other kind either needs
    /// new input or will fail the same way on this host.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::HardwareRandomExhausted { .. })
    }

    pub(crate) fn unavailable(backend: BackendId, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            backend,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exhaustion_is_transient() {
        assert!(GenerationError::HardwareRandomExhausted { attempts: 10 }.is_transient());
        assert!(!GenerationError::InvalidRange { lo: 5, hi: 5 }.is_transient());
        assert!(!GenerationError::AllocationFailed { code: 12 }.is_transient());
        assert!(!GenerationError::ContextAcquisitionFailed { code: 5 }.is_transient());
    }

    #[test]
    fn messages_carry_platform_codes() {
        let err = GenerationError::ContextAcquisitionFailed { code: 0x8009_0016 };
        assert_eq!(err.to_string(), "CryptAcquireContextW failed (0x80090016)");

        let err = GenerationError::RandomGenerationFailed { code: 87 };
        assert!(err.to_string().contains("0x00000057"));
    }

    #[test]
    fn invalid_range_message_names_both_bounds() {
        let err = GenerationError::InvalidRange { lo: 10, hi: 3 };
        assert_eq!(err.to_string(), "invalid range: min (10) must be < max (3)");
    }

    #[test]
    fn unavailable_names_backend() {
        let err = GenerationError::unavailable(BackendId::CryptoApi, "Windows-only");
        assert_eq!(err.to_string(), "crypto_api is unavailable: Windows-only");
    }
}
