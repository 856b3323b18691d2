//! OsPoolSource: 8 bytes from the operating system's non-blocking secure
//! random source, read via the `getrandom` crate (getrandom(2) on Linux,
//! getentropy on macOS, ProcessPrng/BCryptGenRandom on Windows).

use crate::error::{GenerationError, Result};
use crate::platform::os_pool_supported;
use crate::source::{BackendId, EntropySource, Platform, SourceInfo};

static OS_POOL_INFO: SourceInfo = SourceInfo {
    id: BackendId::OsPool,
    label: "Entropy pool",
    description: "getrandom / getentropy / ProcessPrng \u{2013} kernel entropy pool.",
    platform: Platform::Any,
    requirements: &[],
};

/// Reads from the OS entropy pool.
///
/// The 8 bytes are always interpreted little-endian, whatever the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsPoolSource;

impl OsPoolSource {
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for OsPoolSource {
    fn info(&self) -> &SourceInfo {
        &OS_POOL_INFO
    }

    fn is_available(&self) -> bool {
        os_pool_supported()
    }

    fn raw(&self) -> Result<u64> {
        let mut buf = [0u8; 8];
        getrandom::fill(&mut buf)
            .map_err(|e| GenerationError::unavailable(BackendId::OsPool, e.to_string()))?;
        Ok(u64::from_le_bytes(buf))
    }
}
