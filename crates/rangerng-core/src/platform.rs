//! Capability probing and backend discovery.
//!
//! Every probe reads only immutable host state: the OS the binary was built
//! for and the CPU feature flags. The RDRAND flag is queried once and cached
//! for the lifetime of the process.

use std::sync::OnceLock;

use serde::Serialize;

use crate::source::{BackendId, EntropySource};
use crate::sources::all_sources;

/// `PF_RDRAND_INSTRUCTION_AVAILABLE` from `winnt.h`.
#[cfg(all(windows, target_arch = "x86_64"))]
const PF_RDRAND_INSTRUCTION_AVAILABLE: u32 = 28;

/// Whether `backend` can run on this host.
pub fn is_supported(backend: BackendId) -> bool {
    match backend {
        BackendId::OsPool => os_pool_supported(),
        BackendId::CryptoApi => crypto_api_supported(),
        BackendId::Hardware => hardware_supported(),
    }
}

/// The OS entropy pool is assumed present on every supported OS.
pub fn os_pool_supported() -> bool {
    true
}

/// CryptoAPI exists only on Windows.
pub fn crypto_api_supported() -> bool {
    cfg!(windows)
}

/// RDRAND is usable when the OS-level CPU feature query reports it.
pub fn hardware_supported() -> bool {
    static RDRAND: OnceLock<bool> = OnceLock::new();
    *RDRAND.get_or_init(query_rdrand)
}

#[cfg(all(windows, target_arch = "x86_64"))]
fn query_rdrand() -> bool {
    use windows_sys::Win32::System::Threading::IsProcessorFeaturePresent;
    // SAFETY: IsProcessorFeaturePresent takes a plain feature id and has no
    // preconditions.
    unsafe { IsProcessorFeaturePresent(PF_RDRAND_INSTRUCTION_AVAILABLE) != 0 }
}

#[cfg(all(unix, target_arch = "x86_64"))]
fn query_rdrand() -> bool {
    std::arch::is_x86_feature_detected!("rdrand")
}

#[cfg(not(all(any(unix, windows), target_arch = "x86_64")))]
fn query_rdrand() -> bool {
    false
}

/// One support flag per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub os_pool: bool,
    pub crypto_api: bool,
    pub hardware: bool,
}

impl Capabilities {
    pub fn get(&self, backend: BackendId) -> bool {
        match backend {
            BackendId::OsPool => self.os_pool,
            BackendId::CryptoApi => self.crypto_api,
            BackendId::Hardware => self.hardware,
        }
    }

    /// Backends reported as supported, in display order.
    pub fn supported(&self) -> Vec<BackendId> {
        BackendId::ALL
            .into_iter()
            .filter(|&b| self.get(b))
            .collect()
    }
}

/// Probe every backend on this host.
pub fn capabilities() -> Capabilities {
    Capabilities {
        os_pool: os_pool_supported(),
        crypto_api: crypto_api_supported(),
        hardware: hardware_supported(),
    }
}

/// Discover all backends available on this machine.
pub fn detect_available_sources() -> Vec<Box<dyn EntropySource>> {
    all_sources()
        .into_iter()
        .filter(|s| s.is_available())
        .collect()
}

/// Platform information.
pub fn platform_info() -> PlatformInfo {
    PlatformInfo {
        system: std::env::consts::OS.to_string(),
        machine: std::env::consts::ARCH.to_string(),
        family: std::env::consts::FAMILY.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformInfo {
    pub system: String,
    pub machine: String,
    pub family: String,
}
