//! Backend identity, metadata, and the abstract entropy source trait.
//!
//! Every backend implements the [`EntropySource`] trait, which provides
//! metadata via [`SourceInfo`], a capability probe, and a single raw 64-bit draw.
//! Range application never happens here; see [`crate::range`].

use std::str::FromStr;

use serde::Serialize;

use crate::error::Result;

/// Stateless tag naming one of the three entropy back-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendId {
    /// The operating system's non-blocking secure random source.
    OsPool,
    /// The Windows CryptoAPI provider (`CryptGenRandom`).
    CryptoApi,
    /// The CPU's RDRAND instruction, issued from an executable block.
    Hardware,
}

impl BackendId {
    /// Every backend, in display order.
    pub const ALL: [BackendId; 3] = [Self::OsPool, Self::CryptoApi, Self::Hardware];

    /// Machine-readable name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OsPool => "os_pool",
            Self::CryptoApi => "crypto_api",
            Self::Hardware => "hardware",
        }
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a backend name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend '{0}' (expected os_pool, crypto_api or hardware)")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendId {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "os_pool" | "os" | "entropy" | "entropy_pool" | "pool" => Ok(Self::OsPool),
            "crypto_api" | "cryptoapi" | "cryptgenrandom" | "crypto" => Ok(Self::CryptoApi),
            "hardware" | "hw" | "rdrand" => Ok(Self::Hardware),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

/// Operating system a backend is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Works on any supported OS.
    Any,
    /// Requires Windows.
    Windows,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Hardware/software requirement for a backend beyond the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// The CPU must implement RDRAND.
    Rdrand,
    /// The process must be able to map executable memory.
    ExecutableMemory,
    /// `advapi32` CryptoAPI provider.
    CryptoApi,
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rdrand => write!(f, "rdrand"),
            Self::ExecutableMemory => write!(f, "executable_memory"),
            Self::CryptoApi => write!(f, "crypto_api"),
        }
    }
}

/// Metadata about a backend.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    /// Which backend this describes.
    pub id: BackendId,
    /// Short human-readable label (e.g. `"Entropy pool"`).
    pub label: &'static str,
    /// One-line description of where the entropy comes from.
    pub description: &'static str,
    /// Target platform.
    pub platform: Platform,
    /// Requirements beyond the platform.
    pub requirements: &'static [Requirement],
}

/// Trait that every entropy backend implements.
pub trait EntropySource: Send + Sync {
    /// Backend metadata.
    fn info(&self) -> &SourceInfo;

    /// Check if this backend can operate on the current host.
    ///
    /// Reads only immutable OS/CPU state; never attempts a draw.
    fn is_available(&self) -> bool;

    /// Produce one raw, uniformly distributed 64-bit value.
    fn raw(&self) -> Result<u64>;

    /// Convenience: id from info.
    fn id(&self) -> BackendId {
        self.info().id
    }
}
