//! # rangerng-core
//!
//! **Uniform integers in `[lo, hi]` from entropy sources you can name.**
//!
//! `rangerng-core` draws a raw 64-bit value from one of three back-ends and
//! maps it onto an inclusive integer range:
//!
//! - **OS pool**: the operating system's non-blocking secure random source.
//! - **CryptoAPI**: `advapi32!CryptGenRandom` (Windows only).
//! - **Hardware**: the CPU's RDRAND instruction, executed from a small
//!   machine-code block mapped at runtime, with Intel's 10-attempt retry rule.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rangerng_core::{BackendId, generate, is_supported};
//!
//! let roll = generate(BackendId::OsPool, 1, 6).unwrap();
//! assert!((1..=6).contains(&roll));
//!
//! if is_supported(BackendId::Hardware) {
//!     let v = generate(BackendId::Hardware, -100, 100).unwrap();
//!     println!("RDRAND says {v}");
//! }
//! ```
//!
//! ## Architecture
//!
//! Range check → capability check → backend `raw()` → modulo mapping → result
//!
//! Every backend implements the [`EntropySource`] trait. Range validation
//! runs before any entropy is consumed, and the backend is always chosen by
//! the caller: a failure on one backend is never papered over with another.
//! The library performs no logging; every failure is a [`GenerationError`].

pub mod error;
pub mod generator;
pub mod platform;
pub mod range;
pub mod source;
pub mod sources;

pub use error::{GenerationError, Result};
pub use generator::{
    Generator, generate, generate_many, generate_preferred, generate_with, is_supported,
};
pub use platform::{
    Capabilities, PlatformInfo, capabilities, detect_available_sources, platform_info,
};
pub use range::{Range, map};
pub use source::{BackendId, EntropySource, Platform, Requirement, SourceInfo, UnknownBackend};
pub use sources::hardware::{HardwareStep, RDRAND_RETRY_LIMIT, draw_with_retry};
pub use sources::{all_sources, source_for};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
