//! HardwareSource: the CPU's RDRAND instruction with a bounded retry loop.
//!
//! RDRAND may transiently report failure (CF=0) when the on-die entropy
//! circuit is drained under contention. Intel's guidance is to retry up to
//! ten times before treating the condition as an error.

use crate::error::{GenerationError, Result};
use crate::platform::hardware_supported;
use crate::source::{BackendId, EntropySource, Platform, Requirement, SourceInfo};

/// Attempts per draw before giving up.
pub const RDRAND_RETRY_LIMIT: u32 = 10;

static HARDWARE_INFO: SourceInfo = SourceInfo {
    id: BackendId::Hardware,
    label: "Intel/AMD RDRAND",
    description: "Hardware RNG instruction (x86-64).",
    platform: Platform::Any,
    requirements: &[Requirement::Rdrand, Requirement::ExecutableMemory],
};

/// One execution of the hardware instruction: `(carry_flag, value)`.
pub trait HardwareStep {
    fn step(&mut self) -> (bool, u64);
}

#[cfg(all(target_arch = "x86_64", any(unix, windows)))]
impl HardwareStep for super::invoker::RdrandInvoker {
    fn step(&mut self) -> (bool, u64) {
        self.invoke()
    }
}

/// Run `step` until it reports success, at most [`RDRAND_RETRY_LIMIT`] times.
///
/// The value from the first successful attempt is returned unmodified.
pub fn draw_with_retry<S: HardwareStep + ?Sized>(step: &mut S) -> Result<u64> {
    for _ in 0..RDRAND_RETRY_LIMIT {
        let (ok, value) = step.step();
        if ok {
            return Ok(value);
        }
        std::hint::spin_loop();
    }
    Err(GenerationError::HardwareRandomExhausted {
        attempts: RDRAND_RETRY_LIMIT,
    })
}

#[cfg(all(target_arch = "x86_64", any(unix, windows)))]
fn system_draw() -> Result<u64> {
    let mut invoker = super::invoker::RdrandInvoker::new()?;
    draw_with_retry(&mut invoker)
}

#[cfg(not(all(target_arch = "x86_64", any(unix, windows))))]
fn system_draw() -> Result<u64> {
    Err(GenerationError::unavailable(
        BackendId::Hardware,
        "RDRAND requires an x86-64 CPU",
    ))
}

/// Draws from RDRAND via [`super::invoker`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HardwareSource;

impl HardwareSource {
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for HardwareSource {
    fn info(&self) -> &SourceInfo {
        &HARDWARE_INFO
    }

    fn is_available(&self) -> bool {
        hardware_supported()
    }

    fn raw(&self) -> Result<u64> {
        if !self.is_available() {
            return Err(GenerationError::unavailable(
                BackendId::Hardware,
                "RDRAND not supported on this CPU/OS",
            ));
        }
        system_draw()
    }
}
