//! CryptoApiSource: `advapi32!CryptGenRandom` through an ephemeral
//! verify-context, silent provider handle.
//!
//! The provider calls sit behind [`CryptoProvider`] so the acquire → fill →
//! release discipline can be exercised with a recording fake. A
//! [`ProviderContext`] owns the handle and releases it exactly once when it
//! goes out of scope, on the success path and on every error path.

use crate::error::{GenerationError, Result};
use crate::platform::crypto_api_supported;
use crate::source::{BackendId, EntropySource, Platform, Requirement, SourceInfo};

static CRYPTO_API_INFO: SourceInfo = SourceInfo {
    id: BackendId::CryptoApi,
    label: "Windows CryptoAPI",
    description: "advapi32!CryptGenRandom (FIPS 140-2).",
    platform: Platform::Windows,
    requirements: &[Requirement::CryptoApi],
};

/// The three provider calls, each reporting failure as a platform error code.
pub trait CryptoProvider {
    /// Opaque provider handle.
    type Context: Copy;

    /// Acquire a context with no user interaction and no persisted keys.
    fn acquire(&self) -> std::result::Result<Self::Context, u32>;

    /// Fill `buf` with random bytes from an acquired context.
    fn fill(&self, ctx: &Self::Context, buf: &mut [u8]) -> std::result::Result<(), u32>;

    /// Release a context obtained from [`CryptoProvider::acquire`].
    fn release(&self, ctx: Self::Context);
}

/// A provider handle that is released when dropped.
pub struct ProviderContext<'a, P: CryptoProvider> {
    provider: &'a P,
    ctx: P::Context,
}

impl<'a, P: CryptoProvider> ProviderContext<'a, P> {
    pub fn acquire(provider: &'a P) -> Result<Self> {
        let ctx = provider
            .acquire()
            .map_err(|code| GenerationError::ContextAcquisitionFailed { code })?;
        Ok(Self { provider, ctx })
    }

    pub fn fill(&self, buf: &mut [u8]) -> Result<()> {
        self.provider
            .fill(&self.ctx, buf)
            .map_err(|code| GenerationError::RandomGenerationFailed { code })
    }
}

impl<P: CryptoProvider> Drop for ProviderContext<'_, P> {
    fn drop(&mut self) {
        self.provider.release(self.ctx);
    }
}

/// Draw 8 bytes from `provider`, interpreted little-endian.
pub fn draw_u64<P: CryptoProvider>(provider: &P) -> Result<u64> {
    let ctx = ProviderContext::acquire(provider)?;
    let mut buf = [0u8; 8];
    ctx.fill(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(windows)]
mod win {
    use windows_sys::Win32::Foundation::GetLastError;
    use windows_sys::Win32::Security::Cryptography::{
        CRYPT_SILENT, CRYPT_VERIFYCONTEXT, CryptAcquireContextW, CryptGenRandom,
        CryptReleaseContext, PROV_RSA_FULL,
    };

    use super::CryptoProvider;

    /// The real `advapi32` provider.
    pub struct Advapi32;

    impl CryptoProvider for Advapi32 {
        type Context = usize;

        fn acquire(&self) -> Result<usize, u32> {
            let mut handle: usize = 0;
            // SAFETY: handle is a valid out-pointer; null container/provider
            // names select the default provider.
            let ok = unsafe {
                CryptAcquireContextW(
                    &mut handle,
                    std::ptr::null(),
                    std::ptr::null(),
                    PROV_RSA_FULL,
                    CRYPT_VERIFYCONTEXT | CRYPT_SILENT,
                )
            };
            if ok == 0 {
                // SAFETY: reads the calling thread's last-error value.
                return Err(unsafe { GetLastError() });
            }
            Ok(handle)
        }

        fn fill(&self, ctx: &usize, buf: &mut [u8]) -> Result<(), u32> {
            // SAFETY: ctx came from a successful CryptAcquireContextW and buf
            // is valid for buf.len() writable bytes.
            let ok = unsafe { CryptGenRandom(*ctx, buf.len() as u32, buf.as_mut_ptr()) };
            if ok == 0 {
                // SAFETY: reads the calling thread's last-error value.
                return Err(unsafe { GetLastError() });
            }
            Ok(())
        }

        fn release(&self, ctx: usize) {
            // SAFETY: ctx is released exactly once by ProviderContext::drop.
            unsafe {
                CryptReleaseContext(ctx, 0);
            }
        }
    }
}

#[cfg(windows)]
fn system_draw() -> Result<u64> {
    draw_u64(&win::Advapi32)
}

#[cfg(not(windows))]
fn system_draw() -> Result<u64> {
    Err(GenerationError::unavailable(
        BackendId::CryptoApi,
        "CryptGenRandom is Windows-only",
    ))
}

/// Draws through the platform CryptoAPI provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct CryptoApiSource;

impl CryptoApiSource {
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for CryptoApiSource {
    fn info(&self) -> &SourceInfo {
        &CRYPTO_API_INFO
    }

    fn is_available(&self) -> bool {
        crypto_api_supported()
    }

    fn raw(&self) -> Result<u64> {
        if !self.is_available() {
            return Err(GenerationError::unavailable(
                BackendId::CryptoApi,
                "CryptGenRandom is Windows-only",
            ));
        }
        system_draw()
    }
}
