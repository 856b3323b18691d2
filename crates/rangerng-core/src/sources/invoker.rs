//! Issuing RDRAND from a freshly mapped executable block.
//!
//! This is the only module that maps executable memory or calls through a
//! raw code pointer. Callers see [`RdrandInvoker::invoke`], which returns the
//! instruction's carry flag and its 64-bit output as plain values.
//!
//! The block lives as long as the invoker that owns it and is unmapped on
//! drop. Each `raw()` call on the hardware backend builds its own invoker, so
//! no block is ever shared between threads.

use std::ptr::NonNull;

use crate::error::{GenerationError, Result};
use crate::platform::hardware_supported;
use crate::source::BackendId;

/// `rdrand rax; mov [rcx], rax; setc al; movzx eax, al; ret`
///
/// Win64 passes the output pointer in RCX.
#[cfg(windows)]
pub const RDRAND64_STEP: [u8; 14] = [
    0x48, 0x0F, 0xC7, 0xF0, // rdrand rax
    0x48, 0x89, 0x01, // mov [rcx], rax
    0x0F, 0x92, 0xC0, // setc al
    0x0F, 0xB6, 0xC0, // movzx eax, al
    0xC3, // ret
];

/// `rdrand rax; mov [rdi], rax; setc al; movzx eax, al; ret`
///
/// System V passes the output pointer in RDI.
#[cfg(not(windows))]
pub const RDRAND64_STEP: [u8; 14] = [
    0x48, 0x0F, 0xC7, 0xF0, // rdrand rax
    0x48, 0x89, 0x07, // mov [rdi], rax
    0x0F, 0x92, 0xC0, // setc al
    0x0F, 0xB6, 0xC0, // movzx eax, al
    0xC3, // ret
];

/// Signature of the installed sequence.
type StepFn = unsafe extern "C" fn(*mut u64) -> bool;

/// A private mapping holding a copy of some machine code, readable and
/// executable, released on drop.
pub struct ExecutableBlock {
    ptr: NonNull<u8>,
    len: usize,
}

impl ExecutableBlock {
    /// Map a block large enough for `code` and copy `code` into it verbatim.
    pub fn with_code(code: &[u8]) -> Result<Self> {
        let len = code.len().max(1);
        let ptr = sys::map(len)?;
        // SAFETY: ptr is a fresh writable mapping of at least len bytes that
        // cannot overlap code.
        unsafe {
            std::ptr::copy_nonoverlapping(code.as_ptr(), ptr.as_ptr(), code.len());
        }
        let block = Self { ptr, len };
        sys::seal(block.ptr, block.len)?;
        Ok(block)
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The installed bytes.
    pub fn bytes(&self) -> &[u8] {
        // SAFETY: the mapping stays readable and len bytes long until drop.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for ExecutableBlock {
    fn drop(&mut self) {
        sys::unmap(self.ptr, self.len);
    }
}

#[cfg(unix)]
mod sys {
    use std::ptr::NonNull;

    use crate::error::{GenerationError, Result};

    fn last_errno() -> i32 {
        std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
    }

    /// Anonymous private read-write mapping.
    pub fn map(len: usize) -> Result<NonNull<u8>> {
        // SAFETY: anonymous private mapping with no fixed address; the result
        // is checked against MAP_FAILED before use.
        let addr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_ANONYMOUS | libc::MAP_PRIVATE,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(GenerationError::AllocationFailed { code: last_errno() });
        }
        NonNull::new(addr as *mut u8).ok_or(GenerationError::AllocationFailed { code: 0 })
    }

    /// Flip the mapping to read-execute once the code is in place.
    pub fn seal(ptr: NonNull<u8>, len: usize) -> Result<()> {
        // SAFETY: ptr/len describe a mapping returned by map().
        let rc = unsafe {
            libc::mprotect(
                ptr.as_ptr() as *mut libc::c_void,
                len,
                libc::PROT_READ | libc::PROT_EXEC,
            )
        };
        if rc != 0 {
            return Err(GenerationError::AllocationFailed { code: last_errno() });
        }
        Ok(())
    }

    pub fn unmap(ptr: NonNull<u8>, len: usize) {
        // SAFETY: ptr/len describe a mapping returned by map() that is
        // unmapped exactly once, from ExecutableBlock::drop.
        unsafe {
            libc::munmap(ptr.as_ptr() as *mut libc::c_void, len);
        }
    }
}

#[cfg(windows)]
mod sys {
    use std::ptr::NonNull;

    use windows_sys::Win32::Foundation::GetLastError;
    use windows_sys::Win32::System::Memory::{
        MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_EXECUTE_READWRITE, VirtualAlloc, VirtualFree,
    };

    use crate::error::{GenerationError, Result};

    /// Committed read-write-execute pages.
    pub fn map(len: usize) -> Result<NonNull<u8>> {
        // SAFETY: a null base address lets the system choose the region.
        let addr = unsafe {
            VirtualAlloc(
                std::ptr::null(),
                len,
                MEM_COMMIT | MEM_RESERVE,
                PAGE_EXECUTE_READWRITE,
            )
        };
        NonNull::new(addr as *mut u8).ok_or_else(|| GenerationError::AllocationFailed {
            // SAFETY: reads the calling thread's last-error value.
            code: unsafe { GetLastError() } as i32,
        })
    }

    /// Pages are already executable.
    pub fn seal(_ptr: NonNull<u8>, _len: usize) -> Result<()> {
        Ok(())
    }

    pub fn unmap(ptr: NonNull<u8>, _len: usize) {
        // SAFETY: ptr came from VirtualAlloc and is released exactly once,
        // from ExecutableBlock::drop. MEM_RELEASE requires a size of 0.
        unsafe {
            VirtualFree(ptr.as_ptr() as *mut core::ffi::c_void, 0, MEM_RELEASE);
        }
    }
}

/// Owns an executable block holding [`RDRAND64_STEP`].
pub struct RdrandInvoker {
    block: ExecutableBlock,
}

impl RdrandInvoker {
    /// Install the RDRAND sequence.
    ///
    /// Refuses with `SourceUnavailable` when the CPU does not report RDRAND,
    /// so the sequence is never executed on a CPU that would fault on it.
    pub fn new() -> Result<Self> {
        if !hardware_supported() {
            return Err(GenerationError::unavailable(
                BackendId::Hardware,
                "RDRAND not supported on this CPU/OS",
            ));
        }
        Ok(Self {
            block: ExecutableBlock::with_code(&RDRAND64_STEP)?,
        })
    }

    /// Execute the sequence once. Returns `(carry_flag, value)`.
    pub fn invoke(&self) -> (bool, u64) {
        let mut slot: u64 = 0;
        // SAFETY: the block holds RDRAND64_STEP for this target's C calling
        // convention and is mapped executable; new() verified the CPU
        // implements RDRAND. The sequence writes exactly one u64 through
        // the pointer it is given and returns 0 or 1 in AL.
        let ok = unsafe {
            let step: StepFn = std::mem::transmute::<*const u8, StepFn>(self.block.as_ptr());
            step(&mut slot)
        };
        (ok, slot)
    }
}
