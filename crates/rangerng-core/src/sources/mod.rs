//! The three entropy backends and the table that selects between them.

pub mod crypto_api;
pub mod hardware;
#[cfg(all(target_arch = "x86_64", any(unix, windows)))]
pub mod invoker;
pub mod os_pool;

use crate::source::{BackendId, EntropySource};

/// All backend constructors, in display order. Each returns a boxed source.
pub fn all_sources() -> Vec<Box<dyn EntropySource>> {
    BackendId::ALL.into_iter().map(source_for).collect()
}

/// The backend implementation for `id`.
pub fn source_for(id: BackendId) -> Box<dyn EntropySource> {
    match id {
        BackendId::OsPool => Box::new(os_pool::OsPoolSource::new()),
        BackendId::CryptoApi => Box::new(crypto_api::CryptoApiSource::new()),
        BackendId::Hardware => Box::new(hardware::HardwareSource::new()),
    }
}
