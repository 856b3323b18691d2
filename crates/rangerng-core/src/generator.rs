//! The public generation surface: validate the range, pick the backend,
//! draw raw entropy, and map it.
//!
//! Range validation always happens first, so a bad range never spends a
//! hardware call. Each backend is selected explicitly by the caller; a failed
//! draw is returned as-is and never retried on a different backend.

use crate::error::{GenerationError, Result};
use crate::range::Range;
use crate::source::{BackendId, EntropySource};
use crate::sources::{all_sources, source_for};

/// Draw one value in `[lo, hi]` from `backend`.
pub fn generate(backend: BackendId, lo: i64, hi: i64) -> Result<i64> {
    generate_with(source_for(backend).as_ref(), lo, hi)
}

/// Whether `backend` can run on this host.
pub fn is_supported(backend: BackendId) -> bool {
    crate::platform::is_supported(backend)
}

/// Draw one value in `[lo, hi]` from an arbitrary source.
pub fn generate_with(source: &dyn EntropySource, lo: i64, hi: i64) -> Result<i64> {
    let range = Range::new(lo, hi)?;
    draw(source, &range)
}

/// Draw `count` values in `[lo, hi]` from `backend`, stopping at the first error.
pub fn generate_many(backend: BackendId, lo: i64, hi: i64, count: usize) -> Result<Vec<i64>> {
    let range = Range::new(lo, hi)?;
    let source = source_for(backend);
    (0..count).map(|_| draw(source.as_ref(), &range)).collect()
}

/// Draw from the first backend in `preferences` that this host supports.
///
/// Selection is by capability only; if the chosen backend then fails, the
/// error is returned rather than moving on to the next preference. An empty
/// list means [`BackendId::ALL`] order.
pub fn generate_preferred(preferences: &[BackendId], lo: i64, hi: i64) -> Result<(BackendId, i64)> {
    Generator::new().generate_preferred(preferences, lo, hi)
}

fn draw(source: &dyn EntropySource, range: &Range) -> Result<i64> {
    if !source.is_available() {
        return Err(GenerationError::unavailable(
            source.id(),
            "not supported on this host",
        ));
    }
    Ok(range.map(source.raw()?))
}

/// A backend table keyed by [`BackendId`].
pub struct Generator {
    sources: Vec<Box<dyn EntropySource>>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Table with every built-in backend.
    pub fn new() -> Self {
        Self::with_sources(all_sources())
    }

    /// Table with caller-supplied sources. A later source with the same id
    /// replaces an earlier one.
    pub fn with_sources(sources: Vec<Box<dyn EntropySource>>) -> Self {
        let mut table: Vec<Box<dyn EntropySource>> = Vec::with_capacity(sources.len());
        for source in sources {
            table.retain(|s| s.id() != source.id());
            table.push(source);
        }
        Self { sources: table }
    }

    pub fn source(&self, id: BackendId) -> Option<&dyn EntropySource> {
        self.sources
            .iter()
            .find(|s| s.id() == id)
            .map(|s| s.as_ref())
    }

    pub fn sources(&self) -> impl Iterator<Item = &dyn EntropySource> {
        self.sources.iter().map(|s| s.as_ref())
    }

    pub fn is_supported(&self, id: BackendId) -> bool {
        self.source(id).is_some_and(|s| s.is_available())
    }

    /// Supported backends, in table order.
    pub fn supported(&self) -> Vec<BackendId> {
        self.sources
            .iter()
            .filter(|s| s.is_available())
            .map(|s| s.id())
            .collect()
    }

    pub fn generate(&self, id: BackendId, lo: i64, hi: i64) -> Result<i64> {
        let range = Range::new(lo, hi)?;
        draw(self.lookup(id)?, &range)
    }

    pub fn generate_many(&self, id: BackendId, lo: i64, hi: i64, count: usize) -> Result<Vec<i64>> {
        let range = Range::new(lo, hi)?;
        let source = self.lookup(id)?;
        (0..count).map(|_| draw(source, &range)).collect()
    }

    /// See [`generate_preferred`].
    pub fn generate_preferred(
        &self,
        preferences: &[BackendId],
        lo: i64,
        hi: i64,
    ) -> Result<(BackendId, i64)> {
        let range = Range::new(lo, hi)?;
        let order = if preferences.is_empty() {
            &BackendId::ALL[..]
        } else {
            preferences
        };
        let Some(source) = order
            .iter()
            .filter_map(|&id| self.source(id))
            .find(|s| s.is_available())
        else {
            return Err(GenerationError::unavailable(
                order[0],
                "no preferred backend is supported on this host",
            ));
        };
        Ok((source.id(), draw(source, &range)?))
    }

    fn lookup(&self, id: BackendId) -> Result<&dyn EntropySource> {
        self.source(id)
            .ok_or_else(|| GenerationError::unavailable(id, "not registered"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::source::{Platform, SourceInfo};

    static STUB_INFO: SourceInfo = SourceInfo {
        id: BackendId::Hardware,
        label: "stub",
        description: "records calls",
        platform: Platform::Any,
        requirements: &[],
    };

    /// Returns a fixed raw value and counts draws.
    struct StubSource {
        info: &'static SourceInfo,
        available: bool,
        value: Result<u64>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(value: Result<u64>) -> Self {
            Self {
                info: &STUB_INFO,
                available: true,
                value,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl EntropySource for StubSource {
        fn info(&self) -> &SourceInfo {
            self.info
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn raw(&self) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value.clone()
        }
    }

    #[test]
    fn invalid_range_never_touches_backend() {
        let stub = StubSource::new(Ok(0));
        for (lo, hi) in [(5, 5), (10, 1), (i64::MAX, i64::MIN)] {
            assert_eq!(
                generate_with(&stub, lo, hi),
                Err(GenerationError::InvalidRange { lo, hi })
            );
        }
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn maps_stub_value() {
        let stub = StubSource::new(Ok(u64::MAX));
        assert_eq!(generate_with(&stub, 1, 100), Ok(16));
        assert_eq!(stub.calls(), 1);
    }

    #[test]
    fn backend_error_propagates_unchanged() {
        let stub = StubSource::new(Err(GenerationError::HardwareRandomExhausted { attempts: 10 }));
        assert_eq!(
            generate_with(&stub, 1, 6),
            Err(GenerationError::HardwareRandomExhausted { attempts: 10 })
        );
    }

    #[test]
    fn unavailable_source_fails_without_draw() {
        let mut stub = StubSource::new(Ok(1));
        stub.available = false;
        assert!(matches!(
            generate_with(&stub, 1, 6),
            Err(GenerationError::SourceUnavailable { .. })
        ));
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn os_pool_generates_in_range() {
        for _ in 0..100 {
            let v = generate(BackendId::OsPool, -5, 5).unwrap();
            assert!((-5..=5).contains(&v));
        }
    }

    #[test]
    fn generate_checks_range_before_capability() {
        // Even an unsupported backend reports the range problem first.
        assert_eq!(
            generate(BackendId::CryptoApi, 3, 3),
            Err(GenerationError::InvalidRange { lo: 3, hi: 3 })
        );
    }

    #[test]
    fn generate_many_returns_count_values() {
        let values = generate_many(BackendId::OsPool, 1, 6, 50).unwrap();
        assert_eq!(values.len(), 50);
        assert!(values.iter().all(|v| (1..=6).contains(v)));
        assert_eq!(generate_many(BackendId::OsPool, 1, 6, 0), Ok(vec![]));
    }

    #[test]
    fn table_replaces_duplicate_ids() {
        let table = Generator::with_sources(vec![
            Box::new(StubSource::new(Ok(0))) as Box<dyn EntropySource>,
            Box::new(StubSource::new(Ok(5))),
        ]);
        assert_eq!(table.sources().count(), 1);
        assert_eq!(table.generate(BackendId::Hardware, 1, 6), Ok(6));
    }

    #[test]
    fn unregistered_backend_is_unavailable() {
        let table =
            Generator::with_sources(vec![Box::new(StubSource::new(Ok(0))) as Box<dyn EntropySource>]);
        assert!(!table.is_supported(BackendId::OsPool));
        assert!(matches!(
            table.generate(BackendId::OsPool, 1, 6),
            Err(GenerationError::SourceUnavailable {
                backend: BackendId::OsPool,
                ..
            })
        ));
    }

    #[test]
    fn preferred_skips_unsupported_backends() {
        let mut stub = StubSource::new(Ok(0));
        stub.available = false;
        let table = Generator::with_sources(vec![
            Box::new(stub) as Box<dyn EntropySource>,
            Box::new(crate::sources::os_pool::OsPoolSource::new()),
        ]);
        let (id, v) = table
            .generate_preferred(&[BackendId::Hardware, BackendId::OsPool], 1, 6)
            .unwrap();
        assert_eq!(id, BackendId::OsPool);
        assert!((1..=6).contains(&v));
    }

    #[test]
    fn preferred_does_not_fall_through_on_failure() {
        let stub = StubSource::new(Err(GenerationError::AllocationFailed { code: 12 }));
        let table = Generator::with_sources(vec![
            Box::new(stub) as Box<dyn EntropySource>,
            Box::new(crate::sources::os_pool::OsPoolSource::new()),
        ]);
        assert_eq!(
            table.generate_preferred(&[BackendId::Hardware, BackendId::OsPool], 1, 6),
            Err(GenerationError::AllocationFailed { code: 12 })
        );
    }

    #[test]
    fn preferred_with_no_supported_backend() {
        let mut stub = StubSource::new(Ok(0));
        stub.available = false;
        let table = Generator::with_sources(vec![Box::new(stub) as Box<dyn EntropySource>]);
        assert!(matches!(
            table.generate_preferred(&[BackendId::Hardware], 1, 6),
            Err(GenerationError::SourceUnavailable {
                backend: BackendId::Hardware,
                ..
            })
        ));
    }

    #[test]
    fn empty_preferences_use_default_order() {
        let (id, _) = generate_preferred(&[], 0, 1).unwrap();
        assert_eq!(id, BackendId::OsPool);
    }
}
