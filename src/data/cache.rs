//! Process-wide, load-once dataset cache.
//!
//! A source is read the first time it is asked for and the parsed
//! [`Dataset`] is shared for the rest of the process. There is no eviction,
//! expiry or invalidation; restarting the process is the only way to pick
//! up a changed file. Failed loads are not cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use super::error::LoadError;
use super::loader::load_file;
use super::model::Dataset;
use crate::config::SourceConfig;

/// One source's entry. `None` until a read succeeds.
type Slot = Arc<Mutex<Option<Arc<Dataset>>>>;

/// Cache of loaded datasets keyed by source identity.
#[derive(Debug, Default)]
pub struct DatasetCache {
    slots: RwLock<HashMap<SourceConfig, Slot>>,
    loads: AtomicUsize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `source`, reading it on first use.
    ///
    /// Concurrent first calls for the same source read the file once; the
    /// others wait and get the same `Arc`. A read in progress only holds
    /// its own source's slot, so other sources stay available.
    pub fn get_or_load(&self, source: &SourceConfig) -> Result<Arc<Dataset>, LoadError> {
        self.get_or_load_with(source, load_file)
    }

    fn get_or_load_with<F>(&self, source: &SourceConfig, load: F) -> Result<Arc<Dataset>, LoadError>
    where
        F: FnOnce(&SourceConfig) -> Result<Dataset, LoadError>,
    {
        let slot = self.slot(source);
        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ds) = entry.as_ref() {
            log::debug!("Dataset cache hit for {}", source.path.display());
            return Ok(Arc::clone(ds));
        }

        let dataset = Arc::new(load(source)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        *entry = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    fn slot(&self, source: &SourceConfig) -> Slot {
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(source) {
                return Arc::clone(slot);
            }
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(source.clone()).or_default())
    }

    /// Number of successful reads performed so far.
    #[cfg(test)]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

static GLOBAL: OnceLock<DatasetCache> = OnceLock::new();

/// The process-wide cache.
pub fn global() -> &'static DatasetCache {
    GLOBAL.get_or_init(DatasetCache::new)
}

/// Load `source` through the process-wide cache.
pub fn load(source: &SourceConfig) -> Result<Arc<Dataset>, LoadError> {
    global().get_or_load(source)
}
