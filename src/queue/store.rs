// src/queue/store.rs
// Two-tier queue pointer: durable collaborator plus in-process fallback

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Error types for the durable pointer tier
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Durable store unavailable: {0}")]
    Unavailable(String),
}

/// External persistence for the queue pointer.
#[async_trait]
pub trait DurableTier: Send + Sync {
    /// `Ok(None)` means the cell is empty or unparsable.
    async fn read(&self) -> Result<Option<usize>, StoreError>;

    async fn write(&self, position: usize) -> Result<(), StoreError>;

    fn name(&self) -> &str;
}

/// Outcome of pushing a pointer to the durable tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurableSync {
    Synced,
    Skipped,
    Failed(String),
}

/// Both tiers side by side, for diagnosing divergence
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub durable_configured: bool,
    pub durable_position: Option<usize>,
    pub memory_position: usize,
    pub difference: Option<usize>,
    pub durable_error: Option<String>,
}

/// Owns the queue pointer. The in-process value is authoritative whenever
/// the durable tier is missing, failing, or reports an empty cell.
pub struct PositionStore {
    durable: Option<Arc<dyn DurableTier>>,
    memory: AtomicUsize,
}

impl PositionStore {
    pub fn new(durable: Option<Arc<dyn DurableTier>>) -> Self {
        Self {
            durable,
            memory: AtomicUsize::new(0),
        }
    }

    /// Store with no durable tier; pointer lives only in this process
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub fn has_durable_tier(&self) -> bool {
        self.durable.is_some()
    }

    pub fn memory_position(&self) -> usize {
        self.memory.load(Ordering::SeqCst)
    }

    pub async fn get(&self) -> usize {
        let memory = self.memory_position();

        let Some(durable) = &self.durable else {
            debug!("No durable tier, using in-memory position {}", memory);
            return memory;
        };

        match durable.read().await {
            Ok(Some(0)) if memory != 0 => {
                // A durable zero may be an uninitialised cell
                warn!(
                    "{} returned 0, keeping in-memory position {}",
                    durable.name(),
                    memory
                );
                memory
            }
            Ok(Some(position)) => {
                debug!("Queue position read from {}: {}", durable.name(), position);
                self.memory.store(position, Ordering::SeqCst);
                position
            }
            Ok(None) => {
                warn!(
                    "{} has no usable position, using in-memory position {}",
                    durable.name(),
                    memory
                );
                memory
            }
            Err(e) => {
                warn!(
                    "Failed to read position from {}: {}. Using in-memory position {}",
                    durable.name(),
                    e,
                    memory
                );
                memory
            }
        }
    }

    /// Updates memory first, then best-effort writes the durable tier.
    /// A durable failure is logged and reported, never raised.
    pub async fn set(&self, position: usize) -> DurableSync {
        self.memory.store(position, Ordering::SeqCst);
        debug!("Queue position updated in memory: {}", position);

        match self.write_durable(position).await {
            Ok(true) => {
                info!("Queue position synced to durable store: {}", position);
                DurableSync::Synced
            }
            Ok(false) => DurableSync::Skipped,
            Err(e) => {
                warn!(
                    "Failed to sync queue position {}: {}. Continuing with in-memory position",
                    position, e
                );
                DurableSync::Failed(e.to_string())
            }
        }
    }

    pub async fn reset(&self) -> DurableSync {
        info!("Resetting queue position to 0");
        self.set(0).await
    }

    /// Reads both tiers without reconciling them
    pub async fn sync_report(&self) -> SyncReport {
        let memory_position = self.memory_position();

        let Some(durable) = &self.durable else {
            return SyncReport {
                durable_configured: false,
                durable_position: None,
                memory_position,
                difference: None,
                durable_error: None,
            };
        };

        let (durable_position, durable_error) = match durable.read().await {
            Ok(position) => (position, None),
            Err(e) => (None, Some(e.to_string())),
        };

        SyncReport {
            durable_configured: true,
            durable_position,
            memory_position,
            difference: durable_position.map(|d| d.abs_diff(memory_position)),
            durable_error,
        }
    }

    async fn write_durable(&self, position: usize) -> Result<bool, StoreError> {
        match &self.durable {
            Some(durable) => durable.write(position).await.map(|_| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scriptable durable tier
    struct ScriptedTier {
        value: Mutex<Option<usize>>,
        fail: bool,
    }

    impl ScriptedTier {
        fn holding(value: Option<usize>) -> Arc<Self> {
            Arc::new(Self {
                value: Mutex::new(value),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                value: Mutex::new(None),
                fail: true,
            })
        }

        fn stored(&self) -> Option<usize> {
            *self.value.lock().unwrap()
        }
    }

    #[async_trait]
    impl DurableTier for ScriptedTier {
        async fn read(&self) -> Result<Option<usize>, StoreError> {
            if self.fail {
                return Err(StoreError::Unavailable("offline".into()));
            }
            Ok(*self.value.lock().unwrap())
        }

        async fn write(&self, position: usize) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Unavailable("offline".into()));
            }
            *self.value.lock().unwrap() = Some(position);
            Ok(())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_durable_zero_does_not_override_memory() {
        let tier = ScriptedTier::holding(Some(5));
        let store = PositionStore::new(Some(tier.clone()));
        store.set(5).await;

        *tier.value.lock().unwrap() = Some(0);
        assert_eq!(store.get().await, 5);
        assert_eq!(store.memory_position(), 5);
    }

    #[tokio::test]
    async fn test_durable_value_synchronises_memory() {
        let store = PositionStore::new(Some(ScriptedTier::holding(Some(5))));
        assert_eq!(store.memory_position(), 0);

        assert_eq!(store.get().await, 5);
        assert_eq!(store.memory_position(), 5);
    }

    #[tokio::test]
    async fn test_durable_zero_with_zero_memory() {
        let store = PositionStore::new(Some(ScriptedTier::holding(Some(0))));
        assert_eq!(store.get().await, 0);
    }

    #[tokio::test]
    async fn test_empty_cell_falls_back_to_memory() {
        let tier = ScriptedTier::holding(None);
        let store = PositionStore::new(Some(tier.clone()));
        store.memory.store(3, Ordering::SeqCst);

        assert_eq!(store.get().await, 3);
    }

    #[tokio::test]
    async fn test_unavailable_tier_degrades_to_memory() {
        let store = PositionStore::new(Some(ScriptedTier::failing()));

        let outcome = store.set(4).await;
        assert!(matches!(outcome, DurableSync::Failed(_)));
        assert_eq!(store.get().await, 4);
    }

    #[tokio::test]
    async fn test_set_writes_both_tiers() {
        let tier = ScriptedTier::holding(None);
        let store = PositionStore::new(Some(tier.clone()));

        assert_eq!(store.set(2).await, DurableSync::Synced);
        assert_eq!(store.memory_position(), 2);
        assert_eq!(tier.stored(), Some(2));

        assert_eq!(store.reset().await, DurableSync::Synced);
        assert_eq!(tier.stored(), Some(0));
        assert_eq!(store.memory_position(), 0);
    }

    #[tokio::test]
    async fn test_in_memory_store_skips_durable_sync() {
        let store = PositionStore::in_memory();
        assert_eq!(store.set(7).await, DurableSync::Skipped);
        assert_eq!(store.get().await, 7);
        assert!(!store.has_durable_tier());
    }

    #[tokio::test]
    async fn test_sync_report_shows_divergence() {
        let tier = ScriptedTier::holding(Some(1));
        let store = PositionStore::new(Some(tier.clone()));
        store.memory.store(4, Ordering::SeqCst);

        let report = store.sync_report().await;
        assert!(report.durable_configured);
        assert_eq!(report.durable_position, Some(1));
        assert_eq!(report.memory_position, 4);
        assert_eq!(report.difference, Some(3));
        // Reporting must not reconcile the tiers
        assert_eq!(store.memory_position(), 4);
    }

    #[tokio::test]
    async fn test_sync_report_records_read_error() {
        let store = PositionStore::new(Some(ScriptedTier::failing()));
        let report = store.sync_report().await;
        assert_eq!(report.durable_position, None);
        assert!(report.durable_error.is_some());
        assert_eq!(report.difference, None);
    }
}
