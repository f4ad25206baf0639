// src/queue/mod.rs
// Rotation core: change detection, pointer reconciliation, storage, rotation

pub mod detector;
pub mod reconciler;
pub mod rotator;
pub mod store;
pub mod types;

pub use detector::ChangeDetector;
pub use reconciler::reconcile;
pub use rotator::{QueueRotator, RotationError};
pub use store::{DurableSync, DurableTier, PositionStore, StoreError, SyncReport};
pub use types::{Agent, ChangeSet, QueueView, QueuedAgent, RosterSnapshot};
