// src/queue/rotator.rs
// Round-robin entry point: detect, reconcile, read, build view, advance

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::detector::ChangeDetector;
use super::reconciler::reconcile;
use super::store::{DurableSync, PositionStore, SyncReport};
use super::types::{QueueView, RosterSnapshot};
use crate::roster::{AgentRoster, RosterError};

/// Error types for rotation requests
#[derive(Debug, thiserror::Error)]
pub enum RotationError {
    #[error("No agents available")]
    EmptyRoster,

    #[error("Roster unavailable: {0}")]
    RosterUnavailable(#[from] RosterError),
}

pub struct QueueRotator {
    roster: Arc<dyn AgentRoster>,
    store: Arc<PositionStore>,
    // Held for the whole fetch/detect/read/write sequence so concurrent
    // requests in this process never compute the same next position.
    detector: Mutex<ChangeDetector>,
}

impl QueueRotator {
    pub fn new(roster: Arc<dyn AgentRoster>, store: Arc<PositionStore>) -> Self {
        Self {
            roster,
            store,
            detector: Mutex::new(ChangeDetector::new()),
        }
    }

    pub fn store(&self) -> &Arc<PositionStore> {
        &self.store
    }

    pub fn roster(&self) -> &Arc<dyn AgentRoster> {
        &self.roster
    }

    /// Current agent and upcoming order without moving the pointer
    pub async fn peek(&self) -> Result<QueueView, RotationError> {
        let mut detector = self.detector.lock().await;
        let (roster, pointer, changed) = self.resolve(&mut detector).await?;
        build_view(&roster, pointer, changed)
    }

    /// Like `peek`, then moves the pointer to the following agent.
    /// The returned view describes the agent served by this call.
    pub async fn advance(&self) -> Result<QueueView, RotationError> {
        let mut detector = self.detector.lock().await;
        let (roster, pointer, changed) = self.resolve(&mut detector).await?;
        let view = build_view(&roster, pointer, changed)?;

        let next = (pointer + 1) % roster.len();
        self.store.set(next).await;

        info!(
            "Current agent: {} (queue advanced {} -> {})",
            view.current.agent.name, pointer, next
        );
        if changed {
            info!("Roster changes detected and queue adjusted");
        }

        Ok(view)
    }

    pub async fn reset(&self) -> DurableSync {
        let _detector = self.detector.lock().await;
        self.store.reset().await
    }

    /// Stored pointer, read under the same lock as rotation so a slow
    /// durable read cannot write a stale value back over a reset.
    pub async fn position(&self) -> usize {
        let _detector = self.detector.lock().await;
        self.store.get().await
    }

    pub async fn sync_report(&self) -> SyncReport {
        let _detector = self.detector.lock().await;
        self.store.sync_report().await
    }

    /// Fetches the roster and returns it with the corrected pointer
    async fn resolve(
        &self,
        detector: &mut ChangeDetector,
    ) -> Result<(RosterSnapshot, usize, bool), RotationError> {
        let roster = self.roster.list_agents().await?;
        if roster.is_empty() {
            return Err(RotationError::EmptyRoster);
        }

        let changes = detector.detect(&roster);
        let stored = self.store.get().await;
        let mut pointer = stored;

        if changes.has_changes() {
            let reconciled = reconcile(&changes, stored, roster.len());
            if reconciled != stored {
                self.store.set(reconciled).await;
                pointer = reconciled;
            }
        }

        if pointer >= roster.len() {
            let wrapped = pointer % roster.len();
            warn!(
                "Stored position {} out of range for {} agents, wrapping to {}",
                pointer,
                roster.len(),
                wrapped
            );
            self.store.set(wrapped).await;
            pointer = wrapped;
        }

        Ok((roster, pointer, changes.has_changes()))
    }
}

fn build_view(
    roster: &RosterSnapshot,
    pointer: usize,
    changed: bool,
) -> Result<QueueView, RotationError> {
    QueueView::build(roster, pointer, changed).ok_or(RotationError::EmptyRoster)
}
