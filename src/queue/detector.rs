// src/queue/detector.rs
// Roster membership change detection

use tracing::{debug, info};

use super::types::{ChangeSet, RosterSnapshot};

/// Diffs each fetched roster against the last snapshot at which membership
/// changed. The baseline is only replaced when a change is reported.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    baseline: Option<RosterSnapshot>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The retained comparison baseline, if any roster has been seen
    pub fn baseline(&self) -> Option<&RosterSnapshot> {
        self.baseline.as_ref()
    }

    pub fn detect(&mut self, current: &RosterSnapshot) -> ChangeSet {
        let Some(baseline) = self.baseline.as_ref() else {
            info!("First roster observation with {} agents", current.len());
            self.baseline = Some(current.clone());
            return ChangeSet::first_run(current.len());
        };

        let previous_names = baseline.names();
        let current_names = current.names();

        let added = current_names
            .difference(&previous_names)
            .map(|name| name.to_string())
            .collect();

        let removed = previous_names
            .difference(&current_names)
            .filter_map(|name| {
                baseline
                    .position_of(name)
                    .map(|index| (name.to_string(), index))
            })
            .collect();

        let changes = ChangeSet {
            added,
            removed,
            is_first_run: false,
            previous_count: baseline.len(),
            current_count: current.len(),
        };

        if changes.has_changes() {
            info!(
                "Roster membership changed: added={:?} removed={:?} ({} -> {} agents)",
                changes.added,
                changes.removed_names().collect::<Vec<_>>(),
                changes.previous_count,
                changes.current_count
            );
            self.baseline = Some(current.clone());
        } else {
            debug!("Roster membership unchanged ({} agents)", current.len());
        }

        changes
    }
}
