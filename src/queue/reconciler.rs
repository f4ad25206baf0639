// src/queue/reconciler.rs
// Pointer correction after roster membership changes

use tracing::{debug, info, warn};

use super::types::ChangeSet;

/// Computes the pointer that keeps rotation on the same logical agent after
/// the roster changed.
///
/// - First observation always starts at 0.
/// - Each removed agent that sat before the pointer shifts it down by one.
///   Removals are applied in descending baseline order so the result equals
///   the number of departed agents ahead of the pointer.
/// - If the agent at the pointer was removed, the pointer lands on the next
///   surviving agent, wrapping to 0 when the removed agent was last.
/// - Additions are appended to the rotation and never move the pointer.
///
/// This is index arithmetic over the baseline ordering, not an identity
/// lookup: survivors that were reordered in the same pass are not tracked.
pub fn reconcile(changes: &ChangeSet, pointer: usize, current_len: usize) -> usize {
    if changes.is_first_run {
        info!("First run, starting rotation at position 0");
        return 0;
    }

    if !changes.has_changes() {
        return pointer;
    }

    let mut removals: Vec<(&str, usize)> = changes
        .removed
        .iter()
        .map(|(name, index)| (name.as_str(), *index))
        .collect();
    removals.sort_by(|a, b| b.1.cmp(&a.1));

    let mut adjusted = pointer;
    let mut current_removed = false;

    for (name, previous_index) in removals {
        if previous_index < adjusted {
            debug!(
                "Agent '{}' left from position {} ahead of pointer, {} -> {}",
                name,
                previous_index,
                adjusted,
                adjusted - 1
            );
            adjusted -= 1;
        } else if previous_index == adjusted {
            warn!(
                "Current agent '{}' at position {} was removed, advancing to next surviving agent",
                name, previous_index
            );
            current_removed = true;
        }
    }

    if !changes.added.is_empty() {
        debug!("Agents appended to end of rotation: {:?}", changes.added);
    }

    let reconciled = if current_len == 0 {
        0
    } else if adjusted >= current_len {
        if current_removed {
            0
        } else {
            warn!(
                "Pointer {} beyond roster of {} agents, clamping",
                adjusted, current_len
            );
            current_len - 1
        }
    } else {
        adjusted
    };

    info!("Queue position reconciled: {} -> {}", pointer, reconciled);
    reconciled
}
