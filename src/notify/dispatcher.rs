// src/notify/dispatcher.rs
// Sequential, rate-limited fan-out of queue notifications

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::message::compose;
use super::{DelayPolicy, NotificationStatus, Notifier, NotifyError};
use crate::queue::QueueView;

/// Results of one dispatch run, in send order
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub results: Vec<NotificationStatus>,
    /// True when the run stopped before every agent was attempted
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Percentage, one decimal
    pub success_rate: f64,
}

impl DispatchReport {
    pub fn stats(&self) -> DispatchStats {
        let total = self.results.len();
        let succeeded = self.results.iter().filter(|r| r.success).count();
        let success_rate = if total == 0 {
            0.0
        } else {
            ((succeeded as f64 / total as f64) * 1000.0).round() / 10.0
        };

        DispatchStats {
            total,
            succeeded,
            failed: total - succeeded,
            success_rate,
        }
    }
}

pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    delay: Arc<dyn DelayPolicy>,
    send_timeout: Duration,
    signature: String,
}

impl NotificationDispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        delay: Arc<dyn DelayPolicy>,
        send_timeout: Duration,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            notifier,
            delay,
            send_timeout,
            signature: signature.into(),
        }
    }

    /// Runs with a fresh token that is cancelled once `budget` elapses.
    /// The timer lives inside this future, so dropping it stops both.
    pub async fn dispatch_within(&self, view: &QueueView, budget: Duration) -> DispatchReport {
        let cancel = CancellationToken::new();
        let dispatch = self.dispatch(view, &cancel);
        tokio::pin!(dispatch);

        tokio::select! {
            report = &mut dispatch => return report,
            _ = tokio::time::sleep(budget) => {
                warn!("Notification budget of {}s exhausted", budget.as_secs());
                cancel.cancel();
            }
        }

        dispatch.await
    }

    /// Notifies every agent in queue order, one at a time, pausing between
    /// sends. A failed send never stops the run; cancellation does, keeping
    /// the results gathered so far.
    pub async fn dispatch(&self, view: &QueueView, cancel: &CancellationToken) -> DispatchReport {
        let queue: Vec<_> = view.queue().collect();
        let current = &view.current.agent;
        let total = queue.len();
        let mut report = DispatchReport::default();

        info!("Sending notifications to {} agents, serving now: {}", total, current.name);

        for (i, entry) in queue.into_iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let message = compose(entry, current, &self.signature);
            info!(
                "Sending message to {} (position {})",
                entry.agent.name, entry.queue_position
            );

            let outcome = tokio::select! {
                _ = cancel.cancelled() => Err(NotifyError::Cancelled),
                sent = tokio::time::timeout(self.send_timeout, self.notifier.send(&entry.agent, &message)) => {
                    sent.unwrap_or(Err(NotifyError::Timeout(self.send_timeout.as_secs())))
                }
            };

            match &outcome {
                Ok(status) => info!("Message delivered to {} ({})", entry.agent.name, status),
                Err(e) => warn!("Failed to notify {}: {}", entry.agent.name, e),
            }

            let was_cancelled = matches!(outcome, Err(NotifyError::Cancelled));
            report
                .results
                .push(NotificationStatus::from_outcome(&entry.agent, outcome));

            if was_cancelled {
                report.cancelled = true;
                break;
            }

            if i + 1 < total {
                let pause = self.delay.next_delay();
                info!("Waiting {:.1}s before next send", pause.as_secs_f64());
                tokio::select! {
                    _ = cancel.cancelled() => {
                        report.cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }

        if report.cancelled {
            warn!(
                "Notification dispatch cancelled after {} of {} agents",
                report.results.len(),
                total
            );
        }

        report
    }
}
