// src/notify/message.rs

use crate::queue::{Agent, QueuedAgent};

/// WhatsApp text for one queue entry. The agent at position 1 gets the
/// "your turn" message, everyone else their position and who is serving.
pub fn compose(entry: &QueuedAgent, current: &Agent, signature: &str) -> String {
    let body = if entry.queue_position == 1 {
        format!(
            "🎯 *IT'S YOUR TURN!*\n\n\
             Hi {}!\n\n\
             You are *1st* in the service queue! 📞\n\n\
             The next client will be sent to you.",
            entry.agent.name
        )
    } else {
        format!(
            "📋 *QUEUE POSITION UPDATED*\n\n\
             Hi {}!\n\n\
             Your current position: *{}{}*\n\n\
             🎯 Serving now: {}",
            entry.agent.name,
            entry.queue_position,
            ordinal_suffix(entry.queue_position),
            current.name
        )
    };

    if signature.is_empty() {
        body
    } else {
        format!("{body}\n\n_{signature}_")
    }
}

fn ordinal_suffix(n: usize) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
