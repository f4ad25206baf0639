// src/queue/types.rs
// Core value types shared by the rotation pipeline

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An agent eligible for rotation. Identity is the name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// Ordered roster as reported by the source at fetch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterSnapshot {
    agents: Vec<Agent>,
}

impl RosterSnapshot {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn names(&self) -> BTreeSet<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }

    /// Index of the first agent with this name
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.agents.iter().position(|a| a.name == name)
    }
}

impl From<Vec<Agent>> for RosterSnapshot {
    fn from(agents: Vec<Agent>) -> Self {
        Self::new(agents)
    }
}

/// Membership difference between the retained baseline and a fresh roster.
///
/// `removed` maps each departed name to the index it held in the baseline,
/// which is what pointer reconciliation needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: BTreeSet<String>,
    pub removed: BTreeMap<String, usize>,
    pub is_first_run: bool,
    pub previous_count: usize,
    pub current_count: usize,
}

impl ChangeSet {
    pub fn first_run(current_count: usize) -> Self {
        Self {
            is_first_run: true,
            current_count,
            ..Default::default()
        }
    }

    /// True when membership changed or this is the first observation.
    pub fn has_changes(&self) -> bool {
        self.is_first_run || !self.added.is_empty() || !self.removed.is_empty()
    }

    pub fn removed_names(&self) -> impl Iterator<Item = &str> {
        self.removed.keys().map(String::as_str)
    }
}

/// An agent with its derived, per-response queue position (1 = serving now).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedAgent {
    #[serde(flatten)]
    pub agent: Agent,
    pub queue_position: usize,
}

/// Result of a peek or advance: who is current and who follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueView {
    pub current: QueuedAgent,
    pub upcoming: Vec<QueuedAgent>,
    pub changed: bool,
    /// Pointer the view was built from (pre-advance)
    pub pointer: usize,
}

impl QueueView {
    /// Builds the rotation order starting at `pointer`.
    ///
    /// Returns `None` for an empty roster or an out-of-range pointer.
    pub fn build(roster: &RosterSnapshot, pointer: usize, changed: bool) -> Option<Self> {
        let len = roster.len();
        let current = roster.get(pointer)?.clone();

        let upcoming = (1..len)
            .map(|offset| QueuedAgent {
                agent: roster.agents()[(pointer + offset) % len].clone(),
                queue_position: offset + 1,
            })
            .collect();

        Some(Self {
            current: QueuedAgent {
                agent: current,
                queue_position: 1,
            },
            upcoming,
            changed,
            pointer,
        })
    }

    /// Current agent followed by the upcoming ones
    pub fn queue(&self) -> impl Iterator<Item = &QueuedAgent> {
        std::iter::once(&self.current).chain(self.upcoming.iter())
    }
}
