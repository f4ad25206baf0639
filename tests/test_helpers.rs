// tests/test_helpers.rs
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agent_queue::{
    AppState,
    config::QueueConfig,
    notify::{NoDelay, NotificationDispatcher, Notifier, NotifyError},
    queue::{Agent, DurableTier, PositionStore, QueueRotator, RosterSnapshot, StoreError},
    roster::{AgentRoster, RosterError},
};

pub fn agent(name: &str) -> Agent {
    Agent::new(
        name,
        format!("{}@example.com", name.to_lowercase()),
        format!("5511900{:04}", name.len()),
    )
}

/// Roster whose contents and availability tests can change between calls
#[derive(Default)]
pub struct FakeRoster {
    agents: Mutex<Vec<Agent>>,
    offline: Mutex<bool>,
}

impl FakeRoster {
    pub fn with(names: &[&str]) -> Arc<Self> {
        let roster = Arc::new(Self::default());
        roster.set(names);
        roster
    }

    pub fn set(&self, names: &[&str]) {
        *self.agents.lock().unwrap() = names.iter().map(|n| agent(n)).collect();
    }

    pub fn set_agents(&self, agents: Vec<Agent>) {
        *self.agents.lock().unwrap() = agents;
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }
}

#[async_trait]
impl AgentRoster for FakeRoster {
    async fn list_agents(&self) -> Result<RosterSnapshot, RosterError> {
        if *self.offline.lock().unwrap() {
            return Err(RosterError::Unavailable("spreadsheet offline".into()));
        }
        Ok(RosterSnapshot::new(self.agents.lock().unwrap().clone()))
    }
}

/// In-memory durable tier that can be taken offline, slowed, or tampered with
#[derive(Default)]
pub struct FakeDurable {
    cell: Mutex<Option<usize>>,
    offline: Mutex<bool>,
    read_delay: Mutex<Duration>,
}

impl FakeDurable {
    pub fn holding(value: Option<usize>) -> Arc<Self> {
        let durable = Arc::new(Self::default());
        *durable.cell.lock().unwrap() = value;
        durable
    }

    pub fn cell(&self) -> Option<usize> {
        *self.cell.lock().unwrap()
    }

    pub fn overwrite(&self, value: Option<usize>) {
        *self.cell.lock().unwrap() = value;
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    /// Reads observe the cell immediately, then stall for `delay`
    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl DurableTier for FakeDurable {
    async fn read(&self) -> Result<Option<usize>, StoreError> {
        if *self.offline.lock().unwrap() {
            return Err(StoreError::Unavailable("durable offline".into()));
        }
        let value = self.cell();
        let delay = *self.read_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(value)
    }

    async fn write(&self, position: usize) -> Result<(), StoreError> {
        if *self.offline.lock().unwrap() {
            return Err(StoreError::Unavailable("durable offline".into()));
        }
        self.overwrite(Some(position));
        Ok(())
    }

    fn name(&self) -> &str {
        "fake durable"
    }
}

/// Records every send; fails the 1-based attempt numbers listed
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_on: Vec<usize>,
}

impl RecordingNotifier {
    pub fn failing_on(fail_on: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_on,
        })
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, agent: &Agent, message: &str) -> Result<u16, NotifyError> {
        let attempt = {
            let mut sent = self.sent.lock().unwrap();
            sent.push((agent.name.clone(), message.to_string()));
            sent.len()
        };
        if self.fail_on.contains(&attempt) {
            Err(NotifyError::Rejected {
                status: 400,
                body: "invalid number".into(),
            })
        } else {
            Ok(200)
        }
    }
}

pub fn rotator(roster: Arc<FakeRoster>, durable: Option<Arc<FakeDurable>>) -> QueueRotator {
    let durable = durable.map(|d| d as Arc<dyn DurableTier>);
    QueueRotator::new(roster, Arc::new(PositionStore::new(durable)))
}

/// App state over fakes, with zero-delay notifications when a notifier is given
pub fn app_state(
    roster: Arc<FakeRoster>,
    durable: Option<Arc<FakeDurable>>,
    notifier: Option<Arc<RecordingNotifier>>,
) -> Arc<AppState> {
    let config = Arc::new(QueueConfig::from_source(|_| None));
    let dispatcher = notifier.map(|notifier| {
        Arc::new(NotificationDispatcher::new(
            notifier,
            Arc::new(NoDelay),
            Duration::from_secs(5),
            "Test Team",
        ))
    });

    Arc::new(AppState::new(
        config,
        Arc::new(rotator(roster, durable)),
        dispatcher,
    ))
}
