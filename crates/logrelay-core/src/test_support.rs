//! Fakes of the relay's ports shared by the unit tests.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;

use crate::{
    domain::{GroupTarget, RecipientId},
    messaging::{
        port::ChatSession,
        registry::{SessionMap, SessionRegistry},
    },
    relay::diagnostics::{Diagnostic, Diagnostics},
    Error, Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Behavior {
    Ok,
    Fail,
    Panic,
    /// Records the send, then never completes.
    Hang,
}

pub(crate) struct FakeSession {
    identity: RecipientId,
    connected: AtomicBool,
    behavior: Behavior,
    pub group_sends: Mutex<Vec<(GroupTarget, String)>>,
    pub direct_sends: Mutex<Vec<(RecipientId, String)>>,
}

impl FakeSession {
    pub fn connected(identity: i64) -> Arc<Self> {
        Self::build(identity, true, Behavior::Ok)
    }

    pub fn disconnected(identity: i64) -> Arc<Self> {
        Self::build(identity, false, Behavior::Ok)
    }

    pub fn with_behavior(identity: i64, behavior: Behavior) -> Arc<Self> {
        Self::build(identity, true, behavior)
    }

    fn build(identity: i64, connected: bool, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            identity: RecipientId(identity),
            connected: AtomicBool::new(connected),
            behavior,
            group_sends: Mutex::new(Vec::new()),
            direct_sends: Mutex::new(Vec::new()),
        })
    }

    pub fn groups(&self) -> Vec<(GroupTarget, String)> {
        self.group_sends.lock().unwrap().clone()
    }

    pub fn directs(&self) -> Vec<(RecipientId, String)> {
        self.direct_sends.lock().unwrap().clone()
    }

    pub fn total_sends(&self) -> usize {
        self.groups().len() + self.directs().len()
    }

    async fn outcome(&self) -> Result<()> {
        match self.behavior {
            Behavior::Ok => Ok(()),
            Behavior::Hang => std::future::pending().await,
            Behavior::Fail => Err(Error::External("fake transport down".to_string())),
            Behavior::Panic => panic!("fake transport exploded"),
        }
    }
}

#[async_trait]
impl ChatSession for FakeSession {
    fn identity(&self) -> RecipientId {
        self.identity
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_group_message(&self, target: GroupTarget, text: &str) -> Result<()> {
        self.group_sends
            .lock()
            .unwrap()
            .push((target, text.to_string()));
        self.outcome().await
    }

    async fn send_direct_message(&self, recipient: RecipientId, text: &str) -> Result<()> {
        self.direct_sends
            .lock()
            .unwrap()
            .push((recipient, text.to_string()));
        self.outcome().await
    }
}

/// `SessionMap` that counts how often the relay touches it.
#[derive(Default)]
pub(crate) struct CountingRegistry {
    pub map: SessionMap,
    lookups: AtomicUsize,
    scans: AtomicUsize,
}

impl CountingRegistry {
    pub fn with(sessions: Vec<(&str, Arc<FakeSession>)>) -> Arc<Self> {
        let reg = Self::default();
        for (name, session) in sessions {
            reg.map.insert(name, session);
        }
        Arc::new(reg)
    }

    pub fn accesses(&self) -> usize {
        self.lookups.load(Ordering::SeqCst) + self.scans.load(Ordering::SeqCst)
    }
}

impl SessionRegistry for CountingRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn ChatSession>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.map.lookup(name)
    }

    fn sessions(&self) -> Vec<Arc<dyn ChatSession>> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.map.sessions()
    }
}

#[derive(Default)]
pub(crate) struct RecordingDiagnostics {
    pub seen: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn all(&self) -> Vec<Diagnostic> {
        self.seen.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        self.seen.lock().unwrap().push(diagnostic);
    }
}
