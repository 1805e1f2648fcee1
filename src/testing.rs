//! In-memory doubles for the display backend and the ranked store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::display::{DisplayBackend, DisplayError, DisplayHandle, Position};
use crate::leaderboard::{Metric, RankEntry};
use crate::store::{RankedStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DisplayEvent {
    Created { id: u64, world: String, text: String },
    SetText { id: u64, text: String },
    Closed { id: u64 },
}

#[derive(Debug, Clone)]
pub(crate) struct RecordingDisplay {
    worlds: HashSet<String>,
    events: Arc<Mutex<Vec<DisplayEvent>>>,
    despawned: Arc<Mutex<HashMap<u64, Arc<AtomicBool>>>>,
    next_id: Arc<AtomicU64>,
}

impl RecordingDisplay {
    pub(crate) fn new<const N: usize>(worlds: [&str; N]) -> Self {
        Self {
            worlds: worlds.iter().map(|w| w.to_string()).collect(),
            events: Arc::default(),
            despawned: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub(crate) fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn created_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, DisplayEvent::Created { .. }))
            .count()
    }

    pub(crate) fn set_text_count(&self, handle_id: u64) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, DisplayEvent::SetText { id, .. } if *id == handle_id))
            .count()
    }

    pub(crate) fn close_count(&self, handle_id: u64) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, DisplayEvent::Closed { id } if *id == handle_id))
            .count()
    }

    /// Latest text written to any handle spawned in `world`.
    pub(crate) fn texts_in(&self, world: &str) -> Vec<String> {
        let events = self.events();
        let ids: HashSet<u64> = events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Created { id, world: w, .. } if w == world => Some(*id),
                _ => None,
            })
            .collect();
        events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::SetText { id, text } if ids.contains(id) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn despawn(&self, handle_id: u64) {
        if let Some(flag) = self.despawned.lock().unwrap().get(&handle_id) {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

impl DisplayBackend for RecordingDisplay {
    fn is_world_loaded(&self, world: &str) -> bool {
        self.worlds.contains(world)
    }

    fn create(
        &self,
        _position: Position,
        world: &str,
        initial_text: &str,
    ) -> Result<Box<dyn DisplayHandle>, DisplayError> {
        if !self.is_world_loaded(world) {
            return Err(DisplayError::WorldNotLoaded(world.to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let despawned = Arc::new(AtomicBool::new(false));
        self.despawned.lock().unwrap().insert(id, despawned.clone());
        self.events.lock().unwrap().push(DisplayEvent::Created {
            id,
            world: world.to_string(),
            text: initial_text.to_string(),
        });
        Ok(Box::new(RecordingHandle {
            id,
            closed: false,
            despawned,
            events: self.events.clone(),
        }))
    }
}

#[derive(Debug)]
struct RecordingHandle {
    id: u64,
    closed: bool,
    despawned: Arc<AtomicBool>,
    events: Arc<Mutex<Vec<DisplayEvent>>>,
}

impl DisplayHandle for RecordingHandle {
    fn set_text(&mut self, text: &str) {
        self.events.lock().unwrap().push(DisplayEvent::SetText {
            id: self.id,
            text: text.to_string(),
        });
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.events
            .lock()
            .unwrap()
            .push(DisplayEvent::Closed { id: self.id });
    }

    fn is_closed(&self) -> bool {
        self.closed || self.despawned.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Response {
    Entries(Vec<RankEntry>),
    Unavailable,
    IoFailure,
}

/// Scriptable store. Queries for a gated metric wait until the test adds
/// permits to its semaphore.
#[derive(Debug, Default)]
pub(crate) struct FakeStore {
    responses: Mutex<HashMap<Metric, Response>>,
    gates: Mutex<HashMap<Metric, Arc<Semaphore>>>,
    queries: AtomicUsize,
    increments: Mutex<Vec<(String, f64)>>,
    fail_increments: AtomicBool,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, metric: Metric, response: Response) {
        self.responses.lock().unwrap().insert(metric, response);
    }

    pub(crate) fn gate(&self, metric: Metric) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.lock().unwrap().insert(metric, gate.clone());
        gate
    }

    pub(crate) fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub(crate) fn increments(&self) -> Vec<(String, f64)> {
        self.increments.lock().unwrap().clone()
    }

    pub(crate) fn fail_increments(&self) {
        self.fail_increments.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl RankedStore for FakeStore {
    async fn increment(&self, subject: &str, amount: f64) -> Result<(), StoreError> {
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(StoreError::io("disk full"));
        }
        self.increments
            .lock()
            .unwrap()
            .push((subject.to_string(), amount));
        Ok(())
    }

    async fn top_n(&self, metric: Metric, n: usize) -> Result<Vec<RankEntry>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().get(&metric).cloned();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|_| StoreError::io("gate closed"))?
                .forget();
        }

        let response = self.responses.lock().unwrap().get(&metric).cloned();
        match response {
            Some(Response::Entries(mut entries)) => {
                entries.truncate(n);
                Ok(entries)
            }
            Some(Response::Unavailable) => {
                Err(StoreError::Unavailable("economy plugin missing".into()))
            }
            Some(Response::IoFailure) | None => Err(StoreError::io("connection reset")),
        }
    }
}
