//! Geocoder doubles for exercising the pipeline without a network

use super::{Geocoder, Position};
use crate::error::GeocodeError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{mpsc, oneshot};

/// Answers from a table; listed names can be made to stall forever
#[derive(Default)]
pub struct StaticGeocoder {
    places: HashMap<String, Position>,
    stalled: HashSet<String>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, query: &str, position: Position) -> Self {
        self.places.insert(query.to_string(), position);
        self
    }

    pub fn with_stall(mut self, query: &str) -> Self {
        self.stalled.insert(query.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn geocode(&self, query: &str, _scope_hint: &str) -> Result<Position, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.stalled.contains(query) {
            std::future::pending::<()>().await;
        }
        self.places
            .get(query)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(query.to_string()))
    }
}

/// A lookup parked until the test answers it
pub struct PendingLookup {
    pub query: String,
    reply: oneshot::Sender<Result<Position, GeocodeError>>,
}

impl PendingLookup {
    pub fn succeed(self, position: Position) {
        let _ = self.reply.send(Ok(position));
    }

    pub fn fail(self) {
        let query = self.query.clone();
        let _ = self.reply.send(Err(GeocodeError::NotFound(query)));
    }
}

/// Every lookup is handed to the test, which decides when and how it completes
pub struct ScriptedGeocoder {
    requests: mpsc::UnboundedSender<PendingLookup>,
}

impl ScriptedGeocoder {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingLookup>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { requests: tx }, rx)
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn geocode(&self, query: &str, _scope_hint: &str) -> Result<Position, GeocodeError> {
        let (reply, answer) = oneshot::channel();
        let pending = PendingLookup {
            query: query.to_string(),
            reply,
        };
        if self.requests.send(pending).is_err() {
            return Err(GeocodeError::Aborted("test dropped receiver".to_string()));
        }
        answer
            .await
            .unwrap_or_else(|_| Err(GeocodeError::Aborted(query.to_string())))
    }
}

/// Wait for `n` parked lookups, keyed by query
pub async fn collect_pending(
    rx: &mut mpsc::UnboundedReceiver<PendingLookup>,
    n: usize,
) -> HashMap<String, PendingLookup> {
    let mut pending = HashMap::new();
    while pending.len() < n {
        let lookup = rx.recv().await.unwrap();
        pending.insert(lookup.query.clone(), lookup);
    }
    pending
}
