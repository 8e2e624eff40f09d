//! Test helpers for binding integration tests
//!
//! `GatedFetcher` lets a test decide when, and in which order, each fetch
//! resolves. Every parameter value gets a gate registered up front; the
//! fetch for that value blocks until the test opens the gate.

#![allow(dead_code)]

use async_trait::async_trait;
use binding::{BindingError, BindingResult, Fetcher};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub type Gate<T> = oneshot::Sender<BindingResult<Option<T>>>;

struct GateState<T> {
    gates: Mutex<HashMap<String, oneshot::Receiver<BindingResult<Option<T>>>>>,
    calls: AtomicUsize,
}

/// Fetcher whose results are released by the test
pub struct GatedFetcher<T> {
    state: Arc<GateState<T>>,
}

impl<T> Clone for GatedFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> GatedFetcher<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(GateState {
                gates: Mutex::new(HashMap::new()),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Register the gate for the next fetch of `params`
    pub fn gate(&self, params: &str) -> Gate<T> {
        let (sender, receiver) = oneshot::channel();
        self.state
            .gates
            .lock()
            .unwrap()
            .insert(params.to_string(), receiver);
        sender
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Send + 'static> Fetcher<String, T> for GatedFetcher<T> {
    async fn fetch(&self, params: String) -> BindingResult<Option<T>> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.state.gates.lock().unwrap().remove(&params);
        match gate {
            Some(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(BindingError::fetch("gate dropped"))),
            None => Err(BindingError::fetch(format!("no gate registered for {params}"))),
        }
    }
}

/// Open a gate with a successful result
pub fn release<T>(gate: Gate<T>, value: T) {
    let _ = gate.send(Ok(Some(value)));
}

/// Open a gate with a failure
pub fn reject<T>(gate: Gate<T>, message: &str) {
    let _ = gate.send(Err(BindingError::fetch(message)));
}
