//! Resource binding
//!
//! A [`ResourceBinding`] owns the state of one consumer's view of a
//! parameterized resource. Fetches run as tasks on the ambient Tokio
//! runtime; every fetch is tagged with a generation number and only the
//! most recently issued one may commit. Older results are discarded when
//! they arrive, so completions that come back out of order never overwrite
//! newer state.
//!
//! Each binding is keyed independently. There is no cache shared between
//! bindings.

use serde::{Deserialize, Serialize};
use shared::{Component, component_debug, component_error, component_warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::{ParamKey, ResourceState, normalize};
use crate::error::{BindingError, BindingResult};
use crate::traits::Fetcher;

/// Binding behaviour options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingOptions<T> {
    /// Fetch on creation and whenever the parameter key changes
    pub auto_fetch: bool,
    /// Data to start from; skips the initial fetch
    pub initial: Option<T>,
    /// Fail a fetch that takes longer than this
    pub fetch_timeout: Option<Duration>,
}

impl<T> Default for BindingOptions<T> {
    fn default() -> Self {
        Self {
            auto_fetch: true,
            initial: None,
            fetch_timeout: None,
        }
    }
}

impl<T> BindingOptions<T> {
    /// Only fetch when `refetch` is called
    pub fn manual() -> Self {
        Self {
            auto_fetch: false,
            ..Self::default()
        }
    }

    pub fn with_initial(mut self, initial: T) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }
}

/// What happened to a fetch once it resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was written to the binding state
    Committed,
    /// A newer fetch had been issued; the result was dropped
    Discarded,
}

/// Handle to an issued fetch
///
/// Dropping the handle does not cancel the fetch.
#[derive(Debug)]
pub struct FetchHandle {
    handle: JoinHandle<FetchOutcome>,
}

impl FetchHandle {
    /// Wait for the fetch to resolve
    pub async fn wait(self) -> BindingResult<FetchOutcome> {
        self.handle.await.map_err(|e| {
            component_error!(Component::Binding, error = %e, "Fetch task did not complete");
            BindingError::TaskFailed {
                message: e.to_string(),
            }
        })
    }
}

struct Control<P> {
    params: Arc<P>,
    key: ParamKey,
    generation: u64,
}

struct Inner<P, T> {
    state: watch::Sender<ResourceState<T>>,
    control: Mutex<Control<P>>,
    auto_fetch: bool,
    fetch_timeout: Option<Duration>,
}

impl<P, T> Inner<P, T> {
    fn lock_control(&self) -> MutexGuard<'_, Control<P>> {
        self.control.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write a fetch result if it still belongs to the current generation
    fn commit(&self, generation: u64, result: BindingResult<Option<T>>) -> FetchOutcome {
        let control = self.lock_control();
        if control.generation != generation {
            component_debug!(
                Component::Binding,
                generation,
                current = control.generation,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(data) => self.state.send_modify(|state| state.resolve(data)),
            Err(error) => {
                component_warn!(
                    Component::Binding,
                    generation,
                    error = %error,
                    "Fetch failed"
                );
                self.state.send_modify(|state| state.fail(error));
            }
        }
        FetchOutcome::Committed
    }
}

/// Binds a consumer to `fetcher(params)`
pub struct ResourceBinding<P, T> {
    fetcher: Arc<dyn Fetcher<P, T>>,
    inner: Arc<Inner<P, T>>,
}

impl<P, T> Clone for ResourceBinding<P, T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, T> ResourceBinding<P, T>
where
    P: Serialize + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Create a binding and, when auto-fetching without initial data, issue
    /// the first fetch immediately
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind<F>(fetcher: F, params: P, options: BindingOptions<T>) -> Self
    where
        F: Fetcher<P, T> + 'static,
    {
        Self::bind_shared(Arc::new(fetcher), params, options)
    }

    /// Same as [`ResourceBinding::bind`] for an already shared fetcher
    pub fn bind_shared(fetcher: Arc<dyn Fetcher<P, T>>, params: P, options: BindingOptions<T>) -> Self {
        let params = Arc::new(params);
        let key = normalize(&*params);

        let initial_fetch = options.auto_fetch && options.initial.is_none();
        let initial_state = match options.initial {
            Some(data) => ResourceState::with_data(data),
            None if initial_fetch => ResourceState::loading(),
            None => ResourceState::idle(),
        };
        let (state, _) = watch::channel(initial_state);

        let binding = Self {
            fetcher,
            inner: Arc::new(Inner {
                state,
                control: Mutex::new(Control {
                    params,
                    key,
                    generation: 0,
                }),
                auto_fetch: options.auto_fetch,
                fetch_timeout: options.fetch_timeout,
            }),
        };

        if initial_fetch {
            // Detached; the result lands in the watched state
            let _ = binding.issue_fetch();
        }
        binding
    }

    /// Record new parameters and fetch if their key changed
    ///
    /// Returns `None` when the key is unchanged, or when auto-fetch is off.
    /// In the latter case the parameters are still recorded for the next
    /// `refetch`.
    pub fn set_params(&self, params: P) -> Option<FetchHandle> {
        let params = Arc::new(params);
        let key = normalize(&*params);

        {
            let mut control = self.inner.lock_control();
            if control.key == key {
                return None;
            }
            component_debug!(Component::Binding, key = %key, "Parameter key changed");
            control.params = params;
            control.key = key;
        }

        if !self.inner.auto_fetch {
            return None;
        }
        Some(self.issue_fetch())
    }

    /// Fetch again with the last recorded parameters
    pub fn refetch(&self) -> FetchHandle {
        self.issue_fetch()
    }

    /// Replace the data without touching loading or error
    pub fn set_data(&self, data: Option<T>) {
        let _control = self.inner.lock_control();
        self.inner.state.send_modify(|state| state.data = data);
    }

    /// Mutate the data without touching loading or error
    ///
    /// This is the optimistic mutation path. A fetch that is still in flight
    /// will overwrite the result when it commits. Holding the control lock
    /// keeps a commit from landing between the read and the write, so the
    /// updater must not call back into the binding.
    pub fn update_data<R>(&self, updater: impl FnOnce(&mut Option<T>) -> R) -> R {
        let _control = self.inner.lock_control();
        let mut data = self.inner.state.borrow().data.clone();
        let output = updater(&mut data);
        self.inner.state.send_modify(|state| state.data = data);
        output
    }

    /// Current state
    pub fn snapshot(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<Arc<BindingError>> {
        self.inner.state.borrow().error.clone()
    }

    /// Observe every state change
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.inner.state.subscribe()
    }

    /// Wait until no fetch is in flight and return the state at that point
    pub async fn settled(&self) -> ResourceState<T> {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }

    fn issue_fetch(&self) -> FetchHandle {
        let (generation, params) = {
            let mut control = self.inner.lock_control();
            control.generation += 1;
            self.inner.state.send_modify(|state| state.begin_loading());
            (control.generation, Arc::clone(&control.params))
        };
        component_debug!(Component::Binding, generation, "Issuing fetch");

        let fetcher = Arc::clone(&self.fetcher);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let params = (*params).clone();
            let result = match inner.fetch_timeout {
                Some(limit) => match tokio::time::timeout(limit, fetcher.fetch(params)).await {
                    Ok(result) => result,
                    Err(_) => Err(BindingError::Timeout { after: limit }),
                },
                None => fetcher.fetch(params).await,
            };
            inner.commit(generation, result)
        });

        FetchHandle { handle }
    }
}
