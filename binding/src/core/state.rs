//! State published by a resource binding

use std::sync::Arc;

use crate::error::BindingError;

/// Loading/error/data triple observed by consumers of a binding
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<Arc<BindingError>>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> ResourceState<T> {
    /// Nothing fetched and nothing in flight
    pub fn idle() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }

    /// A fetch is in flight and nothing has been committed yet
    pub fn loading() -> Self {
        Self {
            data: None,
            is_loading: true,
            error: None,
        }
    }

    /// Seeded with caller-supplied data
    pub fn with_data(data: T) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
            error: None,
        }
    }

    /// Enter loading; a previous error never survives a new attempt
    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Commit a successful fetch
    pub fn resolve(&mut self, data: Option<T>) {
        self.data = data;
        self.is_loading = false;
        self.error = None;
    }

    /// Commit a failed fetch
    pub fn fail(&mut self, error: BindingError) {
        self.data = None;
        self.is_loading = false;
        self.error = Some(Arc::new(error));
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
