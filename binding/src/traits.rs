//! Fetch seam injected into every binding
//!
//! A fetcher resolves `Ok(None)` for expected absence and returns an error
//! only for genuine failures.

use async_trait::async_trait;
use std::future::Future;

use crate::error::BindingResult;

/// Asynchronous source of a parameterized resource
#[async_trait]
pub trait Fetcher<P, T>: Send + Sync {
    /// Fetch the resource for the given parameters
    async fn fetch(&self, params: P) -> BindingResult<Option<T>>;
}

/// Adapter turning an async closure into a [`Fetcher`]
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap `Fn(P) -> impl Future<Output = BindingResult<Option<T>>>` as a fetcher
pub fn fetch_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher { f }
}

#[async_trait]
impl<P, T, F, Fut> Fetcher<P, T> for FnFetcher<F>
where
    P: Send + 'static,
    T: Send + 'static,
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = BindingResult<Option<T>>> + Send + 'static,
{
    async fn fetch(&self, params: P) -> BindingResult<Option<T>> {
        (self.f)(params).await
    }
}
