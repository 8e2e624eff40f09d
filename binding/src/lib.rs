//! Resource binding library
//!
//! Binds a consumer to an asynchronous, parameterized fetch. A binding owns
//! its loading/error/data state, refetches only when the canonical key of
//! its parameters changes, suppresses stale in-flight results and exposes a
//! direct mutation path for optimistic updates.

pub mod binding;
pub mod core;
pub mod error;
pub mod traits;

// Re-export commonly used types
pub use binding::{BindingOptions, FetchHandle, FetchOutcome, ResourceBinding};
pub use crate::core::{ParamKey, ResourceState, normalize};
pub use error::{BindingError, BindingResult};
pub use traits::{FnFetcher, Fetcher, fetch_fn};
