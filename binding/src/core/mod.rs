//! Core binding logic
//!
//! Pure, runtime-free pieces: parameter key normalization and the state
//! value published to consumers.

pub mod param_key;
pub mod state;

pub use param_key::{ParamKey, normalize};
pub use state::ResourceState;
