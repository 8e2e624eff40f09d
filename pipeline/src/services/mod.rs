//! Service implementations
//!
//! Production-side implementations of the pipeline traits. The gateway is
//! simulated: it confirms against an in-memory repository after a
//! configurable delay and fails on demand.

pub mod candidate_fetcher;
pub mod in_memory_repository;
pub mod notifier;
pub mod simulated_gateway;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use candidate_fetcher::CandidateFetcher;
pub use in_memory_repository::InMemoryCandidateRepository;
pub use notifier::TracingNotifier;
pub use simulated_gateway::SimulatedGateway;
