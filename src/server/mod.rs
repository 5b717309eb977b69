//! # Server Components
//!
//! The catalog server is split into small pieces wired together by [`api`]:
//!
//! ## Image Store ([`store`])
//! Id-ordered records, seeded with generated samples at startup.
//!
//! ## Response Simulator ([`simulator`])
//! Random delay and fault injection on image fetches.
//!
//! ## Subscription Manager ([`subscriptions`])
//! Open WebSocket subscribers and new-image fan-out.
//!
//! ## API ([`api`])
//! Application state, axum router and handlers.

pub mod api;
pub mod error;
pub mod metrics;
pub mod simulator;
pub mod store;
pub mod subscriptions;

// Re-export for convenience
pub use api::{create_app, AppState, SharedState};
pub use error::ApiError;
pub use metrics::CatalogMetrics;
pub use simulator::{FixedOutcome, OutcomeStrategy, RandomOutcome, ResponseOutcome, ResponseSimulator};
pub use store::ImageStore;
pub use subscriptions::SubscriptionManager;
