//! Core library for Sentinel
//!
//! This crate defines the cleanup request/result model, the simulated
//! cleanup executor, the deletion advisor, and the shared fleet types
//! used across all Sentinel components.

pub mod advisor;
pub mod cleanup;
pub mod error;
pub mod simulator;
pub mod summary;
pub mod types;

// Re-exports
pub use advisor::{Advice, AdviceRequest, AdvisorConfig, ChatAdvisor, DeletionAdvisor};
pub use cleanup::{
    run_cleanup, validate, CleanupExecutor, CleanupRequest, CleanupRequestInput, CleanupResult,
    OperationOutcome,
};
pub use error::{Error, Result};
pub use simulator::{Chance, CleanupSimulator, SimulatorConfig};
pub use summary::FleetSummary;
pub use types::{
    format_bytes, LogEntry, LogLevel, NewServer, Recommendation, RecommendationKind, Server,
    ServerStatus,
};
