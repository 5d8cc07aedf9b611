//! State layer for Sentinel
//!
//! Explicit, owned stores for the server inventory, the recommendation
//! catalog, and the action log. Each is created once at startup and shared
//! by reference.

pub mod action_log;
pub mod recommendations;
pub mod seed;
pub mod servers;

pub use action_log::ActionLog;
pub use recommendations::RecommendationBook;
pub use servers::ServerStore;
