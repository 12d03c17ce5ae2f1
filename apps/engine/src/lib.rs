#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Turn-based elimination word-chain game engine for chat-style group
//! conversations. The engine owns per-conversation session state, the
//! recruitment lobby, turn scheduling with deadline warnings, the
//! word-acceptance pipeline and difficulty scaling; message delivery,
//! dictionary lookups and snapshot persistence are pluggable collaborators.

pub mod config;
pub mod dictionary;
pub mod domain;
pub mod error;
pub mod errors;
pub mod notify;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod test_support;
pub mod utils;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::EngineConfig;
pub use domain::difficulty::Mode;
pub use domain::words::RejectReason;
pub use error::AppError;
pub use notify::{Notification, NotificationSink};
pub use services::game_flow::{GameFlowService, StatusReport, SubmitOutcome};
pub use state::AppState;
pub use store::{PlayerStats, SessionSnapshot, SnapshotStore};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
