pub mod game_flow;
pub mod registry;
pub mod scheduler;

pub use game_flow::{GameFlowService, StatusReport, SubmitOutcome};
pub use registry::{SessionHandle, SessionRegistry};
