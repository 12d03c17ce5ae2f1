pub mod difficulty;
pub mod state;
pub mod words;

pub use difficulty::{params_for, Mode, TurnParams};
pub use state::{ConversationId, PlayerId, Session, SessionState};
pub use words::RejectReason;
