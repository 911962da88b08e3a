//! Intake module - the questionnaire and its conversation state machine.
//!
//! - `question_bank` - the ordered, immutable list of questions
//! - `turn` - validated conversation turns
//! - `classifier` - maps a turn history to the next assistant step
//! - `record` - the finalized outcome and its review lifecycle
//! - `phase` - per-session progress through the request cycle

mod classifier;
mod phase;
pub mod prompts;
mod question_bank;
mod record;
mod turn;

pub use classifier::{
    is_affirmation, is_substantive_answer, Classification, ConversationClassifier,
    ConversationState, NextStep, ShortAnswerPolicy,
};
pub use phase::IntakePhase;
pub use question_bank::{QuestionBank, QuestionBankError};
pub use record::{IntakeRecord, QaPair, RecordStatus};
pub use turn::{Speaker, Turn};
