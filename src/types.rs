use serde::{Deserialize, Serialize};

pub const PROCESSING_ERROR_MESSAGE: &str =
    "I'm sorry, I encountered an error processing your request.";

/// Result of one conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Model reply after output redaction.
    Replied(String),
    /// Input tripped the filter; the model was never called.
    Rejected(String),
    /// The model call failed.
    Failed(String),
}

impl TurnOutcome {
    pub fn approved(&self) -> bool {
        !matches!(self, TurnOutcome::Rejected(_))
    }

    pub fn message(&self) -> &str {
        match self {
            TurnOutcome::Replied(message)
            | TurnOutcome::Rejected(message)
            | TurnOutcome::Failed(message) => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReply {
    pub approved: bool,
    pub message: String,
}

impl From<TurnOutcome> for TurnReply {
    fn from(outcome: TurnOutcome) -> Self {
        let approved = outcome.approved();
        let message = match outcome {
            TurnOutcome::Replied(message)
            | TurnOutcome::Rejected(message)
            | TurnOutcome::Failed(message) => message,
        };
        Self { approved, message }
    }
}
