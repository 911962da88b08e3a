//! Conversation classifier.
//!
//! A pure function of the turn history: it segments the user's turns into
//! readiness replies and answers, then decides what the assistant says next.
//!
//! # Segmentation
//!
//! Every user turn before the first affirmation (and the affirmation itself)
//! is a readiness reply. Everything after it is an answer. An answer only
//! counts toward progress when its trimmed text is at least two characters.
//!
//! # Short answers
//!
//! Only the most recent answer is length-checked. Under
//! [`ShortAnswerPolicy::LastAnswerOnly`] a short answer that was followed by
//! more answers stays in the transcript and shifts every later answer off
//! its question when the pairs are built. [`ShortAnswerPolicy::ReaskInPlace`]
//! drops short answers from the pairs and repeats the pending question.

use serde::{Deserialize, Serialize};

use super::prompts::{
    clarification_with_question, CLARIFICATION_REQUEST, CONTINUE_PREFIX, NOT_READY_REPLY,
    READINESS_PROMPT, START_PREFIX,
};
use super::question_bank::{QuestionBank, QuestionBankError};
use super::record::QaPair;
use super::turn::Turn;

const AFFIRMATION_KEYWORDS: &[&str] = &["yes", "yeah", "yep", "ok", "sure", "ready", "go", "start"];

const MIN_ANSWER_CHARS: usize = 2;

/// True when the text reads as "yes, proceed".
///
/// Substring match, so "good" and "not going" both qualify.
pub fn is_affirmation(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    AFFIRMATION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// True when the text is long enough to count as an answer.
pub fn is_substantive_answer(text: &str) -> bool {
    text.trim().chars().count() >= MIN_ANSWER_CHARS
}

/// Where the conversation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// No user turns yet.
    Initial,
    /// The user has never affirmed.
    NotReady,
    /// The user just affirmed and has not answered anything.
    QuestionsStart,
    /// At least one turn after the affirmation.
    QuestionsContinue,
}

/// How short answers are treated once they are no longer the last turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortAnswerPolicy {
    #[default]
    LastAnswerOnly,
    ReaskInPlace,
}

/// Result of classifying a history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub state: ConversationState,
    /// Position of the first affirming turn among the user turns.
    pub first_positive_index: Option<usize>,
    /// Number of leading user turns that are not answers.
    pub skip_count: usize,
    /// User turns after the affirmation, in order.
    pub actual_responses: Vec<String>,
    /// How many of `actual_responses` are substantive.
    pub answered_count: usize,
}

impl Classification {
    /// Whether the most recent answer is too short to accept.
    pub fn last_answer_is_short(&self) -> bool {
        self.actual_responses
            .last()
            .is_some_and(|last| !is_substantive_answer(last))
    }
}

/// What the assistant does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    ReadinessCheck,
    NotReady,
    /// Ask question `index`. `opening` marks the first question after the affirmation.
    Ask { index: usize, opening: bool },
    /// Ask for more detail, repeating question `reask` when the policy does so.
    Clarify { reask: Option<usize> },
    /// Every question has a substantive answer.
    Complete,
}

impl NextStep {
    pub fn is_complete(&self) -> bool {
        matches!(self, NextStep::Complete)
    }

    /// The question this step asks, if any.
    pub fn question_index(&self) -> Option<usize> {
        match self {
            NextStep::Ask { index, .. } => Some(*index),
            NextStep::Clarify { reask } => *reask,
            _ => None,
        }
    }
}

/// Classifies histories against a question bank.
#[derive(Debug, Clone)]
pub struct ConversationClassifier {
    bank: QuestionBank,
    policy: ShortAnswerPolicy,
}

impl ConversationClassifier {
    pub fn new(bank: QuestionBank, policy: ShortAnswerPolicy) -> Self {
        Self { bank, policy }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn policy(&self) -> ShortAnswerPolicy {
        self.policy
    }

    /// Segments a history into readiness replies and answers.
    pub fn classify(&self, turns: &[Turn]) -> Classification {
        let user_turns: Vec<&str> = turns
            .iter()
            .filter(|t| t.is_user())
            .map(Turn::content)
            .collect();

        if user_turns.is_empty() {
            return Classification {
                state: ConversationState::Initial,
                first_positive_index: None,
                skip_count: 0,
                actual_responses: Vec::new(),
                answered_count: 0,
            };
        }

        let Some(first_positive) = user_turns.iter().position(|t| is_affirmation(t)) else {
            return Classification {
                state: ConversationState::NotReady,
                first_positive_index: None,
                skip_count: 0,
                actual_responses: Vec::new(),
                answered_count: 0,
            };
        };

        let skip_count = first_positive + 1;
        let actual_responses: Vec<String> = user_turns[skip_count..]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let answered_count = actual_responses
            .iter()
            .filter(|r| is_substantive_answer(r))
            .count();

        let state = if actual_responses.is_empty() {
            ConversationState::QuestionsStart
        } else {
            ConversationState::QuestionsContinue
        };

        Classification {
            state,
            first_positive_index: Some(first_positive),
            skip_count,
            actual_responses,
            answered_count,
        }
    }

    /// Decides the next step for a classification.
    pub fn decide(&self, classification: &Classification) -> NextStep {
        match classification.state {
            ConversationState::Initial => NextStep::ReadinessCheck,
            ConversationState::NotReady => NextStep::NotReady,
            ConversationState::QuestionsStart => NextStep::Ask {
                index: 0,
                opening: true,
            },
            ConversationState::QuestionsContinue => {
                let answered = classification.answered_count;
                if classification.last_answer_is_short() {
                    let reask = match self.policy {
                        ShortAnswerPolicy::LastAnswerOnly => None,
                        ShortAnswerPolicy::ReaskInPlace => {
                            (answered < self.bank.len()).then_some(answered)
                        }
                    };
                    NextStep::Clarify { reask }
                } else if answered < self.bank.len() {
                    NextStep::Ask {
                        index: answered,
                        opening: false,
                    }
                } else {
                    NextStep::Complete
                }
            }
        }
    }

    /// Renders the assistant reply for a non-terminal step.
    ///
    /// Returns `None` for [`NextStep::Complete`]; the caller composes the
    /// completion message from the generated document.
    pub fn reply_for(&self, step: &NextStep) -> Result<Option<String>, QuestionBankError> {
        let reply = match step {
            NextStep::ReadinessCheck => READINESS_PROMPT.to_string(),
            NextStep::NotReady => NOT_READY_REPLY.to_string(),
            NextStep::Ask { index, opening } => {
                let prefix = if *opening { START_PREFIX } else { CONTINUE_PREFIX };
                format!("{}{}", prefix, self.bank.get(*index)?)
            }
            NextStep::Clarify { reask: None } => CLARIFICATION_REQUEST.to_string(),
            NextStep::Clarify { reask: Some(index) } => {
                clarification_with_question(self.bank.get(*index)?)
            }
            NextStep::Complete => return Ok(None),
        };
        Ok(Some(reply))
    }

    /// Pairs answers with the questions they are taken to answer.
    pub fn answer_pairs(&self, classification: &Classification) -> Vec<QaPair> {
        match self.policy {
            ShortAnswerPolicy::LastAnswerOnly => classification
                .actual_responses
                .iter()
                .enumerate()
                .map(|(i, answer)| QaPair::new(self.question_label(i), answer.clone()))
                .collect(),
            ShortAnswerPolicy::ReaskInPlace => classification
                .actual_responses
                .iter()
                .filter(|a| is_substantive_answer(a))
                .enumerate()
                .map(|(i, answer)| QaPair::new(self.question_label(i), answer.clone()))
                .collect(),
        }
    }

    fn question_label(&self, index: usize) -> String {
        self.bank
            .get(index)
            .map(str::to_string)
            .unwrap_or_else(|_| format!("Question {}", index + 1))
    }
}
