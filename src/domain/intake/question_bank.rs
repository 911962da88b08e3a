//! The fixed, ordered list of intake questions.
//!
//! A `QuestionBank` is loaded once at startup and never mutated. The
//! built-in bank covers a mitigation statement; a YAML file with a
//! `questions:` list can replace it.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by question bank lookups and loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionBankError {
    #[error("Question index {index} out of range (bank holds {len} questions)")]
    OutOfRange { index: usize, len: usize },

    #[error("Question bank must contain at least one question")]
    Empty,

    #[error("Question {index} is blank")]
    BlankQuestion { index: usize },

    #[error("Failed to read question bank: {0}")]
    Io(String),

    #[error("Failed to parse question bank: {0}")]
    Parse(String),
}

const DEFAULT_QUESTIONS: &[&str] = &[
    "I'd like to start by getting to know you a bit better. Could you tell me about your work? I'm interested in your profession, how long you've been qualified, your typical working hours, and what your working pattern is like.",
    "I need to understand who will be receiving this mitigation statement. Could you let me know who you intend to present this to?",
    "If you're unable to attend the hearing in person, would you mind sharing the reasons why? This can be important context for the panel or court.",
    "Now, let's talk about the situation you're facing. What specific charges or allegations are you dealing with, and who has brought them forward - is it your employer, a regulatory tribunal, or a court?",
    "I know this might be difficult to discuss, but could you walk me through what happened? Take your time - I'm here to listen and help.",
    "Help me understand what led to this situation. What were you thinking at the time? Was this something intentional, perhaps a lapse in judgment, or maybe due to lack of training or oversight? There's no judgment here - I just need to understand.",
    "When the issue first came to light, were you able to admit to the offence or charge straight away?",
    "How did you handle the situation when it was discovered? Were you able to cooperate with your employer, the regulator, or the police?",
    "Do you feel able to acknowledge your role and responsibility in what happened? This is often an important part of the process.",
    "Reflecting on this experience, what lessons have you learned? Can you share any insights about how your actions may have affected others - perhaps clients, colleagues, or the public?",
    "I'd like to understand the personal impact on you. How do you think these allegations or charges will affect you moving forward?",
    "Let's talk about your personal circumstances, as these can be relevant for mitigation. Are you married, single, or in a relationship?",
    "Do you have any children? Family circumstances can be important context.",
    "If you do have children, do any of them have specific needs such as Autism or ADHD? This kind of information can be relevant.",
    "I hope you don't mind me asking - do you have any health conditions that might be relevant to your situation?",
    "Are you the sole earner in your household? This can be important when considering the impact of any sanctions.",
    "Are you currently receiving any social security benefits or disability benefits such as income support?",
    "Do you have any debts or financial obligations that might be relevant?",
    "If you do have debts, do you have a payment plan in place to manage them?",
    "Were there any personal circumstances that might have contributed to the situation? I'm thinking of things like physical or mental health issues, burnout, or work-related pressure.",
    "Sometimes workplace factors can contribute to these situations. Were there any systemic or organizational issues involved - perhaps understaffing, lack of training, unclear protocols, feeling unsupported, or pressure from management or peers?",
    "Looking ahead, how would a disciplinary sanction such as suspension or conditions on your practice affect your livelihood?",
    "This is important for your statement - are you able to express genuine remorse for what has happened?",
    "Have you undertaken any reflective work or participated in reflective practice since this occurred? This can be valuable.",
    "If you have completed any reflective work, would you be comfortable sharing it with the panel or court as an appendix to your mitigation statement?",
    "Have you undertaken any courses, continuing professional development, or remedial training since the allegations arose? If so, what were they focused on, and do you have proof of attendance?",
    "Can you tell me about any past involvement you've had in teaching, mentoring, or quality improvement initiatives? This helps show your commitment to the profession.",
    "Have you made any changes to your practice or decision-making processes as a result of this experience?",
    "Prior to this incident, did you have an unblemished professional record?",
    "How have you contributed to your profession or community over the years? This can be important context for the panel.",
    "We touched on this earlier, but how do you think these allegations or charges will impact you personally and professionally?",
    "Are you able to obtain good character references from colleagues or clients to present to the panel or court? Please note that any character referee must state in their reference that they are aware of the allegations.",
    "Finally, how can you reassure the panel or court that this won't happen again? What steps have you taken or will you take?",
    "Is there anything else you'd like to share or add that you think would be important for the panel or court to know about your situation?",
];

static DEFAULT_BANK: Lazy<QuestionBank> = Lazy::new(|| QuestionBank {
    questions: DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect(),
});

#[derive(Debug, Deserialize)]
struct QuestionBankFile {
    questions: Vec<String>,
}

/// Ordered, immutable sequence of intake prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Arc<[String]>,
}

impl QuestionBank {
    /// Builds a bank from an explicit list. Every entry must be non-blank.
    pub fn new(questions: Vec<String>) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        if let Some(index) = questions.iter().position(|q| q.trim().is_empty()) {
            return Err(QuestionBankError::BlankQuestion { index });
        }
        Ok(Self {
            questions: questions.into(),
        })
    }

    /// The built-in mitigation statement bank.
    pub fn default_bank() -> Self {
        DEFAULT_BANK.clone()
    }

    /// Parses a YAML document of the form `questions: [..]`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, QuestionBankError> {
        let file: QuestionBankFile =
            serde_yaml::from_str(yaml).map_err(|e| QuestionBankError::Parse(e.to_string()))?;
        Self::new(file.questions)
    }

    /// Reads and parses a YAML question bank from disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, QuestionBankError> {
        let yaml = std::fs::read_to_string(path.as_ref())
            .map_err(|e| QuestionBankError::Io(e.to_string()))?;
        Self::from_yaml_str(&yaml)
    }

    /// Returns the question at `index` (0-based).
    pub fn get(&self, index: usize) -> Result<&str, QuestionBankError> {
        self.questions
            .get(index)
            .map(String::as_str)
            .ok_or(QuestionBankError::OutOfRange {
                index,
                len: self.questions.len(),
            })
    }

    /// Number of questions, N.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(String::as_str)
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::default_bank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_bank_has_34_questions() {
        let bank = QuestionBank::default_bank();
        assert_eq!(bank.len(), 34);
        assert!(bank.get(0).unwrap().starts_with("I'd like to start by getting to know you"));
        assert!(bank.get(33).unwrap().starts_with("Is there anything else"));
    }

    #[test]
    fn get_past_end_is_out_of_range() {
        let bank = QuestionBank::default_bank();
        assert_eq!(
            bank.get(34),
            Err(QuestionBankError::OutOfRange { index: 34, len: 34 })
        );
    }

    #[test]
    fn new_rejects_empty_and_blank() {
        assert_eq!(QuestionBank::new(vec![]), Err(QuestionBankError::Empty));
        assert_eq!(
            QuestionBank::new(vec!["One?".into(), "  ".into()]),
            Err(QuestionBankError::BlankQuestion { index: 1 })
        );
    }

    #[test]
    fn loads_from_yaml_string() {
        let bank = QuestionBank::from_yaml_str("questions:\n  - First?\n  - Second?\n").unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(1).unwrap(), "Second?");
    }

    #[test]
    fn rejects_yaml_without_questions_key() {
        let err = QuestionBank::from_yaml_str("items: [a]").unwrap_err();
        assert!(matches!(err, QuestionBankError::Parse(_)));
    }

    #[test]
    fn loads_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "questions:\n  - \"Who are you?\"\n  - \"What happened?\"").unwrap();

        let bank = QuestionBank::from_yaml_file(file.path()).unwrap();
        assert_eq!(bank.iter().collect::<Vec<_>>(), vec!["Who are you?", "What happened?"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = QuestionBank::from_yaml_file("/nonexistent/questions.yaml").unwrap_err();
        assert!(matches!(err, QuestionBankError::Io(_)));
    }
}
