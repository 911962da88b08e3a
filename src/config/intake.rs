//! Questionnaire configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::intake::{QuestionBank, QuestionBankError, ShortAnswerPolicy};

/// Questionnaire configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeConfig {
    /// How answers shorter than two characters are handled
    #[serde(default)]
    pub short_answer_policy: ShortAnswerPolicy,

    /// YAML file with a `questions:` list. Built-in bank when absent.
    pub question_bank_path: Option<PathBuf>,
}

impl IntakeConfig {
    /// Loads the configured question bank.
    pub fn question_bank(&self) -> Result<QuestionBank, QuestionBankError> {
        match &self.question_bank_path {
            Some(path) => QuestionBank::from_yaml_file(path),
            None => Ok(QuestionBank::default_bank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_use_builtin_bank() {
        let config = IntakeConfig::default();
        assert_eq!(config.short_answer_policy, ShortAnswerPolicy::LastAnswerOnly);
        assert_eq!(
            config.question_bank().unwrap().len(),
            QuestionBank::default_bank().len()
        );
    }

    #[test]
    fn test_question_bank_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "questions:\n  - \"First?\"\n  - \"Second?\"").unwrap();

        let config = IntakeConfig {
            question_bank_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(config.question_bank().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_error() {
        let config = IntakeConfig {
            question_bank_path: Some("/nonexistent/questions.yaml".into()),
            ..Default::default()
        };
        assert!(config.question_bank().is_err());
    }
}
