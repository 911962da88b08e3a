//! LLM-backed statement generator.
//!
//! Implements `GenerationClient` on top of any `AIProvider`: the answers
//! and retrieved cases are folded into one prompt and sent as a single
//! completion request.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::intake::QaPair;
use crate::ports::{
    AIProvider, CompletionRequest, FinishReason, GenerationClient, GenerationContext,
    GenerationError, MessageRole, RequestMetadata, RetrievedCase,
};

/// Persona sent as the system prompt.
pub const SYSTEM_PROMPT: &str = "You are an outstanding UK lawyer with 30 years legal experience in criminal and regulatory compliance law. You are renowned for helping clients prepare plea and mitigation statements to provide to the court or tribunal panel.";

const CASE_SEPARATOR: &str = "\n\n---\n\n";

/// Sampling settings for generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            temperature: 0.7,
        }
    }
}

/// `GenerationClient` that drafts a mitigation statement with an LLM.
pub struct StatementGenerator {
    provider: Arc<dyn AIProvider>,
    settings: GenerationSettings,
}

impl StatementGenerator {
    pub fn new(provider: Arc<dyn AIProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }
}

/// `question: answer` lines separated by blank lines.
pub fn format_answers(pairs: &[QaPair]) -> String {
    pairs
        .iter()
        .map(|p| format!("{}: {}", p.question, p.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Retrieved case texts separated by rules.
pub fn format_cases(cases: &[RetrievedCase]) -> String {
    cases
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(CASE_SEPARATOR)
}

/// Builds the user prompt.
pub fn build_prompt(pairs: &[QaPair], cases: &[RetrievedCase]) -> String {
    format!(
        r#"You are required to write a persuasive and compelling mitigation statement for your client based on their instructions and from your own vast knowledge and experience. The statement should be meticulously structured to present a strong case for a lenient client outcome.

The statement must only be prepared using the laws of England and Wales and you must reference any UK caselaw, guidance, guidelines, rules, best practice or other legal principles. You must not include any personal data.

You should be specific, clear and detailed, speak plain English and use simple language. You should be authoritative. You must define any acronyms relied on.

You should prepare the mitigation statement in the first person, as if you were the client.

The client has provided the following information:

{answers}

Using the following relevant case information as guidance, draft a comprehensive and professional mitigation statement:

{cases}

IMPORTANT: Create a persuasive and compelling mitigation statement that presents a strong case for leniency. The statement should be meticulously structured, reference relevant UK legal principles where appropriate, and be written in the first person as if the client is speaking directly to the court or tribunal panel.

The statement should:

1. Be professional and respectful in tone
2. Address any specific allegations mentioned (or acknowledge that details may be limited)
3. Include relevant mitigating factors if mentioned, or suggest common ones if not specified
4. Express appropriate remorse if applicable
5. Outline potential remedial actions if mentioned, or suggest general ones if not specified
6. Be concise but comprehensive (approximately 300-500 words)
7. Include a note that the statement can be customized further based on additional details

Do not include any personal information from the provided cases. Focus on creating a statement that is tailored to the client's specific situation."#,
        answers = format_answers(pairs),
        cases = format_cases(cases),
    )
}

#[async_trait]
impl GenerationClient for StatementGenerator {
    async fn generate(
        &self,
        ctx: &GenerationContext,
        pairs: &[QaPair],
        cases: &[RetrievedCase],
    ) -> Result<String, GenerationError> {
        let metadata = RequestMetadata::new(
            ctx.user_id.clone(),
            ctx.session_id,
            Uuid::new_v4().to_string(),
        );
        let request = CompletionRequest::new(metadata)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, build_prompt(pairs, cases))
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);

        let response = self.provider.complete(request).await?;

        tracing::info!(
            session_id = %ctx.session_id,
            pairs = pairs.len(),
            cases = cases.len(),
            output_tokens = response.usage.completion_tokens,
            "Statement generated"
        );
        if response.finish_reason == FinishReason::Length {
            tracing::warn!(
                session_id = %ctx.session_id,
                max_tokens = self.settings.max_tokens,
                "Statement stopped at the token limit"
            );
        }

        let document = response.content.trim();
        if document.is_empty() {
            return Err(GenerationError::EmptyOutput);
        }
        Ok(document.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::{SessionId, UserId};

    fn ctx() -> GenerationContext {
        GenerationContext {
            user_id: UserId::new("user-1").unwrap(),
            session_id: SessionId::new(),
        }
    }

    fn pairs() -> Vec<QaPair> {
        vec![
            QaPair::new("What do you do?", "Nurse"),
            QaPair::new("Who is it for?", "NMC"),
        ]
    }

    #[test]
    fn answers_are_joined_with_blank_lines() {
        assert_eq!(
            format_answers(&pairs()),
            "What do you do?: Nurse\n\nWho is it for?: NMC"
        );
    }

    #[test]
    fn cases_are_joined_with_rules() {
        let cases = vec![RetrievedCase::new("A", 0.9), RetrievedCase::new("B", 0.8)];
        assert_eq!(format_cases(&cases), "A\n\n---\n\nB");
    }

    #[test]
    fn prompt_embeds_answers_and_cases() {
        let prompt = build_prompt(&pairs(), &[RetrievedCase::new("Case text", 0.5)]);
        assert!(prompt.contains("What do you do?: Nurse"));
        assert!(prompt.contains("draft a comprehensive and professional mitigation statement:\n\nCase text"));
    }

    #[tokio::test]
    async fn generate_sends_single_request_with_settings() {
        let provider = MockAIProvider::new().with_response("  The statement.  ");
        let generator = StatementGenerator::new(Arc::new(provider.clone()), GenerationSettings::default());

        let document = generator.generate(&ctx(), &pairs(), &[]).await.unwrap();

        assert_eq!(document, "The statement.");
        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system_prompt.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(calls[0].max_tokens, Some(4000));
        assert_eq!(calls[0].temperature, Some(0.7));
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried() {
        let provider = MockAIProvider::new()
            .with_error(MockError::Unavailable { message: "down".into() })
            .with_response("never reached");
        let generator = StatementGenerator::new(Arc::new(provider.clone()), GenerationSettings::default());

        let err = generator.generate(&ctx(), &pairs(), &[]).await.unwrap_err();

        assert!(matches!(err, GenerationError::Provider(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn blank_output_is_an_error() {
        let provider = MockAIProvider::new().with_response("   ");
        let generator = StatementGenerator::new(Arc::new(provider), GenerationSettings::default());

        let err = generator.generate(&ctx(), &pairs(), &[]).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyOutput));
    }

    #[tokio::test]
    async fn truncated_statement_is_still_returned() {
        let provider = MockAIProvider::new().with_truncated_response("The statement ends mid");
        let generator = StatementGenerator::new(Arc::new(provider), GenerationSettings::default());

        let document = generator.generate(&ctx(), &pairs(), &[]).await.unwrap();
        assert_eq!(document, "The statement ends mid");
    }
}
