//! Fixed assistant texts used by the intake flow.

/// First assistant turn of every session.
pub const READINESS_PROMPT: &str = "Hi, welcome to your consultation. This should take about 15 minutes to complete as I need important information. Are you ready to start?";

pub const NOT_READY_REPLY: &str = "No problem. Come back when you are ready.";

/// Prepended to the first question once the user affirms.
pub const START_PREFIX: &str = "Awesome, let's go. ";

/// Prepended to every subsequent question.
pub const CONTINUE_PREFIX: &str = "Thank you for sharing that with me. ";

pub const CLARIFICATION_REQUEST: &str =
    "Could you provide a bit more detail? Even a sentence or two would be helpful.";

/// Reply when generation failed but the answers were kept.
pub const DEGRADED_COMPLETION: &str = "Thank you for providing all that information. I encountered an issue generating your statement. Our team has saved your answers and will follow up with you shortly.";

/// Reply to any message sent after a record already exists for the session.
pub const ALREADY_COMPLETE: &str = "This consultation is already complete. Your answers have been saved and our qualified solicitor will review your statement before delivery.";

/// Wraps a generated document in the completion message.
pub fn completion_message(document: &str) -> String {
    format!(
        "Thank you for providing all that information. I've prepared your mitigation statement:\n\n{}\n\nOur qualified solicitor will review this before delivery.",
        document
    )
}

/// Clarification text that repeats the question being re-asked.
pub fn clarification_with_question(question: &str) -> String {
    format!("{} {}", CLARIFICATION_REQUEST, question)
}
