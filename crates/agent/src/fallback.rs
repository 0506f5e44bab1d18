use std::sync::Arc;

use crate::llm::{ChatMessage, CompletionRequest, LlmClient, LlmError, SamplingConfig};

const LABELLING_INSTRUCTION: &str = "Label a user's message from a conversation with an intent. Reply ONLY with the name of the intent.
The intent should be one of the following:
- explain_feature
- find_page
- mongolian_greeting
- non_english
- provide_feature_request (provide a request for a new feature or function)
- provide_bug_report (report a software bug or software errors)
- provide_generic_comment (provide a non-specific generic comment)
- out_of_scope";

/// Labels the classifier may re-inject into the conversation.
pub const VALID_INTENTS: [&str; 11] = [
    "explain_feature",
    "find_page",
    "mongolian_greeting",
    "non_english",
    "help",
    "inform",
    "thankyou",
    "provide_feature_request",
    "provide_bug_report",
    "provide_generic_comment",
    "out_of_scope",
];

#[derive(Debug)]
pub enum Classification {
    Intent(String),
    /// The model answered with something outside [`VALID_INTENTS`].
    Unrecognized(String),
    Failed(LlmError),
}

#[derive(Clone)]
pub struct FallbackClassifier {
    llm: Arc<dyn LlmClient>,
}

impl FallbackClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn classify(&self, text: &str) -> Classification {
        let request = CompletionRequest::new(
            vec![ChatMessage::system(LABELLING_INSTRUCTION), ChatMessage::user(text)],
            SamplingConfig::fallback(),
        );

        match self.llm.complete(request).await {
            Ok(answer) => normalize_label(&answer),
            Err(error) => Classification::Failed(error),
        }
    }
}

pub fn normalize_label(answer: &str) -> Classification {
    let label = answer.trim().to_lowercase();
    if VALID_INTENTS.contains(&label.as_str()) {
        Classification::Intent(label)
    } else {
        Classification::Unrecognized(label)
    }
}
