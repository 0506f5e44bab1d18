//! Model-assisted feature-request helpers: splitting a free-text request into
//! its components, and writing a user story from the completed form.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use parley_core::domain::event::Event;
use parley_core::domain::tracker::Tracker;
use parley_core::forms::slots::*;

use crate::llm::{ChatMessage, CompletionRequest, LlmClient, LlmError, SamplingConfig};

const EXTRACTION_INSTRUCTION: &str = r#"Based on user's description, identify and extract the distinct components related to a feature request. The response should be formatted as JSON with the following fields:
- 'goal_and_objective': The main purpose and expected outcome of the feature.
- 'pain_points_and_challenges': Specific problems or frustrations the user is currently experiencing that the new feature should address.
- 'use_case': How the user envisions using the new feature, including specific actions or capabilities needed.
- 'target_area': The target part of the software where the new feature should be implemented or integrated.
- 'acceptance_criteria': Conditions for the feature to be considered complete and successful, and how it will be tested and validated.
- 'priority_and_urgency': The importance of the feature compared to other tasks, and any specific timeline or deadline for its implementation.

Each field should contain the relevant extracted information, however try to keep it as short as possible and no need for complete sentences.
If any information is not provided by the user, leave the field empty. Here is the structure to follow:

{
    "goal_and_objective": "",
    "pain_points_and_challenges": "",
    "use_case": "",
    "target_area": "",
    "acceptance_criteria": "",
    "priority_and_urgency": ""
}

Please provide the extracted information in the above JSON format."#;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("model output is not a JSON object: {0}")]
    Malformed(String),
}

/// The six components pulled out of an initial feature description. Keys the
/// model leaves out are empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub goal: String,
    pub challenges: String,
    pub use_case: String,
    pub target_area: String,
    pub criteria: String,
    pub priority: String,
}

impl ExtractedFields {
    /// Parses model output, tolerating a surrounding markdown code fence.
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let body = strip_code_fence(raw);
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ExtractionError::Malformed(format!("{e}: {raw}")))?;
        let object = value
            .as_object()
            .ok_or_else(|| ExtractionError::Malformed(format!("expected object, got: {raw}")))?;

        Ok(Self {
            goal: field(object, "goal_and_objective"),
            challenges: field(object, "pain_points_and_challenges"),
            use_case: field(object, "use_case"),
            target_area: field(object, "target_area"),
            criteria: field(object, "acceptance_criteria"),
            priority: field(object, "priority_and_urgency"),
        })
    }

    /// Temporary slots followed by their presence flags.
    pub fn slot_events(&self) -> Vec<Event> {
        let pairs = [
            (TEMP_GOAL, TEMP_GOAL_IDENT, &self.goal),
            (TEMP_CHALLENGES, TEMP_CHALLENGES_IDENT, &self.challenges),
            (TEMP_USE_CASE, TEMP_USE_CASE_IDENT, &self.use_case),
            (TEMP_AREA, TEMP_AREA_IDENT, &self.target_area),
            (TEMP_CRITERIA, TEMP_CRITERIA_IDENT, &self.criteria),
            (TEMP_PRIORITY, TEMP_PRIORITY_IDENT, &self.priority),
        ];

        let values = pairs.iter().map(|(slot, _, value)| Event::slot(*slot, value.as_str()));
        let flags = pairs.iter().map(|(_, flag, value)| Event::slot(*flag, !value.is_empty()));
        values.chain(flags).collect()
    }
}

fn field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Clone)]
pub struct FieldExtractor {
    llm: Arc<dyn LlmClient>,
}

impl FieldExtractor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, description: &str) -> Result<ExtractedFields, ExtractionError> {
        let request = CompletionRequest::new(
            vec![ChatMessage::system(EXTRACTION_INSTRUCTION), ChatMessage::user(description)],
            SamplingConfig::form_assist(),
        );
        let raw = self.llm.complete(request).await?;
        ExtractedFields::parse(&raw)
    }
}

#[derive(Clone)]
pub struct UserStoryWriter {
    llm: Arc<dyn LlmClient>,
}

impl UserStoryWriter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// The model's answer is used verbatim as the story.
    pub async fn write(&self, tracker: &Tracker, description: &str) -> Result<String, LlmError> {
        let request = CompletionRequest::new(
            vec![ChatMessage::user(user_story_prompt(tracker, description))],
            SamplingConfig::form_assist(),
        );
        self.llm.complete(request).await
    }
}

/// Explicit answers first, then the initial description and what was
/// extracted from it. Unset slots render as `None`.
pub fn user_story_prompt(tracker: &Tracker, description: &str) -> String {
    let slot = |name: &str| {
        tracker.get_slot(name).map(|value| value.to_prompt_text()).unwrap_or_else(|| "None".to_owned())
    };

    format!(
        "Given below components, generate a user story. Return user story within 1-2 sentence and provide \
         no explanations. The fields after initial description are secondary as fields before that take precedent.\n\
         Pain points and challenges to resolve: {}\n\
         Goal and objectives: {}\n\
         Use case and functionality: {}\n\
         Target area or section: {}\n\
         Priority: {}\n\
         Criteria for acceptance or completion: {}\n\
         Description: {description}\n\
         Below are user's initial description and identified temporary components:\n\
         Initial description: {}\n\
         Pain points and challenges to resolve: {}\n\
         Goal and objectives: {}\n\
         Use case and functionality: {}\n\
         Target area or section: {}\n\
         Criteria: {}\n\
         Feature priority: {}\n",
        slot(FEATURE_CHALLENGES),
        slot(FEATURE_GOAL),
        slot(FEATURE_USE_CASE),
        slot(FEATURE_TARGET_AREA),
        slot(FEATURE_PRIORITY),
        slot(FEATURE_CRITERIA),
        slot(REQUEST_DESCRIPTION),
        slot(TEMP_CHALLENGES),
        slot(TEMP_GOAL),
        slot(TEMP_USE_CASE),
        slot(TEMP_AREA),
        slot(TEMP_CRITERIA),
        slot(TEMP_PRIORITY),
    )
}
