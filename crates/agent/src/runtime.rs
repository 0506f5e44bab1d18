use std::sync::Arc;

use tracing::{info, warn};

use parley_core::content::ContentLookup;
use parley_core::domain::protocol::{ActionRequest, ActionResponse};
use parley_core::domain::response::ResponseCollector;
use parley_core::errors::ApplicationError;
use parley_core::forms::descriptor::FormId;
use parley_db::SubmissionStore;

use crate::actions::{
    AcknowledgeFeedback, ActionRegistry, CheckMongolianGreeting, ExplainFeature, FallbackToLlm,
    FindPage, FormValidationAction, RequestFeature, Restart, SessionStart, SwitchFormsAction,
};
use crate::extraction::{FieldExtractor, UserStoryWriter};
use crate::fallback::FallbackClassifier;
use crate::llm::LlmClient;

/// Collaborators handed to the actions once at start-up.
#[derive(Clone)]
pub struct ActionDependencies {
    pub llm: Arc<dyn LlmClient>,
    pub store: Arc<dyn SubmissionStore>,
    pub content: ContentLookup,
}

pub struct ActionRuntime {
    registry: ActionRegistry,
}

impl ActionRuntime {
    pub fn new(deps: ActionDependencies) -> Self {
        let ActionDependencies { llm, store, content } = deps;
        let extractor = FieldExtractor::new(llm.clone());
        let story_writer = UserStoryWriter::new(llm.clone());

        let mut registry = ActionRegistry::default();
        registry.register(CheckMongolianGreeting);
        registry.register(FindPage::new(content.clone()));
        registry.register(ExplainFeature::new(content));
        registry.register(RequestFeature::new(store));
        registry.register(AcknowledgeFeedback::bug_report());
        registry.register(AcknowledgeFeedback::generic_comment());
        registry.register(SessionStart);
        registry.register(Restart);
        for action in SwitchFormsAction::all() {
            registry.register(action);
        }
        for form in FormId::ALL {
            registry.register(FormValidationAction::new(
                form,
                extractor.clone(),
                story_writer.clone(),
            ));
        }
        registry.register(FallbackToLlm::new(FallbackClassifier::new(llm)));

        Self { registry }
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    /// Runs the action named by `next_action` against the request's tracker.
    pub async fn handle(
        &self,
        request: ActionRequest,
        correlation_id: &str,
    ) -> Result<ActionResponse, ApplicationError> {
        let sender_id = request.sender_id().to_owned();
        let ActionRequest { next_action: action_name, mut tracker, .. } = request;

        let Some(action) = self.registry.get(&action_name) else {
            warn!(
                event_name = "action.unknown",
                correlation_id,
                sender_id = %sender_id,
                action_name = %action_name,
                "no registered action for request"
            );
            return Err(ApplicationError::UnknownAction(action_name));
        };

        if tracker.sender_id.is_empty() {
            tracker.sender_id = sender_id.clone();
        }

        info!(
            event_name = "action.started",
            correlation_id,
            sender_id = %sender_id,
            action_name = %action_name,
            "running action"
        );

        let mut responses = ResponseCollector::new();
        match action.run(&mut responses, &tracker).await {
            Ok(events) => {
                info!(
                    event_name = "action.completed",
                    correlation_id,
                    sender_id = %sender_id,
                    action_name = %action_name,
                    events = events.len(),
                    responses = responses.messages().len(),
                    "action completed"
                );
                Ok(ActionResponse { events, responses: responses.into_messages() })
            }
            Err(error) => {
                warn!(
                    event_name = "action.rejected",
                    correlation_id,
                    sender_id = %sender_id,
                    action_name = %action_name,
                    error = %error,
                    "action rejected request"
                );
                Err(error)
            }
        }
    }
}
