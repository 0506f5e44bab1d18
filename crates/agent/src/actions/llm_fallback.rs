use async_trait::async_trait;
use tracing::{debug, warn};

use parley_core::domain::event::{Event, ACTION_LISTEN};
use parley_core::domain::response::ResponseCollector;
use parley_core::domain::tracker::Tracker;
use parley_core::errors::ApplicationError;

use crate::actions::Action;
use crate::fallback::{Classification, FallbackClassifier};

const ASKING: &str = "Hold on while I'm asking from a friend...";
const UNIDENTIFIED: &str = "Sorry, I couldn't identify the intent. Try again later.";
const NO_RESPONSE: &str = "Sorry, I couldn't get a response. Try again later.";

/// Re-labels a low-confidence utterance with the model and replays it as a
/// fresh user turn, or reverts the turn when no label can be trusted.
pub struct FallbackToLlm {
    classifier: FallbackClassifier,
}

impl FallbackToLlm {
    pub fn new(classifier: FallbackClassifier) -> Self {
        Self { classifier }
    }
}

fn revert_turn() -> Vec<Event> {
    vec![Event::UserUtteranceReverted, Event::followup(ACTION_LISTEN)]
}

#[async_trait]
impl Action for FallbackToLlm {
    fn name(&self) -> &'static str {
        "action_fallback_to_llm"
    }

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        responses.utter_text(ASKING);

        let Some(text) = tracker.latest_text().filter(|text| !text.trim().is_empty()) else {
            responses.utter_text(UNIDENTIFIED);
            return Ok(revert_turn());
        };

        match self.classifier.classify(text).await {
            Classification::Intent(label) => {
                debug!(event_name = "fallback.classified", sender_id = %tracker.sender_id, %label);
                Ok(vec![Event::listen(), Event::utterance(label)])
            }
            Classification::Unrecognized(label) => {
                debug!(event_name = "fallback.unrecognized", sender_id = %tracker.sender_id, %label);
                responses.utter_text(UNIDENTIFIED);
                Ok(revert_turn())
            }
            Classification::Failed(error) => {
                warn!(
                    event_name = "fallback.llm_failed",
                    sender_id = %tracker.sender_id,
                    error = %error,
                    "fallback classification failed"
                );
                responses.utter_text(NO_RESPONSE);
                Ok(revert_turn())
            }
        }
    }
}
