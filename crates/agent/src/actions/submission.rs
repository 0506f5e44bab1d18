//! Form completion: commit or acknowledge, then clear every form slot.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};

use parley_core::domain::event::Event;
use parley_core::domain::response::ResponseCollector;
use parley_core::domain::submission::SubmissionRecord;
use parley_core::domain::tracker::Tracker;
use parley_core::errors::ApplicationError;
use parley_core::forms::descriptor::FormId;
use parley_core::forms::slots::{
    BUG_DESCRIPTION, COMMENT_DESCRIPTION, CONFIRM_FORM, REQUEST_SUBJECT,
};
use parley_db::SubmissionStore;

use crate::actions::Action;

pub const SAVE_FAILED: &str = "Failed to save feature request.";

fn confirmed(tracker: &Tracker) -> bool {
    tracker.slot_text(CONFIRM_FORM) == Some("yes")
}

fn reset_form(form: FormId) -> Vec<Event> {
    form.descriptor().reset_slots.iter().map(|slot| Event::reset(*slot)).collect()
}

pub struct RequestFeature {
    store: Arc<dyn SubmissionStore>,
}

impl RequestFeature {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Action for RequestFeature {
    fn name(&self) -> &'static str {
        "action_request_feature"
    }

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        if !confirmed(tracker) {
            responses.utter_response("utter_feedback_cancelled");
            return Ok(reset_form(FormId::FeatureRequest));
        }

        let record = SubmissionRecord::from_tracker(tracker, Utc::now());
        match self.store.insert(record).await {
            Ok(()) => {
                info!(
                    event_name = "submission.feature_request.saved",
                    sender_id = %tracker.sender_id,
                    "feature request saved"
                );
                responses.utter_response("utter_feedback_received");
            }
            Err(error) => {
                error!(
                    event_name = "submission.feature_request.failed",
                    sender_id = %tracker.sender_id,
                    error = %error,
                    "failed to save feature request"
                );
                responses.utter_text(SAVE_FAILED);
            }
        }

        Ok(reset_form(FormId::FeatureRequest))
    }
}

/// Completion of the bug-report and generic-comment forms. Nothing is stored;
/// confirmed reports are written to the log.
pub struct AcknowledgeFeedback {
    form: FormId,
}

impl AcknowledgeFeedback {
    pub fn bug_report() -> Self {
        Self { form: FormId::BugReport }
    }

    pub fn generic_comment() -> Self {
        Self { form: FormId::GenericComment }
    }

    fn description_slot(&self) -> &'static str {
        match self.form {
            FormId::GenericComment => COMMENT_DESCRIPTION,
            _ => BUG_DESCRIPTION,
        }
    }
}

#[async_trait]
impl Action for AcknowledgeFeedback {
    fn name(&self) -> &'static str {
        match self.form {
            FormId::GenericComment => "action_generic_comment",
            _ => "action_bug_report",
        }
    }

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        if confirmed(tracker) {
            info!(
                event_name = "submission.feedback.received",
                form = self.form.form_name(),
                sender_id = %tracker.sender_id,
                subject = tracker.slot_text(REQUEST_SUBJECT).unwrap_or_default(),
                description = tracker.slot_text(self.description_slot()).unwrap_or_default(),
                "feedback received"
            );
            responses.utter_response("utter_feedback_received");
        } else {
            responses.utter_response("utter_feedback_cancelled");
        }

        Ok(reset_form(self.form))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parley_core::domain::event::Event;
    use parley_core::domain::response::{BotMessage, ResponseCollector};
    use parley_core::domain::tracker::Tracker;
    use parley_db::InMemorySubmissionStore;

    use super::{AcknowledgeFeedback, RequestFeature};
    use crate::actions::Action;

    fn confirmed_request() -> Tracker {
        Tracker::new("sender-7")
            .with_slot("AA_CONTINUE_FORM", "yes")
            .with_slot("bb_request_description", "Export results to Excel")
            .with_slot("feature_goal", "Share results")
            .with_slot("user_story", "As an analyst I want an Excel export.")
            .with_slot("zz_confirm_form", "yes")
    }

    #[tokio::test]
    async fn confirmed_feature_request_is_stored_once() {
        let store = Arc::new(InMemorySubmissionStore::default());
        let action = RequestFeature::new(store.clone());
        let mut responses = ResponseCollector::new();

        let events = action.run(&mut responses, &confirmed_request()).await.expect("run");

        let records = store.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sender_id, "sender-7");
        assert_eq!(records[0].user_story.as_deref(), Some("As an analyst I want an Excel export."));
        assert_eq!(responses.messages(), &[BotMessage::response("utter_feedback_received")]);
        assert!(events.contains(&Event::reset("user_story")));
        assert!(events.contains(&Event::reset("feature_form_temp_priority_ident")));
    }

    #[tokio::test]
    async fn store_failure_reports_and_still_resets() {
        let store = Arc::new(InMemorySubmissionStore::failing("disk full"));
        let action = RequestFeature::new(store);
        let mut responses = ResponseCollector::new();

        let events = action.run(&mut responses, &confirmed_request()).await.expect("run");

        assert_eq!(responses.messages(), &[BotMessage::text("Failed to save feature request.")]);
        assert!(events.contains(&Event::reset("zz_confirm_form")));
    }

    #[tokio::test]
    async fn declined_request_is_not_stored() {
        let store = Arc::new(InMemorySubmissionStore::default());
        let action = RequestFeature::new(store.clone());
        let tracker = confirmed_request().with_slot("zz_confirm_form", "no");
        let mut responses = ResponseCollector::new();

        action.run(&mut responses, &tracker).await.expect("run");

        assert!(store.records().await.is_empty());
        assert_eq!(responses.messages(), &[BotMessage::response("utter_feedback_cancelled")]);
    }

    #[tokio::test]
    async fn bug_report_acknowledges_and_clears_its_slots() {
        let tracker = Tracker::new("u")
            .with_slot("request_subject", "Login")
            .with_slot("bug_description", "500 after submit")
            .with_slot("zz_confirm_form", "yes");
        let mut responses = ResponseCollector::new();

        let events = AcknowledgeFeedback::bug_report().run(&mut responses, &tracker).await.expect("run");

        assert_eq!(responses.messages(), &[BotMessage::response("utter_feedback_received")]);
        assert_eq!(
            events,
            vec![
                Event::reset("AA_CONTINUE_FORM"),
                Event::reset("zz_confirm_form"),
                Event::reset("request_subject"),
                Event::reset("bug_description"),
            ]
        );
    }
}
