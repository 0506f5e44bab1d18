//! Page links and feature explanations from the static content files.

use async_trait::async_trait;
use tracing::warn;

use parley_core::content::{
    explanation_reply, page_reply, ContentError, ContentLookup, EXPLANATION_NOT_FOUND,
    PAGE_NOT_FOUND,
};
use parley_core::domain::event::Event;
use parley_core::domain::response::ResponseCollector;
use parley_core::domain::tracker::Tracker;
use parley_core::errors::ApplicationError;
use parley_core::forms::slots::{FEATURE_TO_EXPLAIN, PAGE};

use crate::actions::Action;

pub struct FindPage {
    content: ContentLookup,
}

impl FindPage {
    pub fn new(content: ContentLookup) -> Self {
        Self { content }
    }
}

#[async_trait]
impl Action for FindPage {
    fn name(&self) -> &'static str {
        "action_find_page"
    }

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        let found = match tracker.slot_text(PAGE) {
            Some(keyword) => self
                .content
                .find_page(keyword)
                .await
                .unwrap_or_else(|error| log_unreadable(self.name(), error)),
            None => None,
        };

        responses.utter_text(match found {
            Some(page) => page_reply(&page.url),
            None => PAGE_NOT_FOUND.to_owned(),
        });
        Ok(Vec::new())
    }
}

pub struct ExplainFeature {
    content: ContentLookup,
}

impl ExplainFeature {
    pub fn new(content: ContentLookup) -> Self {
        Self { content }
    }
}

#[async_trait]
impl Action for ExplainFeature {
    fn name(&self) -> &'static str {
        "action_explain_feature"
    }

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        let found = match tracker.slot_text(FEATURE_TO_EXPLAIN) {
            Some(keyword) => self
                .content
                .find_explanation(keyword)
                .await
                .unwrap_or_else(|error| log_unreadable(self.name(), error)),
            None => None,
        };

        responses.utter_text(match found {
            Some(help) => explanation_reply(&help.explanation),
            None => EXPLANATION_NOT_FOUND.to_owned(),
        });
        Ok(Vec::new())
    }
}

fn log_unreadable<T>(action_name: &str, error: ContentError) -> Option<T> {
    warn!(event_name = "content.lookup.unreadable", action_name, error = %error, "content file unavailable");
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use parley_core::content::ContentLookup;
    use parley_core::domain::response::ResponseCollector;
    use parley_core::domain::tracker::Tracker;

    use super::{ExplainFeature, FindPage};
    use crate::actions::Action;

    fn content(dir: &TempDir) -> ContentLookup {
        let pages = dir.path().join("pages_info.json");
        let help = dir.path().join("help_descriptions.json");
        fs::write(&pages, r#"[{"keyword": "Calculator", "url": "https://example.test/calculator"}]"#)
            .expect("pages");
        fs::write(&help, r#"[{"keyword": "reports", "explanation": "Reports summarise usage."}]"#)
            .expect("help");
        ContentLookup::new(pages, help)
    }

    async fn reply_of(action: &dyn Action, tracker: &Tracker) -> String {
        let mut responses = ResponseCollector::new();
        let events = action.run(&mut responses, tracker).await.expect("run");
        assert!(events.is_empty());
        assert_eq!(responses.messages().len(), 1);
        responses.into_messages().remove(0).text.expect("text reply")
    }

    #[tokio::test]
    async fn page_hit_links_the_url() {
        let dir = TempDir::new().expect("tempdir");
        let action = FindPage::new(content(&dir));
        let tracker = Tracker::new("u").with_slot("page", "calculator");

        let reply = reply_of(&action, &tracker).await;
        assert_eq!(
            reply,
            "Here is the information you requested: <a target='_new' href='https://example.test/calculator' >https://example.test/calculator</a>"
        );
    }

    #[tokio::test]
    async fn page_miss_and_missing_slot_get_fixed_reply() {
        let dir = TempDir::new().expect("tempdir");
        let action = FindPage::new(content(&dir));
        let expected = "Sorry, I couldn't find the information you were looking for.";

        let miss = Tracker::new("u").with_slot("page", "billing");
        assert_eq!(reply_of(&action, &miss).await, expected);
        assert_eq!(reply_of(&action, &Tracker::new("u")).await, expected);
    }

    #[tokio::test]
    async fn unreadable_file_falls_back_to_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let lookup = ContentLookup::new(dir.path().join("absent.json"), dir.path().join("absent.json"));
        let tracker = Tracker::new("u").with_slot("feature_to_explain", "reports");

        assert_eq!(
            reply_of(&ExplainFeature::new(lookup), &tracker).await,
            "Sorry, I couldn't find the explanation you were looking for."
        );
    }

    #[tokio::test]
    async fn explanation_hit_is_case_insensitive() {
        let dir = TempDir::new().expect("tempdir");
        let tracker = Tracker::new("u").with_slot("feature_to_explain", "REPORTS");

        assert_eq!(
            reply_of(&ExplainFeature::new(content(&dir)), &tracker).await,
            "Here is the explanation: Reports summarise usage."
        );
    }
}
