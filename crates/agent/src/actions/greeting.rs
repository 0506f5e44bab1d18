use async_trait::async_trait;

use parley_core::domain::event::Event;
use parley_core::domain::response::ResponseCollector;
use parley_core::domain::tracker::Tracker;
use parley_core::errors::ApplicationError;
use parley_core::forms::slots::MONGOLIAN_GREETING_USED;

use crate::actions::Action;

/// Greets in Mongolian once; later greetings get the non-English reply.
pub struct CheckMongolianGreeting;

#[async_trait]
impl Action for CheckMongolianGreeting {
    fn name(&self) -> &'static str {
        "action_check_mongolian_greeting"
    }

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        if tracker.is_filled(MONGOLIAN_GREETING_USED) {
            responses.utter_response("utter_non_english");
            return Ok(Vec::new());
        }

        responses.utter_response("utter_greet_mongolian");
        Ok(vec![Event::slot(MONGOLIAN_GREETING_USED, true)])
    }
}

#[cfg(test)]
mod tests {
    use parley_core::domain::event::Event;
    use parley_core::domain::response::{BotMessage, ResponseCollector};
    use parley_core::domain::tracker::Tracker;

    use super::CheckMongolianGreeting;
    use crate::actions::Action;

    #[tokio::test]
    async fn first_greeting_sets_the_flag() {
        let mut responses = ResponseCollector::new();
        let events = CheckMongolianGreeting
            .run(&mut responses, &Tracker::new("u"))
            .await
            .expect("run");

        assert_eq!(events, vec![Event::slot("mongolian_greeting_used", true)]);
        assert_eq!(responses.messages(), &[BotMessage::response("utter_greet_mongolian")]);
    }

    #[tokio::test]
    async fn repeated_greeting_answers_non_english() {
        let tracker = Tracker::new("u").with_slot("mongolian_greeting_used", true);
        let mut responses = ResponseCollector::new();
        let events = CheckMongolianGreeting.run(&mut responses, &tracker).await.expect("run");

        assert!(events.is_empty());
        assert_eq!(responses.messages(), &[BotMessage::response("utter_non_english")]);
    }
}
