use async_trait::async_trait;
use tracing::debug;

use parley_core::domain::event::Event;
use parley_core::domain::response::ResponseCollector;
use parley_core::domain::tracker::Tracker;
use parley_core::errors::ApplicationError;
use parley_core::forms::switch::SwitchTransition;

use crate::actions::Action;

/// Runs one form-switch transition. Unresolvable forms are logged at debug
/// level and produce no reply.
pub struct SwitchFormsAction {
    transition: SwitchTransition,
}

impl SwitchFormsAction {
    pub fn new(transition: SwitchTransition) -> Self {
        Self { transition }
    }

    pub fn all() -> [Self; 4] {
        [
            Self::new(SwitchTransition::Ask),
            Self::new(SwitchTransition::Deny),
            Self::new(SwitchTransition::Affirm),
            Self::new(SwitchTransition::SwitchBack),
        ]
    }
}

#[async_trait]
impl Action for SwitchFormsAction {
    fn name(&self) -> &'static str {
        match self.transition {
            SwitchTransition::Ask => "action_switch_forms_ask",
            SwitchTransition::Deny => "action_switch_forms_deny",
            SwitchTransition::Affirm => "action_switch_forms_affirm",
            SwitchTransition::SwitchBack => "action_switch_back_ask",
        }
    }

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        let outcome = self.transition.apply(tracker);

        if let Some(reply) = outcome.reply {
            responses.utter(reply);
        }
        if let Some(detail) = outcome.unresolved {
            debug!(event_name = "form.switch.unresolved", action_name = self.name(), %detail);
        }

        Ok(outcome.events)
    }
}
