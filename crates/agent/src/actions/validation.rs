//! Per-form slot validation. Each form gets a table from slot name to
//! validator; slots without an entry are accepted unchanged. After
//! validation the form engine decides which slot to request next.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use parley_core::domain::event::Event;
use parley_core::domain::response::ResponseCollector;
use parley_core::domain::slot::SlotValue;
use parley_core::domain::tracker::Tracker;
use parley_core::errors::ApplicationError;
use parley_core::forms::descriptor::FormId;
use parley_core::forms::engine::{
    check_user_story, description_too_short, validate_confirmation, FormEngine, UserStoryCheck,
};
use parley_core::forms::slots::{CONFIRM_FORM, FEATURE_DESCRIPTION, REQUEST_DESCRIPTION, USER_STORY};

use crate::actions::Action;
use crate::extraction::{FieldExtractor, UserStoryWriter};

pub const PROCESSING_ERROR: &str = "There was an error processing your request. Please try again.";
pub const DESCRIPTION_TOO_SHORT: &str = "Description must be at least 2 character.";
pub const USER_STORY_TOO_SHORT: &str = "User story must be at least 4 characters.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotValidator {
    /// Splits the initial description into the temporary component slots.
    InitialDescription,
    /// Length check, then user-story synthesis.
    FinalDescription,
    UserStory,
    Confirmation,
}

fn validators_for(form: FormId) -> HashMap<&'static str, SlotValidator> {
    let mut table = HashMap::from([(CONFIRM_FORM, SlotValidator::Confirmation)]);
    if form == FormId::FeatureRequest {
        table.insert(REQUEST_DESCRIPTION, SlotValidator::InitialDescription);
        table.insert(FEATURE_DESCRIPTION, SlotValidator::FinalDescription);
        table.insert(USER_STORY, SlotValidator::UserStory);
    }
    table
}

pub struct FormValidationAction {
    engine: FormEngine,
    validators: HashMap<&'static str, SlotValidator>,
    extractor: FieldExtractor,
    story_writer: UserStoryWriter,
}

impl FormValidationAction {
    pub fn new(form: FormId, extractor: FieldExtractor, story_writer: UserStoryWriter) -> Self {
        Self { engine: FormEngine::new(form), validators: validators_for(form), extractor, story_writer }
    }

    async fn validate(
        &self,
        validator: SlotValidator,
        slot: String,
        value: Option<SlotValue>,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Vec<Event> {
        let Some(text) = value.as_ref().and_then(SlotValue::as_text) else {
            let value = if validator == SlotValidator::Confirmation { None } else { value };
            return vec![Event::slot_value(slot, value)];
        };

        match validator {
            SlotValidator::Confirmation => {
                vec![Event::slot_value(slot, validate_confirmation(value.as_ref()))]
            }
            SlotValidator::InitialDescription => match self.extractor.extract(text).await {
                Ok(fields) => {
                    let mut events = vec![Event::slot(REQUEST_DESCRIPTION, text)];
                    events.extend(fields.slot_events());
                    events
                }
                Err(error) => {
                    warn!(
                        event_name = "form.extraction.failed",
                        sender_id = %tracker.sender_id,
                        error = %error,
                        "feature field extraction failed"
                    );
                    responses.utter_text(PROCESSING_ERROR);
                    vec![Event::reset(REQUEST_DESCRIPTION)]
                }
            },
            SlotValidator::FinalDescription => {
                if description_too_short(text) {
                    responses.utter_text(DESCRIPTION_TOO_SHORT);
                    return vec![Event::reset(FEATURE_DESCRIPTION)];
                }
                match self.story_writer.write(tracker, text).await {
                    Ok(story) => {
                        vec![Event::slot(FEATURE_DESCRIPTION, text), Event::slot(USER_STORY, story)]
                    }
                    Err(error) => {
                        warn!(
                            event_name = "form.user_story.failed",
                            sender_id = %tracker.sender_id,
                            error = %error,
                            "user story synthesis failed"
                        );
                        responses.utter_text(PROCESSING_ERROR);
                        vec![Event::reset(FEATURE_DESCRIPTION)]
                    }
                }
            }
            SlotValidator::UserStory => match check_user_story(text) {
                UserStoryCheck::Accept => vec![Event::slot(USER_STORY, text)],
                UserStoryCheck::KeepCurrent => {
                    vec![Event::slot_value(USER_STORY, tracker.value_before_turn(USER_STORY))]
                }
                UserStoryCheck::TooShort => {
                    responses.utter_text(USER_STORY_TOO_SHORT);
                    vec![Event::slot_value(USER_STORY, tracker.value_before_turn(USER_STORY))]
                }
            },
        }
    }
}

#[async_trait]
impl Action for FormValidationAction {
    fn name(&self) -> &'static str {
        self.engine.form().validation_action()
    }

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        let form = self.engine.form();
        if let Some(active) = tracker.active_form() {
            let active_form = active.parse::<FormId>()?;
            if active_form != form {
                return Err(ApplicationError::ActionRejected {
                    action: self.name().to_owned(),
                    message: format!("active form is `{active}`, not `{}`", form.form_name()),
                });
            }
        }

        let mut events = Vec::new();
        for (slot, value) in tracker.slots_to_validate() {
            match self.validators.get(slot.as_str()).copied() {
                Some(validator) => {
                    events.extend(self.validate(validator, slot, value, responses, tracker).await)
                }
                None => events.push(Event::slot_value(slot, value)),
            }
        }

        let projected = tracker.overlay(&events);
        events.extend(self.engine.next_step(&projected).events());
        Ok(events)
    }
}
