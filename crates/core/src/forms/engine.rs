use crate::domain::event::Event;
use crate::domain::slot::SlotValue;
use crate::domain::tracker::Tracker;
use crate::forms::descriptor::{FormDescriptor, FormId};
use crate::forms::slots::REQUESTED_SLOT;

pub const MIN_DESCRIPTION_CHARS: usize = 2;
pub const MIN_USER_STORY_CHARS: usize = 4;

const CONFIRMATION_VALUES: [&str; 2] = ["yes", "no"];
const CONTROL_TOKENS: [&str; 2] = ["/affirm", "/deny"];

/// What the form needs next, decided after slot validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormStep {
    /// The continue gate is unanswered and must be asked first.
    AskGate(&'static str),
    /// The user declined the continue gate; the loop ends here.
    Cancel(&'static str),
    Request(&'static str),
    /// Every required slot is filled; the runtime ends the loop on its own.
    Complete,
}

impl FormStep {
    pub fn events(&self) -> Vec<Event> {
        match self {
            Self::AskGate(gate) => vec![Event::slot(REQUESTED_SLOT, *gate)],
            Self::Cancel(gate) => {
                vec![Event::reset(*gate), Event::reset(REQUESTED_SLOT), Event::deactivate_loop()]
            }
            Self::Request(slot) => vec![Event::slot(REQUESTED_SLOT, *slot)],
            Self::Complete => Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FormEngine {
    descriptor: &'static FormDescriptor,
}

impl FormEngine {
    pub fn new(form: FormId) -> Self {
        Self { descriptor: form.descriptor() }
    }

    pub fn form(&self) -> FormId {
        self.descriptor.id
    }

    pub fn descriptor(&self) -> &'static FormDescriptor {
        self.descriptor
    }

    /// Gate first, then the first unfilled required slot in declared order.
    pub fn next_step(&self, tracker: &Tracker) -> FormStep {
        if let Some(gate) = self.descriptor.gate {
            match tracker.get_slot(gate) {
                None => return FormStep::AskGate(gate),
                Some(value) if gate_declined(value) => return FormStep::Cancel(gate),
                Some(_) => {}
            }
        }

        self.descriptor
            .required_slots
            .iter()
            .copied()
            .find(|slot| !tracker.is_filled(slot))
            .map(FormStep::Request)
            .unwrap_or(FormStep::Complete)
    }
}

fn gate_declined(value: &SlotValue) -> bool {
    match value {
        SlotValue::Text(text) => text == "no",
        SlotValue::Bool(flag) => !flag,
        SlotValue::Other(_) => false,
    }
}

/// Only the literal answers `yes` and `no` survive; anything else clears the
/// slot so it is asked again.
pub fn validate_confirmation(value: Option<&SlotValue>) -> Option<SlotValue> {
    value
        .and_then(SlotValue::as_text)
        .filter(|text| CONFIRMATION_VALUES.contains(text))
        .map(SlotValue::from)
}

pub fn description_too_short(candidate: &str) -> bool {
    candidate.chars().count() < MIN_DESCRIPTION_CHARS
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserStoryCheck {
    /// A quick-reply token arrived instead of text; keep the current story.
    KeepCurrent,
    TooShort,
    Accept,
}

pub fn check_user_story(candidate: &str) -> UserStoryCheck {
    if CONTROL_TOKENS.contains(&candidate) {
        UserStoryCheck::KeepCurrent
    } else if candidate.chars().count() < MIN_USER_STORY_CHARS {
        UserStoryCheck::TooShort
    } else {
        UserStoryCheck::Accept
    }
}
