use crate::domain::event::Event;
use crate::domain::response::{BotMessage, Button};
use crate::domain::tracker::Tracker;
use crate::forms::descriptor::FormId;
use crate::forms::slots::{NEXT_FORM_NAME, PREVIOUS_FORM_NAME};

/// Interrupt-and-resume steps layered over the active form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchTransition {
    Ask,
    Deny,
    Affirm,
    SwitchBack,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwitchOutcome {
    pub events: Vec<Event>,
    pub reply: Option<BotMessage>,
    /// Set when a form or intent could not be resolved; callers log it and
    /// show nothing to the user.
    pub unresolved: Option<String>,
}

impl SwitchOutcome {
    fn replied(reply: BotMessage, events: Vec<Event>) -> Self {
        Self { events, reply: Some(reply), unresolved: None }
    }

    fn unresolved(detail: String, events: Vec<Event>) -> Self {
        Self { events, reply: None, unresolved: Some(detail) }
    }
}

impl SwitchTransition {
    pub fn apply(self, tracker: &Tracker) -> SwitchOutcome {
        match self {
            Self::Ask => ask(tracker),
            Self::Deny => deny(tracker),
            Self::Affirm => affirm(tracker),
            Self::SwitchBack => switch_back(tracker),
        }
    }
}

fn ask(tracker: &Tracker) -> SwitchOutcome {
    let active = tracker.active_form();
    let intent = tracker.latest_intent();
    let target = intent.and_then(FormId::from_intent);

    // A pending switch-back already owns the interruption, and switching to
    // the active form is not a switch.
    let resuming = tracker.get_slot(PREVIOUS_FORM_NAME).is_some();

    match (active.and_then(FormId::from_form_name), target) {
        (Some(active_form), Some(next_form)) if active_form != next_form && !resuming => {
            SwitchOutcome::replied(
                BotMessage::text(format!(
                    "We haven't completed the {} yet. Are you sure you want to switch to {}?",
                    active_form.title(),
                    next_form.title()
                ))
                .with_buttons(Button::affirm_deny()),
                vec![Event::slot(NEXT_FORM_NAME, next_form.form_name())],
            )
        }
        _ => SwitchOutcome::unresolved(
            format!(
                "cannot create switch prompt for active_form_name={active:?} & next_form_name={:?} (previous_form_name set: {resuming})",
                target.map(FormId::form_name).or(intent)
            ),
            vec![Event::reset(NEXT_FORM_NAME)],
        ),
    }
}

fn deny(tracker: &Tracker) -> SwitchOutcome {
    let active = tracker.active_form();
    let events = vec![Event::reset(NEXT_FORM_NAME)];

    match active.and_then(FormId::from_form_name) {
        Some(active_form) => SwitchOutcome::replied(
            BotMessage::text(format!(
                "Ok, let's continue with the {}.",
                active_form.description()
            )),
            events,
        ),
        None => SwitchOutcome::unresolved(
            format!("cannot create continue text for active_form_name={active:?}"),
            events,
        ),
    }
}

fn affirm(tracker: &Tracker) -> SwitchOutcome {
    let active = tracker.active_form();
    let next = tracker.slot_text(NEXT_FORM_NAME);
    let events = vec![
        Event::slot_value(PREVIOUS_FORM_NAME, active.map(Into::into)),
        Event::reset(NEXT_FORM_NAME),
    ];

    match (active.and_then(FormId::from_form_name), next.and_then(FormId::from_form_name)) {
        (Some(active_form), Some(next_form)) => SwitchOutcome::replied(
            BotMessage::text(format!(
                "Great. Let's switch from the {} to {}. Once completed, you will have the option to switch back.",
                active_form.description(),
                next_form.description()
            )),
            events,
        ),
        _ => SwitchOutcome::unresolved(
            format!(
                "cannot create switch text for active_form_name={active:?} & next_form_name={next:?}"
            ),
            events,
        ),
    }
}

fn switch_back(tracker: &Tracker) -> SwitchOutcome {
    let previous = tracker.slot_text(PREVIOUS_FORM_NAME);
    let events = vec![Event::reset(PREVIOUS_FORM_NAME)];

    match previous.and_then(FormId::from_form_name) {
        Some(previous_form) => SwitchOutcome::replied(
            BotMessage::text(format!(
                "Would you like to go back to the {} now?",
                previous_form.description()
            ))
            .with_buttons(Button::affirm_deny()),
            events,
        ),
        None => SwitchOutcome::unresolved(
            format!("cannot create switch-back text for previous_form_name={previous:?}"),
            events,
        ),
    }
}
