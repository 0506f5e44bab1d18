use crate::domain::event::Event;
use crate::domain::tracker::{Tracker, TrackerEvent};
use crate::forms::slots::{
    BUG_DESCRIPTION, COMMENT_DESCRIPTION, CONFIRM_FORM, CONTINUE_FORM, FEATURE_DESCRIPTION,
};

pub const SESSION_START_ACTION: &str = "action_session_start";

/// Slots that survive a session restart.
pub const CARRY_OVER_SLOTS: [&str; 5] =
    [CONTINUE_FORM, FEATURE_DESCRIPTION, BUG_DESCRIPTION, COMMENT_DESCRIPTION, CONFIRM_FORM];

/// `session_started`, then every past set of a carried-over slot in history
/// order, then `action_listen`.
pub fn session_start_events(tracker: &Tracker) -> Vec<Event> {
    let carried = tracker.events.iter().filter_map(|event| match event {
        TrackerEvent::Slot { name, value } if CARRY_OVER_SLOTS.contains(&name.as_str()) => {
            Some(Event::slot_value(name.clone(), value.clone()))
        }
        _ => None,
    });

    std::iter::once(Event::SessionStarted)
        .chain(carried)
        .chain(std::iter::once(Event::listen()))
        .collect()
}

pub fn restart_events() -> Vec<Event> {
    vec![Event::Restarted, Event::followup(SESSION_START_ACTION)]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::event::Event;
    use crate::domain::tracker::{Tracker, TrackerEvent};
    use crate::session::{restart_events, session_start_events};

    fn slot_event(name: &str, value: serde_json::Value) -> TrackerEvent {
        serde_json::from_value(json!({"event": "slot", "name": name, "value": value}))
            .expect("slot event")
    }

    #[test]
    fn reseeds_only_allow_listed_slots_in_history_order() {
        let tracker = Tracker::new("u").with_events(vec![
            slot_event("page", json!("calculator")),
            slot_event("feature_description", json!("Export reports")),
            TrackerEvent::User { text: Some("hello".to_owned()) },
            slot_event("AA_CONTINUE_FORM", json!("yes")),
            slot_event("user_story", json!("As a user ...")),
            slot_event("zz_confirm_form", json!(null)),
            slot_event("feature_description", json!("Export reports as CSV")),
        ]);

        let events = session_start_events(&tracker);

        assert_eq!(
            events,
            vec![
                Event::SessionStarted,
                Event::slot("feature_description", "Export reports"),
                Event::slot("AA_CONTINUE_FORM", "yes"),
                Event::reset("zz_confirm_form"),
                Event::slot("feature_description", "Export reports as CSV"),
                Event::listen(),
            ]
        );
    }

    #[test]
    fn empty_history_still_frames_the_session() {
        let events = session_start_events(&Tracker::new("u"));
        assert_eq!(events, vec![Event::SessionStarted, Event::listen()]);
    }

    #[test]
    fn restart_schedules_a_fresh_session() {
        assert_eq!(
            restart_events(),
            vec![Event::Restarted, Event::followup("action_session_start")]
        );
    }
}
