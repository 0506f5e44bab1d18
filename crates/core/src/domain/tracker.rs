use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::event::Event;
use crate::domain::slot::SlotValue;

/// Immutable snapshot of a conversation as sent by the dialogue runtime.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub slots: BTreeMap<String, Option<SlotValue>>,
    #[serde(default)]
    pub latest_message: LatestMessage,
    #[serde(default)]
    pub events: Vec<TrackerEvent>,
    #[serde(default)]
    pub active_loop: ActiveLoopRef,
    #[serde(default)]
    pub latest_action_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub intent: Option<IntentRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveLoopRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Past event in the conversation history. Only slot-sets and user turns
/// matter here; everything else is kept as an opaque marker so ordering is
/// preserved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerEvent {
    Slot {
        name: String,
        #[serde(default)]
        value: Option<SlotValue>,
    },
    User {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(other)]
    Other,
}

impl Tracker {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self { sender_id: sender_id.into(), ..Self::default() }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        self.slots.insert(name.into(), Some(value.into()));
        self
    }

    pub fn with_active_loop(mut self, name: impl Into<String>) -> Self {
        self.active_loop.name = Some(name.into());
        self
    }

    pub fn with_latest_message(mut self, text: impl Into<String>, intent: Option<&str>) -> Self {
        self.latest_message = LatestMessage {
            text: Some(text.into()),
            intent: intent.map(|name| IntentRef { name: Some(name.to_owned()), confidence: None }),
        };
        self
    }

    pub fn with_events(mut self, events: Vec<TrackerEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn get_slot(&self, name: &str) -> Option<&SlotValue> {
        self.slots.get(name).and_then(Option::as_ref)
    }

    pub fn slot_text(&self, name: &str) -> Option<&str> {
        self.get_slot(name).and_then(SlotValue::as_text)
    }

    pub fn is_filled(&self, name: &str) -> bool {
        self.get_slot(name).map(SlotValue::is_truthy).unwrap_or(false)
    }

    pub fn active_form(&self) -> Option<&str> {
        self.active_loop.name.as_deref()
    }

    pub fn latest_intent(&self) -> Option<&str> {
        self.latest_message.intent.as_ref().and_then(|intent| intent.name.as_deref())
    }

    pub fn latest_text(&self) -> Option<&str> {
        self.latest_message.text.as_deref()
    }

    /// Slot values set since the last non-slot event, i.e. the values the
    /// runtime extracted this turn and wants validated. Later sets of the same
    /// slot win; order follows first appearance.
    pub fn slots_to_validate(&self) -> Vec<(String, Option<SlotValue>)> {
        let trailing = self
            .events
            .iter()
            .rev()
            .take_while(|event| matches!(event, TrackerEvent::Slot { .. }))
            .collect::<Vec<_>>();

        let mut pending: Vec<(String, Option<SlotValue>)> = Vec::new();
        for event in trailing.into_iter().rev() {
            if let TrackerEvent::Slot { name, value } = event {
                match pending.iter_mut().find(|(existing, _)| existing == name) {
                    Some(entry) => entry.1 = value.clone(),
                    None => pending.push((name.clone(), value.clone())),
                }
            }
        }
        pending
    }

    /// Value a slot held before this turn's trailing slot events, read from
    /// history. `None` when history never set it.
    pub fn value_before_turn(&self, name: &str) -> Option<SlotValue> {
        let trailing = self
            .events
            .iter()
            .rev()
            .take_while(|event| matches!(event, TrackerEvent::Slot { .. }))
            .count();

        self.events[..self.events.len() - trailing]
            .iter()
            .rev()
            .find_map(|event| match event {
                TrackerEvent::Slot { name: slot, value } if slot == name => Some(value.clone()),
                _ => None,
            })
            .flatten()
    }

    /// A copy of this snapshot with the slot-set events applied, used to look
    /// ahead at the state the runtime will be in once it applies them.
    pub fn overlay(&self, events: &[Event]) -> Tracker {
        let mut next = self.clone();
        for (name, value) in events.iter().filter_map(Event::as_slot_set) {
            next.slots.insert(name.to_owned(), value.cloned());
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::event::Event;
    use crate::domain::slot::SlotValue;
    use crate::domain::tracker::{Tracker, TrackerEvent};

    #[test]
    fn deserializes_runtime_tracker_payload() {
        let tracker: Tracker = serde_json::from_value(json!({
            "sender_id": "user-1",
            "slots": {"page": "calculator", "zz_confirm_form": null, "mongolian_greeting_used": true},
            "latest_message": {"text": "hi", "intent": {"name": "greet", "confidence": 0.93}},
            "events": [
                {"event": "action", "name": "action_listen", "timestamp": 1.0},
                {"event": "user", "text": "hi", "parse_data": {}},
                {"event": "slot", "name": "page", "value": "calculator"}
            ],
            "active_loop": {},
            "paused": false,
            "latest_action_name": "action_listen"
        }))
        .expect("tracker payload should decode");

        assert_eq!(tracker.sender_id, "user-1");
        assert_eq!(tracker.slot_text("page"), Some("calculator"));
        assert_eq!(tracker.get_slot("zz_confirm_form"), None);
        assert!(tracker.is_filled("mongolian_greeting_used"));
        assert_eq!(tracker.latest_intent(), Some("greet"));
        assert_eq!(tracker.active_form(), None);
        assert_eq!(tracker.events[0], TrackerEvent::Other);
        assert_eq!(tracker.events.len(), 3);
    }

    #[test]
    fn slots_to_validate_only_reads_trailing_slot_events() {
        let tracker = Tracker::new("u").with_events(vec![
            TrackerEvent::Slot { name: "request_subject".into(), value: Some("old".into()) },
            TrackerEvent::User { text: Some("it crashes".into()) },
            TrackerEvent::Slot { name: "bug_description".into(), value: Some("crash".into()) },
            TrackerEvent::Slot { name: "zz_confirm_form".into(), value: Some("maybe".into()) },
            TrackerEvent::Slot { name: "bug_description".into(), value: Some("crash!".into()) },
        ]);

        let pending = tracker.slots_to_validate();

        assert_eq!(
            pending,
            vec![
                ("bug_description".to_owned(), Some(SlotValue::from("crash!"))),
                ("zz_confirm_form".to_owned(), Some(SlotValue::from("maybe"))),
            ]
        );
    }

    #[test]
    fn overlay_applies_slot_sets_without_touching_original() {
        let tracker = Tracker::new("u").with_slot("request_subject", "login");
        let next = tracker.overlay(&[
            Event::reset("request_subject"),
            Event::slot("bug_description", "crash"),
            Event::listen(),
        ]);

        assert_eq!(tracker.slot_text("request_subject"), Some("login"));
        assert_eq!(next.get_slot("request_subject"), None);
        assert_eq!(next.slot_text("bug_description"), Some("crash"));
    }

    #[test]
    fn value_before_turn_skips_the_trailing_slot_run() {
        let tracker = Tracker::new("u").with_events(vec![
            TrackerEvent::Slot { name: "user_story".into(), value: Some("As a user I export".into()) },
            TrackerEvent::User { text: Some("/affirm".into()) },
            TrackerEvent::Slot { name: "user_story".into(), value: Some("/affirm".into()) },
        ]);

        assert_eq!(
            tracker.value_before_turn("user_story"),
            Some(SlotValue::from("As a user I export"))
        );
        assert_eq!(tracker.value_before_turn("feature_goal"), None);
    }
}
