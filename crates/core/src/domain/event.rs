use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::slot::SlotValue;

/// Conversation mutation proposed by an action. The runtime applies these
/// after the action returns; actions never mutate the tracker themselves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    #[serde(rename = "slot")]
    SlotSet { name: String, value: Option<SlotValue> },
    #[serde(rename = "active_loop")]
    ActiveLoop { name: Option<String> },
    #[serde(rename = "followup")]
    FollowupAction { name: String },
    #[serde(rename = "session_started")]
    SessionStarted,
    #[serde(rename = "action")]
    ActionExecuted { name: String },
    #[serde(rename = "restart")]
    Restarted,
    #[serde(rename = "rewind")]
    UserUtteranceReverted,
    #[serde(rename = "user")]
    UserUttered { text: String, parse_data: ParseData },
}

pub const ACTION_LISTEN: &str = "action_listen";

impl Event {
    pub fn slot(name: impl Into<String>, value: impl Into<SlotValue>) -> Self {
        Self::SlotSet { name: name.into(), value: Some(value.into()) }
    }

    pub fn slot_value(name: impl Into<String>, value: Option<SlotValue>) -> Self {
        Self::SlotSet { name: name.into(), value }
    }

    pub fn reset(name: impl Into<String>) -> Self {
        Self::SlotSet { name: name.into(), value: None }
    }

    pub fn listen() -> Self {
        Self::ActionExecuted { name: ACTION_LISTEN.to_owned() }
    }

    pub fn followup(name: impl Into<String>) -> Self {
        Self::FollowupAction { name: name.into() }
    }

    pub fn deactivate_loop() -> Self {
        Self::ActiveLoop { name: None }
    }

    pub fn utterance(intent: impl Into<String>) -> Self {
        let intent = intent.into();
        Self::UserUttered {
            text: intent.clone(),
            parse_data: ParseData {
                intent: ParsedIntent { name: intent, confidence: 1.0 },
                entities: Vec::new(),
            },
        }
    }

    /// Slot name and value when this is a slot-set event.
    pub fn as_slot_set(&self) -> Option<(&str, Option<&SlotValue>)> {
        match self {
            Self::SlotSet { name, value } => Some((name, value.as_ref())),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParseData {
    pub intent: ParsedIntent,
    #[serde(default)]
    pub entities: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedIntent {
    pub name: String,
    pub confidence: f64,
}
