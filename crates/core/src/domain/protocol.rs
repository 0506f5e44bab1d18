use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::event::Event;
use crate::domain::response::BotMessage;
use crate::domain::tracker::Tracker;

/// Body of a custom-action call from the dialogue runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub next_action: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    pub tracker: Tracker,
    /// Static domain definition; accepted for protocol compatibility, no
    /// action reads it.
    #[serde(default)]
    pub domain: Value,
    #[serde(default)]
    pub version: Option<String>,
}

impl ActionRequest {
    pub fn sender_id(&self) -> &str {
        match self.sender_id.as_deref() {
            Some(sender_id) if !sender_id.is_empty() => sender_id,
            _ => &self.tracker.sender_id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub events: Vec<Event>,
    pub responses: Vec<BotMessage>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ActionRequest;

    #[test]
    fn sender_id_falls_back_to_tracker() {
        let request: ActionRequest = serde_json::from_value(json!({
            "next_action": "action_restart",
            "tracker": {"sender_id": "tracker-sender"},
            "domain": {},
            "version": "3.6.0"
        }))
        .expect("request should decode");

        assert_eq!(request.sender_id(), "tracker-sender");
        assert_eq!(request.version.as_deref(), Some("3.6.0"));
    }
}
