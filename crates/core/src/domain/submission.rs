use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::tracker::Tracker;
use crate::forms::slots::{CHAT_FIELDS, INITIAL_FIELDS, USER_STORY};

/// Row written once per confirmed feature request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub sender_id: String,
    pub user_story: Option<String>,
    /// JSON object of the initial description and the fields extracted from it.
    pub initial_description: String,
    /// JSON object of the fields as refined during the chat.
    pub chat_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn from_tracker(tracker: &Tracker, now: DateTime<Utc>) -> Self {
        Self {
            sender_id: tracker.sender_id.clone(),
            user_story: tracker.slot_text(USER_STORY).map(str::to_owned),
            initial_description: snapshot_json(tracker, &INITIAL_FIELDS),
            chat_description: snapshot_json(tracker, &CHAT_FIELDS),
            created_at: now,
            updated_at: now,
        }
    }
}

fn snapshot_json(tracker: &Tracker, fields: &[&str]) -> String {
    let object = fields
        .iter()
        .map(|field| {
            let value = tracker
                .get_slot(field)
                .map(|value| serde_json::to_value(value).unwrap_or(Value::Null))
                .unwrap_or(Value::Null);
            ((*field).to_owned(), value)
        })
        .collect::<Map<String, Value>>();
    Value::Object(object).to_string()
}
