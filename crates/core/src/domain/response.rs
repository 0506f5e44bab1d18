use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Name of a response template the runtime renders, e.g. `utter_feedback_received`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub title: String,
    pub payload: String,
}

impl Button {
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { title: title.into(), payload: payload.into() }
    }

    pub fn affirm_deny() -> Vec<Button> {
        vec![Self::new("Yes", "/affirm"), Self::new("No", "/deny")]
    }
}

impl BotMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Self::default() }
    }

    pub fn response(name: impl Into<String>) -> Self {
        Self { response: Some(name.into()), ..Self::default() }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Collects the bot messages an action wants sent during its turn.
#[derive(Clone, Debug, Default)]
pub struct ResponseCollector {
    messages: Vec<BotMessage>,
}

impl ResponseCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utter(&mut self, message: BotMessage) {
        self.messages.push(message);
    }

    pub fn utter_text(&mut self, text: impl Into<String>) {
        self.utter(BotMessage::text(text));
    }

    pub fn utter_response(&mut self, name: impl Into<String>) {
        self.utter(BotMessage::response(name));
    }

    pub fn messages(&self) -> &[BotMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<BotMessage> {
        self.messages
    }
}
