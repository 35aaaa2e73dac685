use bon::Builder;
use serde::Serialize;

use crate::{config::Config, message::Message};

/// Chat-completion payload.
///
/// Serialized as `{"models": [...], "messages": [...], "stream": bool}`.
#[derive(Debug, Clone, Serialize, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ChatRequest {
    #[builder(field)]
    pub models: Vec<String>,
    #[builder(field)]
    pub messages: Vec<Message>,
    #[builder(default)]
    pub stream: bool,
}

impl<S: chat_request_builder::State> ChatRequestBuilder<S> {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.models.push(model.into());
        self
    }

    pub fn message(mut self, message: impl Into<Message>) -> Self {
        self.messages.push(message.into());
        self
    }
}

impl ChatRequest {
    /// The fixed system + user request for one run.
    pub fn from_config(config: &Config) -> Self {
        Self::builder()
            .model(config.model_id())
            .message(Message::system(config.system_prompt.as_str()))
            .message(Message::user(config.user_prompt.as_str()))
            .stream(config.stream)
            .build()
    }
}
