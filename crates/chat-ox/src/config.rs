use bon::Builder;
use std::{fmt, path::PathBuf};

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert programmer in .NET and C#.";

pub const DEFAULT_USER_PROMPT: &str =
    "If you built the world's tallest skyscraper, what would you name it?";

/// Routing prefix some configurations carry that the API does not accept.
const OPENROUTER_PREFIX: &str = "openrouter/";

/// Everything one run needs, resolved once at startup.
#[derive(Clone, Builder)]
pub struct Config {
    /// Base URL without the `/chat/completions` suffix.
    #[builder(into, default = DEFAULT_ENDPOINT.to_owned())]
    pub endpoint: String,

    #[builder(into, default)]
    pub api_key: String,

    /// Model identifier as configured; see [`Config::model_id`].
    #[builder(into, default)]
    pub model: String,

    #[builder(default = true)]
    pub stream: bool,

    #[builder(into, default = DEFAULT_SYSTEM_PROMPT.to_owned())]
    pub system_prompt: String,

    #[builder(into, default = DEFAULT_USER_PROMPT.to_owned())]
    pub user_prompt: String,

    /// Replay this file instead of calling the endpoint.
    #[builder(into)]
    pub fixture: Option<PathBuf>,
}

impl Config {
    /// Model identifier sent to the API, without an `openrouter/` prefix.
    pub fn model_id(&self) -> &str {
        match self.model.get(..OPENROUTER_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(OPENROUTER_PREFIX) => {
                &self.model[OPENROUTER_PREFIX.len()..]
            }
            _ => &self.model,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("stream", &self.stream)
            .field("fixture", &self.fixture)
            .finish_non_exhaustive()
    }
}
