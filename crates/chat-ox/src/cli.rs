use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, DEFAULT_ENDPOINT, DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT};

#[derive(Debug, Parser)]
#[command(name = "chat-ox")]
#[command(version, about = "Send one chat-completion request and print the reply")]
pub struct Cli {
    /// Base URL of the API, without the `/chat/completions` suffix
    #[arg(long, env = "OPENAPI_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Bearer token
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier; an `openrouter/` prefix is dropped
    #[arg(long, env = "OPENAI_MODEL_NAME")]
    pub model: Option<String>,

    /// System message
    #[arg(long, default_value = DEFAULT_SYSTEM_PROMPT)]
    pub system: String,

    /// User message
    #[arg(long, default_value = DEFAULT_USER_PROMPT)]
    pub prompt: String,

    /// Read the whole reply at once instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Replay a recorded response body instead of calling the API
    #[arg(long, env = "OPENAI_FIXTURE_PATH")]
    pub fixture: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the run configuration. Missing credentials are not an error
    /// here; the endpoint rejects them.
    pub fn into_config(self) -> Config {
        if self.fixture.is_none() {
            if self.api_key.is_none() {
                tracing::warn!("OPENAI_API_KEY is not set, sending an empty bearer token");
            }
            if self.model.is_none() {
                tracing::warn!("OPENAI_MODEL_NAME is not set, sending an empty model name");
            }
        }

        Config::builder()
            .endpoint(self.endpoint)
            .api_key(self.api_key.unwrap_or_default())
            .model(self.model.unwrap_or_default())
            .stream(!self.no_stream)
            .system_prompt(self.system)
            .user_prompt(self.prompt)
            .maybe_fixture(self.fixture)
            .build()
    }
}
