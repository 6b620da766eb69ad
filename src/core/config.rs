use std::env;

use anyhow::{Result, bail};

pub const API_KEY_VAR: &str = "CHATGPT_CLI_SECRET_KEY";
pub const FIT_OUTPUT_VAR: &str = "CHATGPT_CLI_FIT_OUTPUT_TO_SCREEN";
pub const MODEL_VAR: &str = "CHATGPT_CLI_MODEL";
pub const PROMPT_VAR: &str = "CHATGPT_CLI_PROMPT";
pub const API_HOST_VAR: &str = "CHATGPT_CLI_API_HOST";

/// Settings for a chat session, read once at startup and never
/// changed afterwards.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub prompt: String,
    pub fit_output_to_screen: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup so it can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = match lookup(API_KEY_VAR) {
            Some(key) if !key.is_empty() => key,
            _ => bail!("You must specify \"{}\" via the environment", API_KEY_VAR),
        };
        // Anything but the literal "true" turns reflow off
        let fit_output_to_screen = lookup(FIT_OUTPUT_VAR)
            .map(|v| v == "true")
            .unwrap_or(true);
        let openai_model = lookup(MODEL_VAR).unwrap_or_else(|| "gpt-3.5-turbo".to_string());
        let prompt = lookup(PROMPT_VAR).unwrap_or_else(|| "> ".to_string());
        let openai_api_hostname =
            lookup(API_HOST_VAR).unwrap_or_else(|| "https://api.openai.com".to_string());

        Ok(Self {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            prompt,
            fit_output_to_screen,
        })
    }
}
