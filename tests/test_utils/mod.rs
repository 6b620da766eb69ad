//! Test utilities for integration tests
use std::collections::VecDeque;

use anyhow::Result;

use chatgpt_cli::ai::chat::Console;
use chatgpt_cli::core::AppConfig;

/// Config pointing the client at a mock server.
pub fn test_config(api_hostname: &str) -> AppConfig {
    AppConfig {
        openai_api_hostname: api_hostname.to_string(),
        openai_api_key: String::from("test-api-key"),
        openai_model: String::from("gpt-3.5-turbo"),
        prompt: String::from("> "),
        fit_output_to_screen: true,
    }
}

/// A console that answers from a script and records everything it
/// was asked and every error it was shown. Running out of answers
/// behaves like closing the input.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub questions: Vec<String>,
    pub errors: Vec<String>,
    pub columns: usize,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            columns: 80,
            ..Default::default()
        }
    }
}

impl Console for &mut ScriptedConsole {
    fn question(&mut self, query: &str) -> Result<Option<String>> {
        self.questions.push(query.to_string());
        Ok(self.answers.pop_front())
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn columns(&self) -> usize {
        self.columns
    }
}
