use anyhow::Result;

use super::models::Transcript;
use super::reflow::reflow;
use crate::core::AppConfig;
use crate::openai::{Completion, CompletionService, Message, Role};

/// Typing this at any prompt ends the session.
pub const EXIT_COMMAND: &str = "exit";

const NO_RESPONSE: &str = "No response, try asking again";
const SOMETHING_WENT_WRONG: &str = "Something went wrong, try asking again";

/// The terminal side of a chat session.
pub trait Console {
    /// Shows `query` and waits for a line of input. Returns `None` when
    /// the user closed the input (Ctrl-D or Ctrl-C).
    fn question(&mut self, query: &str) -> Result<Option<String>>;

    /// Writes to the diagnostic channel, not the conversation.
    fn report_error(&mut self, message: &str);

    /// Current width of the terminal in columns.
    fn columns(&self) -> usize;
}

/// Drives an interactive chat: asks for a persona, then relays each
/// line the user types to the completion service and shows the answer
/// until the user exits.
///
/// Failed rounds are recovered by asking the user to try again. Only
/// console errors end a session early.
pub struct Conversation<'a, S, C> {
    config: &'a AppConfig,
    service: S,
    console: C,
}

impl<'a, S, C> Conversation<'a, S, C>
where
    S: CompletionService,
    C: Console,
{
    pub fn new(config: &'a AppConfig, service: S, console: C) -> Self {
        Self {
            config,
            service,
            console,
        }
    }

    /// Runs the session to completion and hands back the transcript,
    /// which is empty when the user left before choosing a persona.
    pub async fn run(mut self) -> Result<Transcript> {
        let config = self.config;
        let prompt = &config.prompt;

        let persona = self.ask(&format!(
            "What type of chatbot would you like to create?\n\n{}",
            prompt
        ))?;
        let Some(persona) = persona else {
            return Ok(Transcript::default());
        };

        let mut transcript = Transcript::with_persona(&persona);
        let mut input = self.ask(&format!("\nSay hello to your new assistant.\n\n{}", prompt))?;

        while let Some(line) = input {
            let reply = self.next_turn(&mut transcript, &line).await;
            input = self.ask(&format!("\n{}\n\n{}", reply, prompt))?;
        }

        tracing::debug!("Session ended with {} messages", transcript.len());
        Ok(transcript)
    }

    /// Sends the user's line and returns the text to show before the
    /// next prompt. The user message stays in the transcript even when
    /// no answer comes back.
    async fn next_turn(&mut self, transcript: &mut Transcript, line: &str) -> String {
        transcript.push(Message::new(Role::User, line));

        let config = self.config;
        let model = &config.openai_model;
        tracing::debug!(
            "Requesting completion from {} with {} messages",
            model,
            transcript.len()
        );

        match self.service.complete(model, transcript.messages()).await {
            Completion::Success(candidates) => match candidates.into_iter().next() {
                Some(msg) => {
                    let content = msg.content.clone().unwrap_or_default();
                    transcript.push(msg);
                    reflow(
                        &content,
                        self.console.columns(),
                        config.fit_output_to_screen,
                    )
                }
                None => NO_RESPONSE.to_string(),
            },
            Completion::Empty => {
                tracing::warn!("Completion returned no message");
                NO_RESPONSE.to_string()
            }
            Completion::Failure(err) => {
                tracing::debug!("Completion failed: {:?}", err);
                self.console.report_error(&err.to_string());
                SOMETHING_WENT_WRONG.to_string()
            }
        }
    }

    /// Asks a question, mapping the exit keyword and closed input to
    /// `None`.
    fn ask(&mut self, query: &str) -> Result<Option<String>> {
        let answer = self.console.question(query)?;
        Ok(answer.filter(|line| line != EXIT_COMMAND))
    }
}
