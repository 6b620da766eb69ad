use anyhow::Result;
use crossterm::terminal;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::{Console, Conversation};
use crate::core::AppConfig;
use crate::openai::OpenAiClient;

const FALLBACK_COLUMNS: usize = 80;

/// Console backed by a rustyline editor. Lines are never added to the
/// editor history.
pub struct EditorConsole {
    editor: DefaultEditor,
}

impl EditorConsole {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Console for EditorConsole {
    fn question(&mut self, query: &str) -> Result<Option<String>> {
        // rustyline only handles a single line prompt so anything before
        // the last line break is printed first
        let prompt = match query.rsplit_once('\n') {
            Some((preamble, prompt)) => {
                println!("{}", preamble);
                prompt
            }
            None => query,
        };

        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn report_error(&mut self, message: &str) {
        eprintln!("{}", message);
    }

    fn columns(&self) -> usize {
        terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(FALLBACK_COLUMNS)
    }
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let console = EditorConsole::new()?;
    let service = OpenAiClient::from_config(config);

    Conversation::new(config, service, console).run().await?;
    Ok(())
}
