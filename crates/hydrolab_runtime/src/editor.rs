//! Terminal input for the questionnaire.
//!
//! The intake only ever asks one question and waits for one line, so the
//! seam is a single method. [`Console`] implements it with rustyline; tests
//! script the answers.

use std::borrow::Cow;

use hydrolab_foundation::{Error, Result};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator};

/// Asks questions on a terminal.
pub trait Prompter {
    /// Shows `prompt` and reads one trimmed line, offering `choices` for
    /// tab completion.
    ///
    /// Returns `None` when the user cancels (Ctrl+C) or input ends (Ctrl+D).
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn prompt(&mut self, prompt: &str, choices: &[&str]) -> Result<Option<String>>;
}

#[derive(Helper, Completer, Hinter, Validator)]
struct IntakeHelper {
    #[rustyline(Completer)]
    choices: ChoiceCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
}

impl Highlighter for IntakeHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[90m{hint}\x1b[0m"))
    }
}

/// Completes the whole answer from a fixed list, ignoring case.
#[derive(Default)]
struct ChoiceCompleter {
    choices: Vec<String>,
}

impl Completer for ChoiceCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = line[..pos].trim_start();
        let start = pos - typed.len();
        let typed = typed.to_ascii_lowercase();
        let candidates = self
            .choices
            .iter()
            .filter(|choice| choice.to_ascii_lowercase().starts_with(&typed))
            .map(|choice| Pair {
                display: choice.clone(),
                replacement: choice.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

/// rustyline-backed [`Prompter`] with history hints.
pub struct Console {
    editor: Editor<IntakeHelper, DefaultHistory>,
}

impl Console {
    /// Opens the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline cannot take over the terminal.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .max_history_size(64)
            .map_err(Error::io)?
            .build();

        let mut editor = Editor::with_config(config).map_err(Error::io)?;
        editor.set_helper(Some(IntakeHelper {
            choices: ChoiceCompleter::default(),
            hinter: HistoryHinter::new(),
        }));

        Ok(Self { editor })
    }
}

impl Prompter for Console {
    fn prompt(&mut self, prompt: &str, choices: &[&str]) -> Result<Option<String>> {
        if let Some(helper) = self.editor.helper_mut() {
            helper.choices.choices = choices.iter().map(|c| (*c).to_string()).collect();
        }
        let line = match self.editor.readline(prompt) {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(Error::io(e)),
        };
        if !line.is_empty() {
            // history errors are ignored
            let _ = self.editor.add_history_entry(line.as_str());
        }
        Ok(Some(line))
    }
}
