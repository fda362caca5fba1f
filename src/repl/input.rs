//! Reading user input: single lines, multi-line blocks, commands, menus.
//!
//! [`Prompter`] is the seam between the REPL and the terminal. The interactive
//! implementation uses rustyline with tab completion of the active command
//! vocabulary.

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};

use super::command::Vocabulary;
use super::console::Console;
use crate::error::InputError;

pub trait Prompter {
    /// Read one line (without the trailing newline).
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError>;

    /// Read lines until end-of-input (Ctrl-D) and join them with newlines.
    fn read_multiline(&mut self, prompt: &str) -> Result<String, InputError>;

    /// Read a line while `vocabulary` is offered for completion.
    fn read_command(
        &mut self,
        prompt: &str,
        _vocabulary: &[&'static str],
    ) -> Result<String, InputError> {
        self.read_line(prompt)
    }
}

/// Prompt until the user types a command from `C`'s vocabulary.
///
/// Anything else is answered with a re-prompt and never leaves this function.
pub fn read_command<C: Vocabulary>(
    prompter: &mut dyn Prompter,
    console: &mut Console,
) -> Result<C, InputError> {
    let vocabulary = C::keywords();
    loop {
        let line = prompter.read_command("> ", &vocabulary)?;
        match C::parse_keyword(&line) {
            Ok(cmd) => return Ok(cmd),
            Err(e) => {
                tracing::debug!("{e}");
                console.error("Invalid task, try again.");
            }
        }
    }
}

/// Show a numbered menu and return the index of the chosen option.
pub fn select(
    prompter: &mut dyn Prompter,
    console: &mut Console,
    title: &str,
    options: &[(&str, &str)],
) -> Result<usize, InputError> {
    console.success(title);
    for (i, (label, description)) in options.iter().enumerate() {
        console.option(i, label, description);
    }
    loop {
        let line = prompter.read_line("Please key in your option (integer): ")?;
        match line.trim().parse::<usize>() {
            Ok(i) if i < options.len() => return Ok(i),
            _ => console.error("Please key in a valid option."),
        }
    }
}

/// Yes/no question; anything but `y`/`yes` counts as no.
pub fn confirm(prompter: &mut dyn Prompter, question: &str) -> Result<bool, InputError> {
    let answer = prompter.read_line(&format!("{question} (y/N) "))?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

// ---------------------------------------------------------------------------
// rustyline
// ---------------------------------------------------------------------------

#[derive(Helper, Hinter, Highlighter, Validator, Default)]
struct CommandHelper {
    vocabulary: Vec<&'static str>,
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let word = &line[..pos];
        let candidates = self
            .vocabulary
            .iter()
            .filter(|cmd| cmd.starts_with(word))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

pub struct TerminalPrompter {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl TerminalPrompter {
    pub fn new() -> Result<Self, InputError> {
        let mut editor = Editor::<CommandHelper, DefaultHistory>::new().map_err(map_readline)?;
        editor.set_helper(Some(CommandHelper::default()));
        Ok(Self { editor })
    }

    fn set_vocabulary(&mut self, vocabulary: &[&'static str]) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.vocabulary = vocabulary.to_vec();
        }
    }
}

fn map_readline(e: ReadlineError) -> InputError {
    match e {
        ReadlineError::Eof => InputError::Closed,
        ReadlineError::Interrupted => InputError::Interrupted,
        other => InputError::Terminal(other.to_string()),
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        self.set_vocabulary(&[]);
        self.editor.readline(prompt).map_err(map_readline)
    }

    fn read_multiline(&mut self, prompt: &str) -> Result<String, InputError> {
        self.set_vocabulary(&[]);
        let mut lines = Vec::new();
        let mut current_prompt = prompt.to_string();
        loop {
            match self.editor.readline(&current_prompt) {
                Ok(line) => lines.push(line),
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(map_readline(e)),
            }
            current_prompt = format!("- {} - ", lines.len() + 1);
        }
        Ok(lines.join("\n"))
    }

    fn read_command(
        &mut self,
        prompt: &str,
        vocabulary: &[&'static str],
    ) -> Result<String, InputError> {
        self.set_vocabulary(vocabulary);
        let line = self.editor.readline(prompt).map_err(map_readline)?;
        let _ = self.editor.add_history_entry(line.as_str());
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::command::MainCommand;
    use std::collections::VecDeque;

    struct Lines(VecDeque<&'static str>);

    impl Prompter for Lines {
        fn read_line(&mut self, _prompt: &str) -> Result<String, InputError> {
            self.0
                .pop_front()
                .map(str::to_string)
                .ok_or(InputError::Closed)
        }

        fn read_multiline(&mut self, prompt: &str) -> Result<String, InputError> {
            self.read_line(prompt)
        }
    }

    #[test]
    fn read_command_skips_invalid_input() {
        let mut prompter = Lines(VecDeque::from(["hello", "NEXT", "todo"]));
        let mut console = Console::sink();
        let cmd: MainCommand = read_command(&mut prompter, &mut console).unwrap();
        assert_eq!(cmd, MainCommand::Todo);
        assert!(prompter.0.is_empty());
    }

    #[test]
    fn read_command_propagates_closed_input() {
        let mut prompter = Lines(VecDeque::from(["nope"]));
        let mut console = Console::sink();
        let result: Result<MainCommand, _> = read_command(&mut prompter, &mut console);
        assert!(matches!(result, Err(InputError::Closed)));
    }

    #[test]
    fn select_retries_until_in_range() {
        let mut prompter = Lines(VecDeque::from(["x", "7", "2"]));
        let mut console = Console::sink();
        let options = [("a", ""), ("b", ""), ("c", "")];
        let choice = select(&mut prompter, &mut console, "Pick", &options).unwrap();
        assert_eq!(choice, 2);
    }

    #[test]
    fn confirm_accepts_yes_variants_only() {
        let mut prompter = Lines(VecDeque::from(["Y", "yes", "", "nah"]));
        assert!(confirm(&mut prompter, "?").unwrap());
        assert!(confirm(&mut prompter, "?").unwrap());
        assert!(!confirm(&mut prompter, "?").unwrap());
        assert!(!confirm(&mut prompter, "?").unwrap());
    }
}
