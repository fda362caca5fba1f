//! Closed command vocabularies for the main loop and the local sub-task loop.

use std::str::FromStr;

use crate::agent::prompts;
use crate::error::CommandError;

/// A fixed set of commands the user can type at one prompt.
pub trait Vocabulary: Sized + Copy + FromStr<Err = CommandError> + 'static {
    const ALL: &'static [Self];

    fn keyword(&self) -> &'static str;
    fn description(&self) -> &'static str;

    fn keywords() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::keyword).collect()
    }

    /// Look up `input` (surrounding whitespace ignored, case-sensitive).
    fn parse_keyword(input: &str) -> Result<Self, CommandError> {
        let word = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.keyword() == word)
            .ok_or_else(|| CommandError::Invalid(word.to_string()))
    }

    fn help_text() -> String {
        let mut text = String::from("Below are the available tasks:");
        for cmd in Self::ALL {
            text.push_str(&format!("\n - {}: {}", cmd.keyword(), cmd.description()));
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    Next,
    More,
    Todo,
    Discuss,
    Google,
    Help,
    Quit,
}

impl Vocabulary for MainCommand {
    const ALL: &'static [Self] = &[
        MainCommand::Next,
        MainCommand::More,
        MainCommand::Todo,
        MainCommand::Discuss,
        MainCommand::Google,
        MainCommand::Help,
        MainCommand::Quit,
    ];

    fn keyword(&self) -> &'static str {
        match self {
            MainCommand::Next => "next",
            MainCommand::More => "more",
            MainCommand::Todo => "todo",
            MainCommand::Discuss => "discuss",
            MainCommand::Google => "google",
            MainCommand::Help => "help",
            MainCommand::Quit => "quit",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            MainCommand::Next => "Continue to the next step by inputting the test results.",
            MainCommand::More => "Explain the previous given task with more details.",
            MainCommand::Todo => "Ask for the task list and what to do next.",
            MainCommand::Discuss => {
                "Discuss the task, ask for help, or give feedback on the plan."
            }
            MainCommand::Google => "Search your question on the web and show the raw results.",
            MainCommand::Help => "Show this help page.",
            MainCommand::Quit => "End the current session.",
        }
    }
}

impl FromStr for MainCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_keyword(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    Discuss,
    Brainstorm,
    Help,
    Google,
    Continue,
}

impl Vocabulary for LocalCommand {
    const ALL: &'static [Self] = &[
        LocalCommand::Discuss,
        LocalCommand::Brainstorm,
        LocalCommand::Help,
        LocalCommand::Google,
        LocalCommand::Continue,
    ];

    fn keyword(&self) -> &'static str {
        match self {
            LocalCommand::Discuss => "discuss",
            LocalCommand::Brainstorm => "brainstorm",
            LocalCommand::Help => "help",
            LocalCommand::Google => "google",
            LocalCommand::Continue => "continue",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            LocalCommand::Discuss => "Discuss this local task.",
            LocalCommand::Brainstorm => "Brainstorm all the possible solutions for the local task.",
            LocalCommand::Help => "Show the help page for this local task.",
            LocalCommand::Google => "Search on the web.",
            LocalCommand::Continue => "Quit the local task and continue the previous testing.",
        }
    }
}

impl FromStr for LocalCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_keyword(s)
    }
}

/// Where the text handed to `next` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Tool,
    UserComments,
    Web,
    Default,
}

impl InputSource {
    pub const ALL: [InputSource; 4] = [
        InputSource::Tool,
        InputSource::UserComments,
        InputSource::Web,
        InputSource::Default,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            InputSource::Tool => "tool",
            InputSource::UserComments => "user-comments",
            InputSource::Web => "web",
            InputSource::Default => "default",
        }
    }

    /// Shown next to the tag in the selection menu.
    pub fn description(&self) -> &'static str {
        match self {
            InputSource::Tool => "Paste the output of the security test tool used",
            InputSource::UserComments => "Your own notes or observations",
            InputSource::Web => "Paste the relevant content of a web page",
            InputSource::Default => "Write whatever you want, the tool will handle it",
        }
    }

    /// Appended to the summarization prefix sent to the parsing agent.
    pub fn summary_hint(&self) -> &'static str {
        match self {
            InputSource::Tool => {
                "The input content is from a security testing tool. You need to list down all the points that are interesting to you; you should summarize it as if you are reporting to a senior penetration tester for further guidance.\n"
            }
            InputSource::UserComments => "The input content is from user comments.\n",
            InputSource::Web => {
                "The input content is from web pages. You need to summarize the readable-contents, and list down all the points that can be interesting for penetration testing.\n"
            }
            InputSource::Default => {
                "The user did not specify the input source. You need to summarize based on the contents.\n"
            }
        }
    }

    /// Full prefix for a parsing request about text from this source.
    pub fn summary_prefix(source: Option<InputSource>) -> String {
        let hint = source.map_or("", |s| s.summary_hint());
        format!("{}{hint}", prompts::SUMMARIZE_PREFIX)
    }
}
