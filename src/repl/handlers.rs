//! One handler per command.
//!
//! Handlers compose prompts from the templates in [`crate::agent::prompts`]
//! and the user's input, call the agents, print the result and record every
//! step in the conversation history.

use crate::agent::AgentRole;
use crate::agent::prompts;
use crate::error::{AgentError, HandlerError};
use crate::session::HistorySource;

use super::command::{InputSource, LocalCommand, MainCommand, Vocabulary};
use super::context::Context;
use super::input::{read_command, select};

const RECOMMENDED: &str = "Based on the analysis, the following tasks are recommended:";
const FOLLOW_INSTRUCTIONS: &str = "You can follow the instructions below to complete the tasks.";
const MULTILINE_HINT: &str = "(End with Ctrl-D on an empty line)";
const SEARCH_LABEL: &str = "Google search results (raw, summarization is not implemented):";
pub const FAREWELL: &str = "Thank you for using ptguide!";

/// What a handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub async fn handle(ctx: &mut Context, command: MainCommand) -> Result<Reply, HandlerError> {
    match command {
        MainCommand::Next => next(ctx).await,
        MainCommand::More => more(ctx).await,
        MainCommand::Todo => todo(ctx).await,
        MainCommand::Discuss => discuss(ctx).await,
        MainCommand::Google => google(ctx).await,
        MainCommand::Help => Ok(help::<MainCommand>(ctx)),
        MainCommand::Quit => Ok(quit(ctx)),
    }
}

async fn next(ctx: &mut Context) -> Result<Reply, HandlerError> {
    let options: Vec<(&str, &str)> = InputSource::ALL
        .iter()
        .map(|s| (s.tag(), s.description()))
        .collect();
    let choice = select(
        ctx.io.prompter.as_mut(),
        &mut ctx.io.console,
        "Please choose the source of the information.",
        &options,
    )?;
    let source = InputSource::ALL[choice];

    ctx.io.console.success(&format!("Your input: {MULTILINE_HINT}"));
    let input = ctx.io.prompter.read_multiline("> ")?;
    ctx.history.append(
        HistorySource::User,
        format!("Source: {}\n{input}", source.tag()),
    );

    ctx.io.console.status("ptguide thinking...");
    let response = reason(ctx, &input, Some(source)).await?;
    ctx.pending_reasoning = Some(response.clone());

    ctx.io.console.success(RECOMMENDED);
    ctx.io.console.print(&format!("{response}\n"));
    ctx.history
        .append(HistorySource::Assistant, format!("{RECOMMENDED}{response}"));
    Ok(Reply::Text(response))
}

async fn more(ctx: &mut Context) -> Result<Reply, HandlerError> {
    let Some(pending) = ctx.pending_reasoning.clone() else {
        return Err(HandlerError::NotInitialized);
    };

    let intro = "ptguide will generate more test details, and enter the sub-task generation mode.";
    ctx.io.console.success(intro);
    ctx.history.append(HistorySource::Assistant, intro);

    ctx.io.console.status("ptguide thinking...");
    let details = generate(ctx, &format!("{}{pending}", prompts::LOCAL_TASK_INIT)).await?;

    ctx.io.console.success("Below are the further details.");
    ctx.io.console.print(&format!("{details}\n"));
    ctx.history.append(HistorySource::Assistant, details.as_str());

    loop {
        match local_step(ctx).await {
            Ok(true) => break,
            Ok(false) => {}
            // An agent failure ends only the current sub-task command.
            Err(HandlerError::Agent(e)) => {
                let message = e.to_string();
                tracing::warn!("Sub-task command failed: {message}");
                ctx.history
                    .append(HistorySource::Exception, message.as_str());
                ctx.io.console.error(&format!("Agent error: {message}"));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(Reply::Text(details))
}

/// One iteration of the sub-task loop. Returns `true` on `continue`.
async fn local_step(ctx: &mut Context) -> Result<bool, HandlerError> {
    let command: LocalCommand = read_command(ctx.io.prompter.as_mut(), &mut ctx.io.console)?;
    ctx.history.append(HistorySource::User, command.keyword());

    match command {
        LocalCommand::Help => {
            help::<LocalCommand>(ctx);
        }
        LocalCommand::Discuss => {
            converse(
                ctx,
                "Please share your findings and questions with ptguide.",
                prompts::LOCAL_TASK_PREFIX,
            )
            .await?;
        }
        LocalCommand::Brainstorm => {
            converse(
                ctx,
                "Please share your concerns and questions with ptguide.",
                prompts::LOCAL_TASK_BRAINSTORM,
            )
            .await?;
        }
        LocalCommand::Google => {
            google(ctx).await?;
        }
        LocalCommand::Continue => {
            let message = "Exit the local task and continue the main task.";
            ctx.io.console.print(message);
            ctx.history.append(HistorySource::Assistant, message);
            return Ok(true);
        }
    }
    Ok(false)
}

/// Ask for multi-line input and send it to the generation agent after `prefix`.
async fn converse(ctx: &mut Context, ask: &str, prefix: &str) -> Result<String, HandlerError> {
    ctx.io.console.print(&format!("{ask} {MULTILINE_HINT}"));
    ctx.history.append(HistorySource::Assistant, ask);
    let input = ctx.io.prompter.read_multiline("Your input: ")?;
    ctx.history.append(HistorySource::User, input.as_str());

    ctx.io.console.status("ptguide thinking...");
    let response = generate(ctx, &format!("{prefix}{input}")).await?;

    ctx.io.console.success("ptguide:");
    ctx.io.console.highlight(&format!("{response}\n"));
    ctx.history.append(HistorySource::Assistant, response.as_str());
    Ok(response)
}

async fn todo(ctx: &mut Context) -> Result<Reply, HandlerError> {
    ctx.io.console.status("ptguide thinking...");
    let tasks = reason(ctx, prompts::ASK_TODO, None).await?;
    let instructions = generate(ctx, &format!("{}\n{tasks}", prompts::TODO_TO_COMMAND)).await?;

    ctx.io.console.success(RECOMMENDED);
    ctx.io.console.print(&format!("{tasks}\n"));
    ctx.io.console.success(FOLLOW_INSTRUCTIONS);
    ctx.io.console.print(&format!("{instructions}\n"));
    ctx.history.append(
        HistorySource::Assistant,
        format!("{RECOMMENDED}{tasks}\n{FOLLOW_INSTRUCTIONS}{instructions}"),
    );
    Ok(Reply::Text(tasks))
}

async fn discuss(ctx: &mut Context) -> Result<Reply, HandlerError> {
    let ask = "Please share your thoughts/questions with ptguide.";
    ctx.io.console.print(&format!("{ask} {MULTILINE_HINT}"));
    ctx.history.append(HistorySource::Assistant, ask);
    let input = ctx.io.prompter.read_multiline("Your input: ")?;
    ctx.history.append(HistorySource::User, input.as_str());

    ctx.io.console.status("ptguide thinking...");
    let response = reason(ctx, &format!("{}{input}", prompts::DISCUSSION), None).await?;

    ctx.io.console.success("ptguide:");
    ctx.io.console.highlight(&format!("{response}\n"));
    ctx.history.append(HistorySource::Assistant, response.as_str());
    Ok(Reply::Text(response))
}

/// Web search that returns the raw result list. Summarizing the results with
/// an agent is not implemented; the output says so.
async fn google(ctx: &mut Context) -> Result<Reply, HandlerError> {
    let ask = "Please enter your search query. ptguide will list the raw results from the web.";
    ctx.io.console.success(ask);
    ctx.history.append(HistorySource::Assistant, ask);
    let query = ctx.io.prompter.read_line("Your input: ")?;
    ctx.history.append(HistorySource::User, query.as_str());

    ctx.io.console.status("Searching...");
    let text = match ctx
        .search
        .search(query.trim(), ctx.settings.search_result_count)
        .await
    {
        Ok(results) if results.is_empty() => format!("{SEARCH_LABEL}\nNo results found."),
        Ok(results) => {
            let listing: Vec<String> = results
                .iter()
                .enumerate()
                .map(|(i, result)| format!("{}. {result}", i + 1))
                .collect();
            format!("{SEARCH_LABEL}\n{}", listing.join("\n"))
        }
        Err(e) => {
            tracing::warn!("{e}");
            ctx.history.append(HistorySource::Exception, e.to_string());
            ctx.io.console.error(&e.to_string());
            format!("{SEARCH_LABEL}\nSearch failed: {e}")
        }
    };

    ctx.io.console.highlight(&format!("{text}\n"));
    ctx.history.append(HistorySource::Assistant, text.as_str());
    Ok(Reply::Text(text))
}

fn help<C: Vocabulary>(ctx: &mut Context) -> Reply {
    let text = C::help_text();
    ctx.io.console.print(&text);
    ctx.history.append(HistorySource::Assistant, text.as_str());
    Reply::Text(text)
}

fn quit(ctx: &mut Context) -> Reply {
    ctx.io.console.success(FAREWELL);
    ctx.history.append(HistorySource::Assistant, FAREWELL);
    Reply::Quit
}

// ---------------------------------------------------------------------------
// Agent pipelines
// ---------------------------------------------------------------------------

/// Summarize if too long, then update the testing tree and select next tasks.
///
/// Returns both reasoning replies concatenated.
pub async fn reason(
    ctx: &mut Context,
    text: &str,
    source: Option<InputSource>,
) -> Result<String, AgentError> {
    let text = if text.chars().count() > ctx.settings.parsing_char_window {
        summarize(ctx, text, source).await?
    } else {
        text.to_string()
    };

    let session_id = &ctx.session.ids.reasoning;
    let updated = ctx
        .agents
        .send(
            AgentRole::Reasoning,
            &format!("{}{text}", prompts::PROCESS_RESULTS),
            session_id,
        )
        .await?;
    let selected = ctx
        .agents
        .send(
            AgentRole::Reasoning,
            prompts::PROCESS_RESULTS_TASK_SELECTION,
            session_id,
        )
        .await?;

    let response = format!("{updated}{selected}");
    ctx.history.append(HistorySource::Reasoning, response.as_str());
    Ok(response)
}

/// Condense `text` with the parsing agent, one chunk at a time.
pub async fn summarize(
    ctx: &mut Context,
    text: &str,
    source: Option<InputSource>,
) -> Result<String, AgentError> {
    let prefix = InputSource::summary_prefix(source);
    let flattened = text.replace(['\r', '\n'], " ");
    let chunks = wrap_chunks(&flattened, ctx.settings.parsing_chunk_chars);
    if chunks.is_empty() {
        return Ok(String::new());
    }

    let word_limit = format!(
        "Please ensure that the input is less than {} words.\n",
        ctx.settings.parsing_chunk_chars / chunks.len()
    );
    let mut summary = String::new();
    for chunk in &chunks {
        let reply = ctx
            .agents
            .send(
                AgentRole::Parsing,
                &format!("{prefix}{word_limit}{chunk}"),
                &ctx.session.ids.parsing,
            )
            .await?;
        summary.push_str(&reply);
    }

    ctx.history.append(HistorySource::Parsing, summary.as_str());
    Ok(summary)
}

/// Send `text` to the generation agent and record the reply.
pub async fn generate(ctx: &mut Context, text: &str) -> Result<String, AgentError> {
    let reply = ctx
        .agents
        .send(AgentRole::Generation, text, &ctx.session.ids.generation)
        .await?;
    ctx.history.append(HistorySource::Generation, reply.as_str());
    Ok(reply)
}

/// Greedy word wrap into chunks of at most `width` characters.
///
/// Words longer than `width` are split across chunks.
fn wrap_chunks(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.push(word.drain(..width).collect());
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 {
            word.len()
        } else {
            word.len() + 1
        };
        if current_len + needed > width {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_packs_words_up_to_width() {
        let chunks = wrap_chunks("aa bb cc dd", 5);
        assert_eq!(chunks, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn wrap_splits_oversized_words() {
        let chunks = wrap_chunks("x abcdefghij y", 4);
        assert_eq!(chunks, vec!["x", "abcd", "efgh", "ij y"]);
    }

    #[test]
    fn wrap_never_exceeds_width() {
        let text = "PORT STATE SERVICE 22/tcp open ssh 80/tcp open http ".repeat(500);
        let chunks = wrap_chunks(&text, 8000);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 8000));
        let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.split(' ')).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn wrap_of_blank_text_is_empty() {
        assert!(wrap_chunks("   ", 10).is_empty());
    }
}
