use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use ptguide::agent::AgentSet;
use ptguide::agent::registry::AgentRegistry;
use ptguide::cli::Cli;
use ptguide::config::{self, AppConfig};
use ptguide::repl::console::Console;
use ptguide::repl::input::TerminalPrompter;
use ptguide::repl::startup::{establish_session, print_banner};
use ptguide::repl::{Context, ExitReason, Io, Repl, Settings, TRANSCRIPT_PREFIX};
use ptguide::session::{History, HistorySource, SessionStore};
use ptguide::web_search::DuckDuckGo;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(&cli)?;
    init_tracing(&config)?;

    tracing::info!(
        reasoning_model = %config.reasoning_model,
        parsing_model = %config.parsing_model,
        log_dir = %config.log_dir.display(),
        "ptguide starting"
    );

    if !cli.use_api {
        eprintln!(
            "Warning: --use-api false is deprecated and has no effect. The model API is always used."
        );
        tracing::warn!("--use-api false requested; ignoring");
    }

    let registry = AgentRegistry::with_builtin_models();
    let agents = AgentSet::new(
        registry.create(&config.reasoning_model)?,
        registry.create(&config.reasoning_model)?,
        registry.create(&config.parsing_model)?,
        Duration::from_secs(config.agent_timeout_secs),
    );

    let prompter = TerminalPrompter::new().context("failed to open the terminal")?;
    let mut io = Io::new(Box::new(prompter), Console::stdout());
    print_banner(&mut io.console, &config, cli.use_api);

    let store = SessionStore::new(&config.session_dir);
    let mut history = History::new();
    let session = match establish_session(&agents, &mut io, &mut history, &store).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Session setup failed: {e:#}");
            history.append(HistorySource::Exception, format!("{e:#}"));
            if let Err(flush_err) = history.flush(&config.log_dir, TRANSCRIPT_PREFIX) {
                tracing::error!("Failed to write transcript: {flush_err:#}");
            }
            return Err(e);
        }
    };

    let ctx = Context::new(
        agents,
        session,
        history,
        io,
        Box::new(DuckDuckGo::default()),
        store,
        Settings::from(&config),
    );
    let mut repl = Repl::new(ctx, &config.log_dir);
    let exit = repl.run().await;
    let report = repl.shutdown();

    if let Some(path) = &report.transcript {
        tracing::info!(path = %path.display(), "Transcript written");
    }
    match exit {
        ExitReason::Quit => Ok(()),
        ExitReason::Error(trace) => anyhow::bail!("session ended with an error: {trace}"),
    }
}

/// Stderr logging filtered by `RUST_LOG`, plus a debug-level file log when
/// `--logging` is set.
fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into()));

    let file_layer = if config.file_logging {
        fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("failed to create {}", config.log_dir.display()))?;
        let path = config.log_dir.join("ptguide.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::DEBUG),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}
