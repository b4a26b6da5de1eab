// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Console host: environment configuration and a line-oriented command loop
//!
//! Environment (a `.env` file is honored):
//!
//! | Variable                | Default                      |
//! |-------------------------|------------------------------|
//! | `EXPLORER_API_KEY`      | required                     |
//! | `EXPLORER_URL`          | `https://api.basescan.org/api` |
//! | `CHAIN`                 | `8453` (Base)                |
//! | `PAGE_SIZE`             | `3`                          |
//! | `RPC_TIMEOUT_SECS`      | `30`                         |
//! | `RATE_LIMIT_PER_SECOND` | `5` (`0` disables)           |

use std::sync::Arc;
use std::time::Duration;

use alloy_chains::NamedChain;
use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tracing::info;
use url::Url;

use crate::analysis::{AnalysisEvent, CancellationFlag, ContractAnalyzer};
use crate::config::{CommonscanConfig, CommonscanConfigBuilder};
use crate::interaction::{InteractionOutcome, InteractionState, SessionContext};
use crate::provider::{ChainDataProvider, ExplorerClient, ExplorerConfig};
use crate::report;
use crate::store::{SessionId, SessionStore};
use crate::transport::{LoggingLayer, RateLimitLayer, TimeoutLayer};

/// Main entry point for the console host.
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = config_from_env()?;
    let explorer = explorer_from_env(&config)?;
    let chain = config.chain;

    let provider = build_provider(explorer, &config)?;
    let analyzer = Arc::new(ContractAnalyzer::new(provider, config));
    let store = SessionStore::new(analyzer);

    info!(chain = %chain, "Console session ready");
    console_loop(&store, SessionId::from("console"), chain).await
}

/// Engine configuration from `CHAIN`, `PAGE_SIZE`, `RPC_TIMEOUT_SECS` and `RATE_LIMIT_PER_SECOND`
pub fn config_from_env() -> anyhow::Result<CommonscanConfig> {
    let chain = NamedChain::try_from(
        dotenvy::var("CHAIN")
            .unwrap_or_else(|_| "8453".to_string()) // Default to Base chain
            .parse::<u64>()
            .context("CHAIN must be a chain id")?,
    )
    .map_err(|_| anyhow::anyhow!("Unsupported CHAIN"))?;

    let mut builder = CommonscanConfigBuilder::with_defaults().chain(chain);

    if let Ok(size) = dotenvy::var("PAGE_SIZE") {
        builder = builder.page_size(size.parse().context("PAGE_SIZE must be a positive integer")?);
    }
    if let Ok(secs) = dotenvy::var("RPC_TIMEOUT_SECS") {
        let secs: u64 = secs.parse().context("RPC_TIMEOUT_SECS must be a number of seconds")?;
        builder = builder.rpc_timeout(Duration::from_secs(secs));
    }
    if let Ok(rps) = dotenvy::var("RATE_LIMIT_PER_SECOND") {
        builder = match rps.parse::<u32>().context("RATE_LIMIT_PER_SECOND must be an integer")? {
            0 => builder.no_rate_limit(),
            rps => builder.rate_limit_per_second(rps),
        };
    }

    Ok(builder.build())
}

/// Explorer endpoint from `EXPLORER_API_KEY` and `EXPLORER_URL`
pub fn explorer_from_env(config: &CommonscanConfig) -> anyhow::Result<ExplorerConfig> {
    let api_key = dotenvy::var("EXPLORER_API_KEY").context("EXPLORER_API_KEY must be set")?;

    let explorer = match dotenvy::var("EXPLORER_URL") {
        Ok(url) => ExplorerConfig::new(Url::parse(&url).context("EXPLORER_URL is not a URL")?, api_key),
        Err(_) => ExplorerConfig::basescan(api_key)?,
    };
    Ok(explorer.with_http_timeout(config.get_rpc_timeout()))
}

/// Explorer client wrapped in logging, rate limiting and the per-call timeout
pub fn build_provider(
    explorer: ExplorerConfig,
    config: &CommonscanConfig,
) -> anyhow::Result<Arc<dyn ChainDataProvider>> {
    let client = ExplorerClient::new(explorer)?;
    let timeout = TimeoutLayer::new(config.get_rpc_timeout());

    let provider: Arc<dyn ChainDataProvider> = match config.rate_limit_per_second {
        Some(rps) => Arc::new(
            ServiceBuilder::new()
                .layer(LoggingLayer::new())
                .layer(RateLimitLayer::per_second(rps))
                .layer(timeout)
                .service(client),
        ),
        None => Arc::new(
            ServiceBuilder::new()
                .layer(LoggingLayer::new())
                .layer(timeout)
                .service(client),
        ),
    };
    Ok(provider)
}

/// A console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Add,
    StartDate(usize),
    EndDate(usize),
    Remove(usize),
    List,
    Analyze,
    First,
    Previous,
    Next,
    Last,
    Help,
    Quit,
    /// Free text, routed by the interaction state
    Text(String),
}

impl ConsoleCommand {
    /// Parses a line; `Err` carries a usage message
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if !line.starts_with('/') {
            return Ok(Self::Text(line.to_string()));
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let index = |name: &str, arg: Option<&str>| {
            arg.and_then(|a| a.parse::<usize>().ok())
                .ok_or_else(|| format!("usage: {name} <contract index>"))
        };

        match command {
            "/start" => Ok(Self::Start),
            "/add" => Ok(Self::Add),
            "/start-date" => index(command, parts.next()).map(Self::StartDate),
            "/end-date" => index(command, parts.next()).map(Self::EndDate),
            "/remove" => index(command, parts.next()).map(Self::Remove),
            "/list" => Ok(Self::List),
            "/analyze" => Ok(Self::Analyze),
            "/first" => Ok(Self::First),
            "/prev" => Ok(Self::Previous),
            "/next" => Ok(Self::Next),
            "/last" => Ok(Self::Last),
            "/help" => Ok(Self::Help),
            "/quit" => Ok(Self::Quit),
            other => Err(format!("unknown command {other}, try /help")),
        }
    }
}

const HELP: &str = "\
/start            reset the session
/add              register a contract (then enter its address)
/start-date <i>   set the window start of contract i
/end-date <i>     set the window end of contract i
/remove <i>       remove contract i
/list             show registered contracts
/analyze          find the wallets common to every contract
/first /prev /next /last   browse result pages
/quit             exit";

async fn console_loop<P: ChainDataProvider + ?Sized>(
    store: &SessionStore<P>,
    id: SessionId,
    chain: NamedChain,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    store.start(id.clone()).await;

    write_out(&mut stdout, "Please choose an option (/help for commands):").await?;
    while let Some(line) = lines.next_line().await? {
        let command = match ConsoleCommand::parse(&line) {
            Ok(command) => command,
            Err(usage) => {
                write_out(&mut stdout, &usage).await?;
                continue;
            }
        };

        if command == ConsoleCommand::Quit {
            store.end(&id).await;
            break;
        }
        if command == ConsoleCommand::Start {
            store.start(id.clone()).await;
            write_out(&mut stdout, "Session reset.").await?;
            continue;
        }

        let (shared, restarted) = store.resume(&id).await;
        if restarted {
            write_out(&mut stdout, "Session expired after inactivity, started a new one.").await?;
        }
        let mut context = shared.lock().await;
        let reply = execute(&mut context, command, chain).await;
        write_out(&mut stdout, &reply).await?;
    }
    Ok(())
}

async fn execute<P: ChainDataProvider + ?Sized>(
    context: &mut SessionContext<P>,
    command: ConsoleCommand,
    chain: NamedChain,
) -> String {
    match command {
        ConsoleCommand::Add => match context.begin_add_contract() {
            Ok(()) => "Please enter the contract address:".to_string(),
            Err(error) => error.to_string(),
        },
        ConsoleCommand::StartDate(index) => match context.begin_set_start(index) {
            Ok(()) => "Please enter the start date (format: YYYY-MM-DD HH:MM:SS):".to_string(),
            Err(error) => error.to_string(),
        },
        ConsoleCommand::EndDate(index) => match context.begin_set_end(index) {
            Ok(()) => "Please enter the end date (format: YYYY-MM-DD HH:MM:SS):".to_string(),
            Err(error) => error.to_string(),
        },
        ConsoleCommand::Remove(index) => {
            context.cancel_input();
            match context.session_mut().remove(index) {
                Ok(removed) => format!(
                    "Removed {}\n{}",
                    removed.display_name(),
                    report::render_registrations(context.session())
                ),
                Err(error) => error.to_string(),
            }
        }
        ConsoleCommand::List => report::render_registrations(context.session()),
        ConsoleCommand::Analyze => analyze(context, chain).await,
        ConsoleCommand::First => {
            let page = context.session_mut().first_page();
            show_page(context, page, chain)
        }
        ConsoleCommand::Previous => {
            let page = context.session_mut().previous_page();
            show_page(context, page, chain)
        }
        ConsoleCommand::Next => {
            let page = context.session_mut().next_page();
            show_page(context, page, chain)
        }
        ConsoleCommand::Last => {
            let page = context.session_mut().last_page();
            show_page(context, page, chain)
        }
        ConsoleCommand::Help => HELP.to_string(),
        ConsoleCommand::Text(text) => text_reply(context, &text).await,
        ConsoleCommand::Start | ConsoleCommand::Quit => String::new(),
    }
}

async fn text_reply<P: ChainDataProvider + ?Sized>(context: &mut SessionContext<P>, text: &str) -> String {
    match context.handle_text(text).await {
        Ok(InteractionOutcome::Registered {
            index,
            display_name,
        }) => format!(
            "Registered [{index}] {display_name}\n{}",
            report::render_registrations(context.session())
        ),
        Ok(InteractionOutcome::WindowStartSet { .. } | InteractionOutcome::WindowEndSet { .. }) => {
            report::render_registrations(context.session())
        }
        Ok(InteractionOutcome::Ignored) => "Please choose an option (/help for commands).".to_string(),
        Err(error) if context.state() != InteractionState::Idle => {
            format!("{error}\nPlease try again:")
        }
        Err(error) => error.to_string(),
    }
}

async fn analyze<P: ChainDataProvider + ?Sized>(context: &mut SessionContext<P>, chain: NamedChain) -> String {
    context.cancel_input();
    let session = context.session_mut();
    if session.registrations().is_empty() {
        return "No contracts to analyze.".to_string();
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<AnalysisEvent>();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("{}", report::render_event(&event));
        }
    });

    println!("Start analyzing common addresses, this could take a while...");
    let outcome = session
        .analyze(&tx, &CancellationFlag::new())
        .await
        .cloned();
    drop(tx);
    let _ = printer.await;

    match outcome {
        Ok(results) => {
            let summary = report::render_summary(session, &results);
            if results.is_empty() {
                summary
            } else {
                let page = session.current_page_index();
                format!("{summary}\n\n{}", show_page(context, page, chain))
            }
        }
        Err(error) => error.to_string(),
    }
}

fn show_page<P: ChainDataProvider + ?Sized>(context: &SessionContext<P>, page: usize, chain: NamedChain) -> String {
    if context.session().results().is_none() {
        return "No report available.".to_string();
    }
    match report::render_page(context.session(), page, chain) {
        Ok(text) => text,
        Err(_) => "No common addresses found.".to_string(),
    }
}

async fn write_out(stdout: &mut tokio::io::Stdout, text: &str) -> anyhow::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse("/add"), Ok(ConsoleCommand::Add));
        assert_eq!(ConsoleCommand::parse(" /start-date 2 "), Ok(ConsoleCommand::StartDate(2)));
        assert_eq!(ConsoleCommand::parse("/prev"), Ok(ConsoleCommand::Previous));
        assert_eq!(
            ConsoleCommand::parse("2024-01-01 00:00:00"),
            Ok(ConsoleCommand::Text("2024-01-01 00:00:00".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_missing_index() {
        assert!(ConsoleCommand::parse("/end-date").is_err());
        assert!(ConsoleCommand::parse("/remove x").is_err());
        assert!(ConsoleCommand::parse("/frobnicate").is_err());
    }
}
