//! relaychat – terminal chat client.
//!
//! Drives a [`ChatSession`] against the relay and prints the assistant reply
//! fragment by fragment. Ctrl-C stops the reply in flight (the partial reply
//! is kept); at the prompt, Ctrl-C or Ctrl-D leaves the chat.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{Parser, Subcommand};
use relaychat_client::{
    CancellationToken, ChatSession, ChatStore, ClientConfig, RelayClient, RenderSink,
    SessionPhase, SqliteStore, SubmitOutcome,
};
use relaychat_types::{ChatTurn, Role};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "relaychat", version, about = "Chat through a relaychat relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Relay endpoint
    #[arg(long, global = true)]
    relay_url: Option<String>,

    /// SQLite URL of the conversation store
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat; one message per line. Ctrl-C stops a reply, or
    /// quits at the prompt
    Chat {
        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<String>,

        /// Ask the relay for a single buffered reply instead of a stream
        #[arg(long)]
        buffered: bool,
    },
    /// List conversations, most recent first
    List,
    /// Print the messages of a conversation
    Show { id: String },
    /// Rename a conversation
    Rename { id: String, title: String },
    /// Delete a conversation and its messages
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = ClientConfig::from_env();
    if let Some(url) = cli.relay_url {
        cfg.relay_url = url;
    }
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: RELAYCHAT_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'warn'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("warn")
            }
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let store = SqliteStore::connect(&cfg.database_url)
        .await
        .with_context(|| format!("opening {}", cfg.database_url))?;

    let result = match cli.command {
        Command::Chat { conversation, buffered } => {
            let transport = RelayClient::new(&cfg.relay_url, buffered.then_some(false))?;
            let mut session = ChatSession::new(store, transport);
            let result = chat(&mut session, conversation.as_deref()).await;
            session.close().await;
            return result;
        }
        Command::List => list(&store).await,
        Command::Show { id } => show(&store, &id).await,
        Command::Rename { id, title } => store
            .update_conversation_title(&id, &title)
            .await
            .map_err(Into::into),
        Command::Delete { id } => store.delete_conversation(&id).await.map_err(Into::into),
    };
    store.close().await;
    result
}

async fn chat(
    session: &mut ChatSession<SqliteStore, RelayClient>,
    conversation: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(id) = conversation {
        session.select_conversation(id).await?;
        for turn in session.turns() {
            print_turn(turn);
        }
    }

    let interrupts = Interrupts::default();
    let watcher = tokio::spawn({
        let interrupts = interrupts.clone();
        async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if !interrupts.interrupt() {
                    break;
                }
            }
        }
    });

    let mut sink = TerminalSink::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result = loop {
        print!("> ");
        std::io::stdout().flush()?;
        let next = tokio::select! {
            _ = interrupts.quit.cancelled() => None,
            line = lines.next_line() => line?,
        };
        let Some(line) = next else {
            println!();
            break Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        let outcome = session.submit(&line, interrupts.arm(), &mut sink).await;
        interrupts.disarm();

        match outcome? {
            SubmitOutcome::Completed { .. } => {}
            SubmitOutcome::Stopped { persisted } => {
                debug!(kept = persisted.is_some(), "reply stopped");
                println!("[stopped]");
            }
            SubmitOutcome::Errored { reason } => warn!(%reason, "reply failed"),
        }
    };
    watcher.abort();
    result
}

/// Routes Ctrl-C: it stops the reply in flight, or quits when idle.
#[derive(Clone, Default)]
struct Interrupts {
    in_flight: Arc<Mutex<Option<CancellationToken>>>,
    quit: CancellationToken,
}

impl Interrupts {
    /// Token for the submission about to start.
    fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut slot) = self.in_flight.lock() {
            *slot = Some(token.clone());
        }
        token
    }

    fn disarm(&self) {
        if let Ok(mut slot) = self.in_flight.lock() {
            *slot = None;
        }
    }

    /// Handle one Ctrl-C. Returns `false` once the chat should end.
    fn interrupt(&self) -> bool {
        let in_flight = self.in_flight.lock().ok().and_then(|mut slot| slot.take());
        match in_flight {
            Some(token) => {
                token.cancel();
                true
            }
            None => {
                self.quit.cancel();
                false
            }
        }
    }
}

async fn list(store: &SqliteStore) -> anyhow::Result<()> {
    for conv in store.list_conversations().await? {
        println!(
            "{}  {}  {}",
            conv.id,
            conv.updated_at.format("%Y-%m-%d %H:%M"),
            conv.title
        );
    }
    Ok(())
}

async fn show(store: &SqliteStore, id: &str) -> anyhow::Result<()> {
    for msg in store.list_messages(id).await? {
        print_turn(&ChatTurn::from(msg));
    }
    Ok(())
}

fn print_turn(turn: &ChatTurn) {
    println!("{}: {}", turn.role, turn.content);
}

/// Prints only what each render adds to the assistant turn.
#[derive(Default)]
struct TerminalSink {
    shown: String,
}

impl RenderSink for TerminalSink {
    fn render(&mut self, turns: &[ChatTurn]) {
        let Some(last) = turns.last().filter(|t| t.role == Role::Assistant) else {
            return;
        };
        let mut out = std::io::stdout();
        let written = match last.content.strip_prefix(self.shown.as_str()) {
            Some(suffix) => write!(out, "{suffix}"),
            // Replaced rather than extended, e.g. by the fallback message.
            None => write!(out, "\n{}", last.content),
        };
        if written.and_then(|()| out.flush()).is_err() {
            return;
        }
        self.shown.clone_from(&last.content);
    }

    fn phase(&mut self, phase: SessionPhase) {
        match phase {
            SessionPhase::Submitting => self.shown.clear(),
            SessionPhase::Idle => println!(),
            _ => {}
        }
    }
}
