//! Terminal front-end: `fourline-cli [username]`.
//!
//! Type a column number (0-6) and Enter to play, `q` to leave.
//! `FOURLINE_BACKEND_URL` picks the server; `RUST_LOG` the log level.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use fourline::ENV_USERNAME;
use fourline::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Play Connect-Four against another player or the server's bot.
#[derive(Parser, Debug)]
#[command(name = "fourline-cli")]
#[command(version)]
struct Args {
    /// Name to join matchmaking with.
    #[arg(env = ENV_USERNAME)]
    username: Option<String>,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn parse_intent(line: &str) -> Option<Intent> {
    match line.trim() {
        "q" | "quit" | "leave" => Some(Intent::Leave),
        other => other.parse().ok().map(Intent::Move),
    }
}

async fn read_intents(intents: mpsc::Sender<Intent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match parse_intent(&line) {
            Some(intent) => {
                if intents.send(intent).await.is_err() {
                    break;
                }
            }
            None => eprintln!("enter a column 0-{} or q", COLUMNS - 1),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn draw(event: &SessionEvent) {
    match event {
        SessionEvent::Redraw(view) => println!("\n{view}"),
        SessionEvent::Notice(notice) => println!("> {notice}"),
        SessionEvent::Disconnected => println!("> disconnected"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let username = args
        .username
        .or_else(|| config.username.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| {
            Args::command()
                .error(ErrorKind::MissingRequiredArgument, "a username is required")
                .exit()
        });

    let endpoint = config.endpoint();
    let mut controller = SessionController::connect(&config).await.inspect_err(|e| {
        tracing::error!(%endpoint, error = %e, "could not reach the game server");
    })?;
    controller.subscribe(draw);
    controller.join(&username).await?;
    println!("> joined as {}, waiting for a game", username.trim());

    let (intents, rx) = mpsc::channel(16);
    tokio::spawn(read_intents(intents));
    controller.run(rx).await;

    Ok(())
}
