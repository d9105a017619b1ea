//! mlib - terminal client for the music library
//!
//! Browse the library, play songs, manage favorites and upload new tracks
//! against a running mlib-api server.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use mlib_client::player::RodioPlayer;
use mlib_client::render::render;
use mlib_client::shell::{parse_command, to_msg, Command, HELP};
use mlib_client::{App, LibraryClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mlib")]
#[command(about = "Terminal client for the music library")]
#[command(version)]
struct Args {
    /// Server root URL
    #[arg(short, long, env = "MLIB_SERVER", default_value = "http://localhost:5000")]
    server: String,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout belongs to the UI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mlib_client={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let player = RodioPlayer::new().context("Failed to open audio output")?;
    let client = LibraryClient::new(&args.server).context("Failed to build HTTP client")?;
    info!("Connecting to {}", client.base_url());

    let mut app = App::new(client, player);
    app.mount().await;
    print!("{}", render(app.model()));
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match command {
                    Command::Quit => break,
                    Command::Help => {
                        println!("{}", HELP);
                        continue;
                    }
                    _ => {}
                }

                match to_msg(app.model(), command) {
                    Ok(Some(msg)) => {
                        app.dispatch(msg).await;
                        print!("{}", render(app.model()));
                    }
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                }
            }
            _ = ticker.tick() => {
                if app.poll_ended().await {
                    print!("{}", render(app.model()));
                }
            }
        }
    }

    Ok(())
}
