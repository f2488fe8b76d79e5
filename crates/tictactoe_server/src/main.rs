//! Tic-tac-toe server - unified CLI

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tictactoe_engine::Mark;
use tictactoe_server::cli::{Cli, Command};
use tictactoe_server::{BoardRenderer, BoardSnapshot, ConfigOverrides, ServerConfig, SvgRenderer};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Http {
            port,
            host,
            config,
            export_dir,
            cell_size,
        } => {
            let overrides = ConfigOverrides {
                host,
                port,
                export_dir,
                cell_size,
            };
            let config = ServerConfig::load(config.as_deref(), overrides)?;
            tictactoe_server::serve(config).await
        }
        Command::Render {
            moves,
            first,
            output,
            cell_size,
        } => render(first, &moves, output, cell_size).await,
    }
}

/// Replays moves and writes the rendered board.
#[instrument(skip(moves))]
async fn render(first: Mark, moves: &[usize], output: Option<PathBuf>, cell_size: u32) -> Result<()> {
    let allowed = SvgRenderer::MIN_CELL_SIZE..=SvgRenderer::MAX_CELL_SIZE;
    anyhow::ensure!(
        allowed.contains(&cell_size),
        "cell size must be between {} and {} pixels, got {}",
        allowed.start(),
        allowed.end(),
        cell_size
    );

    let state = tictactoe_server::replay(first, moves).context("Move sequence rejected")?;
    info!(status = ?state.status(), moves = state.history().len(), "Replayed game");
    eprintln!("{}\n\n{:?}", state.board().display(), state.status());

    let image = SvgRenderer::new(cell_size)
        .render(&BoardSnapshot::of(&state))
        .await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, image.bytes())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Board written");
        }
        None => println!("{}", String::from_utf8_lossy(image.bytes())),
    }
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tictactoe_server=debug,tictactoe_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
