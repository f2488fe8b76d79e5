//! Command-line interface for tictactoe_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_engine::Mark;

/// Tic-tac-toe over HTTP with rendered board images
#[derive(Parser, Debug)]
#[command(name = "tictactoe_server")]
#[command(about = "Tic-tac-toe REST service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Http {
        /// Port to bind to (overrides config file and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config file and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also write every rendered board to this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Cell size of rendered boards, in pixels
        #[arg(long)]
        cell_size: Option<u32>,
    },

    /// Replay moves on a fresh game and render the resulting board
    Render {
        /// Square indices (0-8, row-major), comma separated
        #[arg(short, long, value_delimiter = ',')]
        moves: Vec<usize>,

        /// Mark that moves first
        #[arg(long, default_value = "X")]
        first: Mark,

        /// Where to write the SVG (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cell size in pixels
        #[arg(long, default_value = "100")]
        cell_size: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_parses_move_list() {
        let cli = Cli::try_parse_from(["tictactoe_server", "render", "--moves", "0,3,1", "--first", "O"])
            .unwrap();
        match cli.command {
            Command::Render { moves, first, .. } => {
                assert_eq!(moves, vec![0, 3, 1]);
                assert_eq!(first, Mark::O);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
