//! automaton-canvas CLI - export and collect finite-automaton diagrams

mod cli;
mod colorizer;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli_args = cli::Cli::parse();

    let mut app = cli::AutomatonCanvasApp::new();
    app.run(cli_args)
}
