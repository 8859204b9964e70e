//! Command-line interface for the automaton-canvas utility
//!
//! Exports structure JSON to SVG, prints layouts and arrows, and manages
//! the saved-structure gallery.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::colorizer::colorize_json;
use automaton_canvas::core::logging::init_logging;
use automaton_canvas::gallery::{FileStore, Gallery};
use automaton_canvas::plugins::Orchestrator;
use automaton_canvas::{DiagramMetrics, Structure};

/// Environment variable naming the gallery directory
pub const STORE_ENV: &str = "AUTOMATON_CANVAS_STORE";

/// automaton-canvas - draw and collect finite automata
#[derive(Parser)]
#[command(name = "automaton-canvas")]
#[command(about = "Lay out finite automata and export them as SVG")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a structure as SVG
    Export {
        /// Structure JSON file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output SVG file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file overriding drawing metrics
        #[arg(long)]
        metrics: Option<PathBuf>,
    },

    /// Print state positions and resolved arrows as JSON
    Inspect {
        /// Structure JSON file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Print a built-in sample structure
    Sample {
        /// 0 for the NFA sample, 1 for the DFA sample
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Manage previously saved structures
    Gallery {
        #[command(subcommand)]
        action: GalleryCommand,
    },
}

#[derive(Subcommand)]
pub enum GalleryCommand {
    /// List saved structures
    List {
        /// Gallery directory
        #[arg(long)]
        store: Option<PathBuf>,

        /// Print the full structures as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save a structure unless an identical one exists
    Add {
        /// Structure JSON file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Gallery directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// One line of `gallery list`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GallerySummary {
    pub index: usize,
    pub kind: String,
    pub label: &'static str,
    pub states: usize,
    pub transitions: usize,
}

impl GallerySummary {
    fn new(index: usize, structure: &Structure) -> Self {
        let graph = structure.graph();
        Self {
            index,
            kind: structure.kind().to_string(),
            label: if graph.is_dfa() { "DFA" } else { "NFA" },
            states: graph.states().len(),
            transitions: graph.transitions().len(),
        }
    }
}

/// Main CLI application
pub struct AutomatonCanvasApp {
    orchestrator: Orchestrator,
}

impl AutomatonCanvasApp {
    /// Create a new application instance with default metrics
    pub fn new() -> Self {
        Self {
            orchestrator: Orchestrator::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // unset flags fall back to the environment
        if let Err(e) = init_logging(
            cli.log_level.map(|l| l.as_str()),
            cli.log_format.map(|f| f.as_str()),
        ) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("automaton-canvas v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Export {
                input,
                output,
                metrics,
            } => self.export_command(input, output, metrics, cli.verbose),
            Commands::Inspect { input, color } => self.inspect_command(input, color),
            Commands::Sample { index, color } => self.sample_command(index, color),
            Commands::Gallery { action } => match action {
                GalleryCommand::List { store, json } => self.gallery_list_command(store, json),
                GalleryCommand::Add { input, store } => self.gallery_add_command(input, store),
            },
        }
    }

    fn export_command(
        &mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        metrics: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        if let Some(path) = metrics {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read metrics file '{}'", path.display()))?;
            let metrics = DiagramMetrics::from_json(&raw)
                .with_context(|| format!("Invalid metrics file '{}'", path.display()))?;
            debug!(?metrics, "Using custom metrics");
            self.orchestrator = Orchestrator::with_metrics(metrics);
        }

        let svg = self.orchestrator.process(&content)?;

        if verbose {
            eprintln!("Successfully exported structure to SVG");
        }

        self.write_output(output, &svg)
    }

    fn inspect_command(&self, input: Option<PathBuf>, color: ColorChoice) -> Result<()> {
        let content = self.read_input(input)?;
        let structure = self.orchestrator.parse(&content)?;
        let inspection = self.orchestrator.inspect(&structure)?;
        let json = serde_json::to_string_pretty(&inspection)?;
        self.print_json(&json, color)
    }

    fn sample_command(&self, index: usize, color: ColorChoice) -> Result<()> {
        let samples = Structure::samples();
        let structure = samples.get(index).ok_or_else(|| {
            anyhow!(
                "No sample with index {} (available: 0..{})",
                index,
                samples.len()
            )
        })?;
        self.print_json(&structure.to_json_pretty()?, color)
    }

    fn gallery_list_command(&self, store: Option<PathBuf>, json: bool) -> Result<()> {
        let dir = resolve_store_dir(store)?;
        let gallery = Gallery::new(FileStore::new(&dir));
        let structures = gallery
            .load()
            .with_context(|| format!("Failed to load gallery from '{}'", dir.display()))?;

        if json {
            println!("{}", serde_json::to_string_pretty(&structures)?);
            return Ok(());
        }

        if structures.is_empty() {
            println!("No saved structures in {}", dir.display());
            return Ok(());
        }
        for (index, structure) in structures.iter().enumerate() {
            let summary = GallerySummary::new(index, structure);
            println!(
                "{:>3}  {}  {} states, {} transitions",
                summary.index, summary.label, summary.states, summary.transitions
            );
        }
        Ok(())
    }

    fn gallery_add_command(&self, input: Option<PathBuf>, store: Option<PathBuf>) -> Result<()> {
        let content = self.read_input(input)?;
        let structure = self.orchestrator.parse(&content)?;
        let dir = resolve_store_dir(store)?;
        let mut gallery = Gallery::new(FileStore::new(&dir));

        let added = gallery
            .add(&structure)
            .with_context(|| format!("Failed to save to gallery in '{}'", dir.display()))?;
        if added {
            info!(store = %dir.display(), "Saved structure");
            println!("Structure saved!");
        } else {
            println!("Structure already saved");
        }
        Ok(())
    }

    fn print_json(&self, json: &str, color: ColorChoice) -> Result<()> {
        let text = if should_colorize(color) {
            colorize_json(json)
        } else {
            json.to_string()
        };
        self.write_output(None, &text)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
                debug!(path = %path.display(), bytes = content.len(), "Wrote output");
            }
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for AutomatonCanvasApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors only on a terminal, and never with NO_COLOR set
fn should_colorize(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::env::var("NO_COLOR").is_err()
                && crossterm::tty::IsTty::is_tty(&std::io::stdout())
        }
    }
}

/// Gallery directory: the flag, else `AUTOMATON_CANVAS_STORE`, else the
/// platform data directory
pub fn resolve_store_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(STORE_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let project_dirs = directories::ProjectDirs::from("", "", "automaton-canvas")
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(project_dirs.data_dir().to_path_buf())
}
