use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "javagraph",
    version,
    about = "Java class/method extractor and relationship graph builder",
    after_help = r#"Examples:
  javagraph analyze --input src/main/java --output entities.json
  javagraph analyze --input . --output entities.json --graph graph.json --inheritance-edges
  javagraph report --input . --clusters 8
  RUST_LOG=debug javagraph analyze --input . --output entities.json
"#
)]
pub struct Args {
    /// Log per-file progress.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Root directory to walk for source files.
    #[arg(long, default_value = ".")]
    pub input: PathBuf,
    /// Source file extension to analyze (defaults to JAVAGRAPH_EXTENSION or "java").
    #[arg(long)]
    pub extension: Option<String>,
    /// Include files ignored by .gitignore/.ignore.
    #[arg(long)]
    pub no_ignore: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract classes into an entity dump and optionally a relationship graph.
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Entity dump destination (JSON).
        #[arg(long)]
        output: PathBuf,
        /// Relationship graph destination (node-link JSON).
        #[arg(long)]
        graph: Option<PathBuf>,
        /// Add `extends`/`implements` edges to the graph.
        #[arg(long)]
        inheritance_edges: bool,
    },
    /// Analyze, then report code smells and method clusters.
    Report {
        #[command(flatten)]
        input: InputArgs,
        /// Write the report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Number of method clusters (defaults to JAVAGRAPH_CLUSTERS or 5).
        #[arg(long)]
        clusters: Option<usize>,
    },
}
