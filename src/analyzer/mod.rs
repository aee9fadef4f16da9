use crate::config::Config;
use crate::error::Result;
use crate::graph::{RegisterOptions, RelationshipGraph};
use crate::model::{AnalysisResult, RunStats};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

pub mod extract;
pub mod file;
pub mod locate;
pub mod scan;
pub mod tree;

pub use file::FileAnalyzer;

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub scan: scan::ScanOptions,
    pub max_file_size_mb: u64,
    pub register: RegisterOptions,
}

impl AnalyzeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scan: scan::ScanOptions::new(false, config.extension.clone()),
            max_file_size_mb: config.max_file_size_mb,
            register: RegisterOptions::default(),
        }
    }
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Everything one directory run produces.
#[derive(Debug)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub graph: RelationshipGraph,
    pub stats: RunStats,
}

pub struct Analyzer {
    root: PathBuf,
    options: AnalyzeOptions,
    files: FileAnalyzer,
}

impl Analyzer {
    /// Fails with a fatal error when the root is unusable or the parser
    /// cannot be set up; nothing has been analyzed at that point.
    pub fn new(root: PathBuf, options: AnalyzeOptions) -> Result<Self> {
        scan::check_root(&root)?;
        let root = std::fs::canonicalize(&root).unwrap_or(root);
        let files = FileAnalyzer::with_options(options.register)?;
        Ok(Self {
            root,
            options,
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the root and analyzes every matching file. Per-file failures
    /// are logged and counted; the file is left out of the result.
    pub fn run(&mut self) -> Result<Analysis> {
        let started = Instant::now();
        let scanned = scan::scan_dir(&self.root, &self.options.scan)?;
        let mut result = AnalysisResult::new();
        let mut graph = RelationshipGraph::new();
        let mut stats = RunStats {
            scanned: scanned.len(),
            ..RunStats::default()
        };
        let max_bytes = self.options.max_file_size_mb.saturating_mul(1024 * 1024);

        for file in scanned {
            if file.size > max_bytes {
                warn!(
                    "skipping large file ({}MB): {}",
                    file.size / (1024 * 1024),
                    file.rel_path
                );
                stats.skipped += 1;
                continue;
            }
            match self.files.analyze_file(&file.abs_path, &mut graph) {
                Ok(classes) => {
                    stats.analyzed += 1;
                    stats.classes += classes.len();
                    for class in &classes {
                        stats.methods += class.methods.len();
                        stats.fields += class.fields.len();
                    }
                    result.insert(file.rel_path, classes);
                }
                Err(err) => {
                    warn!("analyze error {}: {err}", file.rel_path);
                    stats.skipped += 1;
                }
            }
        }

        stats.graph_nodes = graph.node_count();
        stats.graph_edges = graph.edge_count();
        stats.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            analyzed = stats.analyzed,
            skipped = stats.skipped,
            classes = stats.classes,
            "analysis finished"
        );
        Ok(Analysis {
            result,
            graph,
            stats,
        })
    }
}

pub fn analyze_directory(root: &Path, options: AnalyzeOptions) -> Result<Analysis> {
    Analyzer::new(root.to_path_buf(), options)?.run()
}
