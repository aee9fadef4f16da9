use anyhow::{Context, Result};
use clap::Parser;
use javagraph::analyzer::{self, AnalyzeOptions};
use javagraph::config::Config;
use javagraph::{cli, cluster, smells, util};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn options_for(input: &cli::InputArgs, config: &Config) -> AnalyzeOptions {
    let mut options = AnalyzeOptions::from_config(config);
    if let Some(extension) = input.extension.as_deref() {
        options.scan.extension = extension.trim_start_matches('.').to_string();
    }
    options.scan.no_ignore = input.no_ignore;
    options
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    init_tracing(args.verbose);
    let config = Config::get();

    match args.command {
        cli::Command::Analyze {
            input,
            output,
            graph,
            inheritance_edges,
        } => {
            let mut options = options_for(&input, config);
            options.register.inheritance_edges = inheritance_edges;
            let analysis = analyzer::analyze_directory(&input.input, options)
                .with_context(|| format!("analyze {}", input.input.display()))?;
            util::write_json(&output, &analysis.result)
                .with_context(|| format!("write entities to {}", output.display()))?;
            info!("wrote entity dump to {}", output.display());
            if let Some(path) = graph {
                util::write_json(&path, &analysis.graph.to_node_link())
                    .with_context(|| format!("write graph to {}", path.display()))?;
                info!("wrote relationship graph to {}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(&analysis.stats)?);
            Ok(())
        }
        cli::Command::Report {
            input,
            output,
            clusters,
        } => {
            let options = options_for(&input, config);
            let analysis = analyzer::analyze_directory(&input.input, options)
                .with_context(|| format!("analyze {}", input.input.display()))?;
            let smells = smells::detect_smells(&analysis.result, &config.thresholds);
            let clusters =
                cluster::cluster_methods(&analysis.result, clusters.unwrap_or(config.clusters));
            let report = json!({
                "stats": analysis.stats,
                "smells": smells,
                "clusters": clusters,
            });
            match output {
                Some(path) => {
                    util::write_json(&path, &report)
                        .with_context(|| format!("write report to {}", path.display()))?;
                    info!("wrote report to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(())
        }
    }
}
