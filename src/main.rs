//! sbomgraph: dependency graph explorer and CycloneDX SBOM generator

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sbomgraph::{
    cli::{self, CompareDepsArgs, GraphArgs, SbomArgs},
    config::{self, AppConfig},
    model::{DocumentType, KindFilter},
    pipeline::{exit_codes, write_atomic},
    reports::RenderMode,
    source::SourceKind,
    traversal::DepthLimit,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sbomgraph")]
#[command(version)]
#[command(about = "Dependency graph explorer and CycloneDX SBOM generator", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success / no differences found
    1  Comparison found differences
    3  Error occurred

EXAMPLES:
    # Direct runtime dependencies of a target, as CSV
    sbomgraph graph result.graph.json

    # Whole buildtime graph as Graphviz
    sbomgraph graph result.graph.json --buildtime --depth unbounded --out deps.dot

    # Who depends on libunistring?
    sbomgraph graph result.graph.json --inverse libunistring --depth 2

    # Runtime SBOM
    sbomgraph sbom result.graph.json --cdx sbom.cdx.json

    # Check an SBOM against a graph export
    sbomgraph compare-deps --sbom sbom.cdx.json --graph deps.csv")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where raw graph data comes from (overrides the config file)
    #[arg(long, global = true, value_enum)]
    source: Option<SourceKind>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `graph` subcommand
#[derive(Parser)]
struct GraphCommandArgs {
    /// Build target handed to the graph source
    target: String,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Output format (inferred from --out extension when unset)
    #[arg(short, long, value_enum)]
    format: Option<RenderMode>,

    /// Maximum traversal depth: a hop count or `unbounded`
    #[arg(short, long)]
    depth: Option<DepthLimit>,

    /// Draw the inverse graph from every node whose name or path matches
    #[arg(long, value_name = "REGEX")]
    inverse: Option<String>,

    /// Walk buildtime edges instead of runtime edges
    #[arg(long, conflicts_with = "both")]
    buildtime: bool,

    /// Walk both runtime and buildtime edges
    #[arg(long)]
    both: bool,
}

impl GraphCommandArgs {
    fn kind_filter(&self) -> Option<KindFilter> {
        if self.both {
            Some(KindFilter::Both)
        } else if self.buildtime {
            Some(KindFilter::Buildtime)
        } else {
            None
        }
    }
}

/// Arguments for the `sbom` subcommand
#[derive(Parser)]
struct SbomCommandArgs {
    /// Build target handed to the graph source
    target: String,

    /// CycloneDX output path (stdout if not specified)
    #[arg(long, value_name = "PATH")]
    cdx: Option<PathBuf>,

    /// Which edge kinds the document covers
    #[arg(long = "type", value_enum)]
    document_type: Option<DocumentType>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the dependency graph of a build target
    Graph(GraphCommandArgs),

    /// Generate a CycloneDX SBOM for a build target
    Sbom(SbomCommandArgs),

    /// Compare the components of two CycloneDX documents
    CompareSboms {
        /// First document
        file1: PathBuf,
        /// Second document
        file2: PathBuf,
        /// Component attributes that identify a component
        #[arg(long, default_value = "name,version")]
        uid: String,
    },

    /// Compare SBOM dependencies with a graph export
    CompareDeps {
        /// CycloneDX document
        #[arg(long)]
        sbom: PathBuf,
        /// CSV export produced by `graph`
        #[arg(long, conflicts_with = "target", required_unless_present = "target")]
        graph: Option<PathBuf>,
        /// Export the target's full graph instead of reading one
        #[arg(long)]
        target: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .sbomgraph.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

/// Load the configuration the pipeline commands run with
fn effective_config(cli: &Cli) -> Result<AppConfig> {
    let (mut config, loaded_from) = config::load_config(cli.config.as_deref())?;
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }
    if let Some(kind) = cli.source {
        config.source.kind = kind;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Graph(args) => {
            let config = effective_config(&cli)?;
            let graph_args = GraphArgs {
                target: args.target.clone(),
                out: args.out.clone(),
                format: args.format,
                depth: args.depth,
                inverse: args.inverse.clone(),
                kind_filter: args.kind_filter(),
            };
            cli::run_graph(graph_args, &config)
        }

        Commands::Sbom(args) => {
            let config = effective_config(&cli)?;
            let sbom_args = SbomArgs {
                target: args.target.clone(),
                cdx: args.cdx.clone(),
                document_type: args.document_type,
            };
            cli::run_sbom(sbom_args, &config)
        }

        Commands::CompareSboms { file1, file2, uid } => {
            cli::run_compare_sboms(file1, file2, uid, cli.quiet)
        }

        Commands::CompareDeps {
            sbom,
            graph,
            target,
        } => {
            let config = effective_config(&cli)?;
            let args = CompareDepsArgs {
                sbom: sbom.clone(),
                graph: graph.clone(),
                target: target.clone(),
            };
            cli::run_compare_deps(args, &config, cli.quiet)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "sbomgraph", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    write_atomic(path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => run_config_action(action, &cli),
    }
}

fn run_config_action(action: &ConfigAction, cli: &Cli) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let cwd = std::env::current_dir().ok();
            let search_paths: [Option<String>; 4] = [
                cwd.as_ref().map(|p| p.display().to_string()),
                cwd.as_deref()
                    .and_then(config::file::find_git_root)
                    .map(|p| p.display().to_string()),
                ::dirs::config_dir().map(|p| p.join("sbomgraph").display().to_string()),
                ::dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in config::CONFIG_FILE_NAMES {
                eprintln!("  {name}");
            }
            eprintln!();
            match config::discover_config_file(cli.config.as_deref()) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".sbomgraph.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            write_atomic(&target, &config::generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
    }
    Ok(exit_codes::SUCCESS)
}
