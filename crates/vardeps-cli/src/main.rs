use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vardeps_core::{Config, GraphReport, ReportScope, Source};
use vardeps_dictionary::{load_table, Catalog};
use vardeps_graph::{build_graph, build_report, Scope, Selection};

/// vardeps - Variable dependency graphs for the Traumabase dictionary
#[derive(Parser)]
#[command(name = "vardeps")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: vardeps.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the variable dictionary (.xlsx or .csv), overrides the config
    #[arg(short, long, global = true)]
    dictionary: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency graph of a selection
    Graph {
        /// Source whose dependencies are drawn
        #[arg(short, long)]
        source: Option<Source>,

        /// Show every variable of the source
        #[arg(short, long, conflicts_with = "variable")]
        all: bool,

        /// Variable to show with its direct dependents (repeatable)
        #[arg(short = 'V', long)]
        variable: Vec<String>,

        /// Output file for graph.json
        #[arg(short, long, default_value = "graph.json")]
        output: PathBuf,
    },

    /// List the selectable variable names
    Variables,

    /// Show what depends on a variable and what it depends on
    Impact {
        /// Variable to analyze
        variable: String,

        /// Source whose dependencies are followed
        #[arg(short, long)]
        source: Option<Source>,
    },

    /// Write a default vardeps.toml
    Init {
        /// Where to write the config
        #[arg(default_value = "vardeps.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // Load config if specified
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("vardeps.toml").exists() {
        Config::from_file(Path::new("vardeps.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if let Some(dictionary) = cli.dictionary {
        config.dictionary = dictionary;
        config.project_root = std::env::current_dir()?;
    }

    match cli.command {
        Commands::Graph { source, all, variable, output } => {
            let selection = Selection {
                source: source.or(config.source),
                show_all: if all {
                    Some(true)
                } else if !variable.is_empty() {
                    Some(false)
                } else {
                    None
                },
                variables: variable,
            };
            graph_command(&config, &selection, &output, cli.verbose)
        }
        Commands::Variables => variables_command(&config, cli.verbose),
        Commands::Impact { variable, source } => {
            impact_command(&config, &variable, source.or(config.source), cli.verbose)
        }
        Commands::Init { path, force } => init_command(&path, force),
    }
}

/// Load and normalize the dictionary named by the config
fn load_catalog(config: &Config, verbose: bool) -> Catalog {
    let path = config.dictionary_path();

    if verbose {
        eprintln!("{} {}", "Loading dictionary from:".cyan(), path.display());
    }

    let catalog = Catalog::from_table(&load_table(&path, &config.loader));

    if verbose {
        eprintln!("{} {} variables", "Loaded".cyan(), catalog.len());
    }
    if catalog.is_empty() {
        eprintln!("{} {}", "⚠ No variables loaded from".yellow(), path.display());
    }

    catalog
}

/// Graph command - build and save the graph of a selection
fn graph_command(config: &Config, selection: &Selection, output: &Path, verbose: bool) -> Result<()> {
    let (source, scope) = match selection.validate() {
        Ok(resolved) => resolved,
        Err(guidance) => {
            println!("{}", guidance.to_string().yellow());
            return Ok(());
        }
    };

    let catalog = load_catalog(config, verbose);

    if let Scope::Variables(vars) = &scope {
        for var in vars {
            if catalog.get(var).is_none() {
                eprintln!("{} '{}' is not in the dictionary", "⚠ Warning:".yellow(), var);
            }
        }
    }

    if verbose {
        eprintln!("{}", "Building dependency graph...".cyan());
    }

    let report = build_report(&catalog, source, &scope, &config.render)
        .map_err(|e| anyhow::anyhow!("Invalid dictionary: {}", e))?;

    report.save_to_file(output)?;

    if verbose {
        eprintln!("{} {}", "Graph saved to:".green(), output.display());
    }

    print_graph_summary(&report);

    Ok(())
}

/// Variables command - list selectable variable names
fn variables_command(config: &Config, verbose: bool) -> Result<()> {
    let catalog = load_catalog(config, verbose);

    for name in catalog.variable_names() {
        println!("{}", name);
    }

    Ok(())
}

/// Impact command - show transitive dependents and prerequisites
fn impact_command(config: &Config, variable: &str, source: Option<Source>, verbose: bool) -> Result<()> {
    let source = source.ok_or_else(|| anyhow::anyhow!(
        "No source selected. Pass --source or set `source` in vardeps.toml"
    ))?;

    let catalog = load_catalog(config, verbose);

    let graph = build_graph(&catalog, source, &Scope::All)
        .map_err(|e| anyhow::anyhow!("Invalid dictionary: {}", e))?;

    if !graph.contains_node(variable) {
        return Err(anyhow::anyhow!(
            "Variable '{}' not found under {}. Run 'vardeps variables' to list names.",
            variable,
            source
        ));
    }

    let downstream = graph.downstream(variable);
    let upstream = graph.upstream(variable);

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Dependency Impact Analysis".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("{} {}", "Variable:".bold(), variable.green());
    println!("{} {}", "Source:".bold(), source);
    println!();

    if downstream.is_empty() {
        println!("{}", "✓ No variable depends on this one".green());
    } else {
        println!("{} {}", "Dependent variables:".bold(), downstream.len());
        for (i, dep) in downstream.iter().enumerate() {
            println!("  {}. {}", i + 1, dep.yellow());
        }
    }
    println!();

    if upstream.is_empty() {
        println!("{}", "No recorded prerequisites".cyan());
    } else {
        println!("{} {}", "Prerequisites:".bold(), upstream.len());
        for (i, dep) in upstream.iter().enumerate() {
            println!("  {}. {}", i + 1, dep);
        }
    }

    if graph.topological_sort().is_none() {
        println!();
        println!("{}", "⚠ The dependency graph of this source contains a cycle".yellow().bold());
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());

    Ok(())
}

/// Init command - write a default config file
fn init_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        ));
    }

    Config::default().save_to_file(path)?;
    println!("{} {}", "Wrote".green(), path.display());

    Ok(())
}

/// Print graph summary to stdout
fn print_graph_summary(report: &GraphReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Variable Dependency Graph".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Source: {}", report.source);
    match &report.scope {
        ReportScope::All => println!("Scope: all variables"),
        ReportScope::Variables(vars) => println!("Scope: {}", vars.join(", ")),
    }
    println!();

    println!("{}", "Summary:".bold());
    println!("  Rows:  {}", report.summary.rows);
    println!("  Nodes: {}", report.summary.nodes);
    println!("  Edges: {}", report.summary.edges);
    println!();

    if report.is_empty() {
        println!("{}", "Nothing to draw".yellow().bold());
    } else if report.edges.is_empty() {
        println!("{}", "No dependencies recorded for this selection".yellow());
    } else {
        println!("{}", "Edges:".bold());
        for edge in &report.edges {
            println!("  {} {} {}", edge.parent.cyan(), "->".dimmed(), edge.child);
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_graph_arguments() {
        let cli = Cli::try_parse_from([
            "vardeps", "graph", "--source", "TRAUMABASE-V1", "-V", "HR", "-V", "AGE",
        ])
        .unwrap();

        match cli.command {
            Commands::Graph { source, all, variable, output } => {
                assert_eq!(source, Some(Source::TraumabaseV1));
                assert!(!all);
                assert_eq!(variable, vec!["HR", "AGE"]);
                assert_eq!(output, PathBuf::from("graph.json"));
            }
            _ => panic!("expected graph command"),
        }
    }

    #[test]
    fn all_conflicts_with_variables() {
        let result = Cli::try_parse_from(["vardeps", "graph", "--all", "-V", "HR"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_source_is_rejected() {
        let result = Cli::try_parse_from(["vardeps", "graph", "--source", "V3", "--all"]);
        assert!(result.is_err());
    }
}
