use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wf_editor::{Editor, EditorResult};
use wf_graph::{Graph, NodeKind, Outcome};
use wf_project::{EditorConfig, TemplateId, import_json, load_config};

#[derive(Parser)]
#[command(name = "wf-cli")]
#[command(about = "Workflow designer CLI - inspect and generate workflow files", long_about = None)]
struct Cli {
    /// Editor settings (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a workflow file for structural problems
    Validate {
        /// Path to the workflow JSON file
        path: PathBuf,
    },
    /// Count nodes and edges by kind
    Stats {
        /// Path to the workflow JSON file
        path: PathBuf,
    },
    /// List the built-in templates
    Templates,
    /// Write a built-in template as an export document
    Template {
        /// Template id (approval, parallel, notification)
        id: String,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> EditorResult<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Commands::Validate { path } => cmd_validate(&path),
        Commands::Stats { path } => cmd_stats(&path),
        Commands::Templates => {
            cmd_templates();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Template { id, output } => cmd_template(config, &id, output.as_deref()),
    }
}

fn read_graph(path: &Path) -> EditorResult<Graph> {
    let text = fs::read_to_string(path).map_err(wf_project::ProjectError::from)?;
    Ok(import_json(&text)?)
}

fn cmd_validate(path: &Path) -> EditorResult<ExitCode> {
    println!("Validating workflow: {}", path.display());
    let graph = read_graph(path)?;
    let report = wf_graph::validate(&graph);
    println!("{}", report.summary());
    Ok(match report.outcome() {
        Outcome::Failed => ExitCode::FAILURE,
        Outcome::Passed | Outcome::PassedWithWarnings => ExitCode::SUCCESS,
    })
}

fn cmd_stats(path: &Path) -> EditorResult<ExitCode> {
    let graph = read_graph(path)?;
    let stats = graph.stats();
    println!("Nodes: {}", stats.nodes);
    println!("Edges: {}", stats.edges);
    for kind in NodeKind::ALL {
        let count = stats.count(kind);
        if count > 0 {
            println!("  {:<14} {}", kind, count);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_templates() {
    println!("Built-in templates:");
    for template in TemplateId::ALL {
        println!(
            "  {:<14} {} - {}",
            template.as_str(),
            template.title(),
            template.description()
        );
    }
}

fn cmd_template(config: EditorConfig, id: &str, output: Option<&Path>) -> EditorResult<ExitCode> {
    let template: TemplateId = id.parse()?;
    let mut editor = Editor::with_graph(config, Graph::new());
    editor.load_template(template)?;
    let file = editor.export()?;

    match output {
        Some(path) => {
            fs::write(path, &file.contents).map_err(wf_project::ProjectError::from)?;
            println!("✓ Wrote {} to {}", template.title(), path.display());
        }
        None => println!("{}", file.contents),
    }
    Ok(ExitCode::SUCCESS)
}
