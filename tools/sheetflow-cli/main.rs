use clap::{Parser, Subcommand, ValueEnum};
use sheetflow::prelude::*;
use std::fs;
use std::io::{self, Write};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionCli {
    /// Top to bottom
    Tb,
    /// Left to right
    Lr,
}

impl From<DirectionCli> for Direction {
    fn from(value: DirectionCli) -> Self {
        match value {
            DirectionCli::Tb => Direction::TopBottom,
            DirectionCli::Lr => Direction::LeftRight,
        }
    }
}

/// Inspect and arrange spreadsheet pipeline workspaces
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workspace JSON file
    workspace_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the flow graph; exits with status 1 when it is invalid
    Validate,
    /// Show which file, sheet and header row feed a node
    Lineage {
        node_id: String,
    },
    /// Assign node positions and print (or save) the updated workspace
    Layout {
        #[arg(short, long, value_enum, ignore_case = true, default_value = "tb")]
        direction: DirectionCli,
        /// Skip the layered strategy and use the topological grid
        #[arg(long)]
        fallback: bool,
        /// Optional layout configuration JSON file
        #[arg(short, long)]
        config: Option<String>,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the node kinds that may follow a node
    Successors {
        node_id: String,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let workspace = Workspace::from_file(&cli.workspace_path)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    match cli.command {
        Command::Validate => run_validate(&workspace),
        Command::Lineage { node_id } => run_lineage(&workspace, &node_id),
        Command::Layout {
            direction,
            fallback,
            config,
            output,
        } => run_layout(&workspace, direction.into(), fallback, config, output),
        Command::Successors { node_id } => run_successors(&workspace, &node_id),
    }
}

fn run_validate(workspace: &Workspace) {
    let result = validate_flow(&workspace.flow_nodes, &workspace.flow_edges);
    print!("{}", ReportFormatter::format(&result));
    if !result.is_valid {
        std::process::exit(1);
    }
}

fn run_lineage(workspace: &Workspace, node_id: &str) {
    if !workspace.flow_nodes.iter().any(|n| n.id == node_id) {
        exit_with_error(&format!("node '{}' is not part of the workspace", node_id));
    }
    match trace_node_data_source(node_id, &workspace.flow_nodes, &workspace.flow_edges, workspace) {
        Some(lineage) => {
            println!("Node:       {}", node_id);
            println!("File:       {} ({})", lineage.file_path, lineage.file_id);
            if lineage.is_usable() {
                println!("Sheet:      {}", lineage.sheet_name);
            } else {
                println!("Sheet:      <no sheet metadata>");
            }
            println!("Header row: {}", lineage.header_row);
            println!(
                "Via:        {} -> {}",
                lineage.path.source_id, lineage.path.selector_id
            );
            if !lineage.is_exact() {
                println!("Note: sheet is chosen per index value at run time; first sheet shown");
            }
        }
        None => println!("No data source can be traced for node '{}'", node_id),
    }
}

fn run_layout(
    workspace: &Workspace,
    direction: Direction,
    fallback: bool,
    config_path: Option<String>,
    output: Option<String>,
) {
    let config = match config_path {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|e| exit_with_error(&format!("Could not read '{}': {}", path, e)));
            serde_json::from_str::<LayoutConfig>(&content)
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid layout config: {}", e)))
        }
        None => LayoutConfig::default(),
    };

    let mut engine = AutoLayout::new(config);
    if fallback {
        engine = engine.without_primary();
    }
    let nodes = engine.apply(&workspace.flow_nodes, &workspace.flow_edges, direction);
    let graph = Graph::new(nodes, workspace.flow_edges.clone());
    let updated = workspace.with_graph(graph);

    match output {
        Some(path) => {
            updated
                .save(&path)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            eprintln!("Layout written to {}", path);
        }
        None => {
            let json = updated
                .to_json()
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json).unwrap_or_else(|e| exit_with_error(&e.to_string()));
        }
    }
}

fn run_successors(workspace: &Workspace, node_id: &str) {
    let Some(node) = workspace.flow_nodes.iter().find(|n| n.id == node_id) else {
        exit_with_error(&format!("node '{}' is not part of the workspace", node_id));
    };
    let kinds = available_successor_kinds(node_id, &workspace.flow_nodes, &workspace.flow_edges);
    println!("{} ({}) may be followed by:", node.label(), node.kind());
    if kinds.is_empty() {
        println!("  (nothing)");
    }
    for kind in kinds {
        println!("  - {:<15} {}", kind.display_name(), kind.description());
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
