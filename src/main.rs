use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;

use navgraph::errors::{NavError, Result};
use navgraph::logging::init_logging;
use navgraph::navigator::{ElementArg, Navigator};
use navgraph::tools::{get_tool_definitions, handle_tool_call, render};
use navgraph::types::CallDirection;

/// Semantic code navigation over an exported code model.
#[derive(Parser)]
#[command(
    name = "navgraph",
    about = "Type hierarchies, call trees, overrides and symbol search"
)]
struct Cli {
    /// Code model snapshot (JSON)
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,
    /// Project root holding `.navgraph/config.json` (default: current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `navgraph=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Callers,
    Callees,
}

impl From<Direction> for CallDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Callers => CallDirection::Callers,
            Direction::Callees => CallDirection::Callees,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Supertype tree and direct subtypes of a type
    Types {
        /// Symbol id or file:line[:column]
        element: String,
    },
    /// Callers or callees of a function or method
    Calls {
        /// Symbol id or file:line[:column]
        element: String,
        /// Which way to walk
        #[arg(short, long, value_enum, default_value = "callers")]
        direction: Direction,
        /// Levels to expand (default from config)
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Inheritors of a type, or overrides of a method
    Impls {
        /// Symbol id or file:line[:column]
        element: String,
    },
    /// Ancestor methods a method overrides
    Supers {
        /// Symbol id or file:line[:column]
        element: String,
    },
    /// Fuzzy symbol search
    Search {
        /// Substring or abbreviation
        pattern: String,
        /// Include library symbols
        #[arg(long)]
        libraries: bool,
        /// Maximum results (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print the tool definitions as JSON
    Tools,
    /// Invoke a tool by name with JSON arguments
    Tool {
        /// Tool name, e.g. nav_type_hierarchy
        name: String,
        /// Arguments object
        #[arg(default_value = "{}")]
        args: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let output = match cli.command {
        Commands::Tools => serde_json::to_string_pretty(&get_tool_definitions())?,
        command => {
            let nav = open_navigator(cli.project, cli.snapshot)?;
            query(&nav, command)?
        }
    };
    println!("{}", output);
    Ok(())
}

fn query(nav: &Navigator, command: Commands) -> Result<String> {
    match command {
        Commands::Types { element } => render(&nav.type_hierarchy(&element.parse()?)?),
        Commands::Calls {
            element,
            direction,
            depth,
        } => {
            let element: ElementArg = element.parse()?;
            render(&nav.call_hierarchy(&element, direction.into(), depth)?)
        }
        Commands::Impls { element } => render(&nav.implementations(&element.parse()?)?),
        Commands::Supers { element } => render(&nav.super_methods(&element.parse()?)?),
        Commands::Search {
            pattern,
            libraries,
            limit,
        } => Ok(serde_json::to_string_pretty(
            &nav.search_symbols(&pattern, libraries, limit)?,
        )?),
        Commands::Tool { name, args } => {
            let args: serde_json::Value = serde_json::from_str(&args)?;
            Ok(serde_json::to_string_pretty(&handle_tool_call(nav, &name, args)?)?)
        }
        Commands::Tools => Ok(serde_json::to_string_pretty(&get_tool_definitions())?),
    }
}

fn open_navigator(project: Option<PathBuf>, snapshot: Option<PathBuf>) -> Result<Navigator> {
    let snapshot = snapshot.ok_or_else(|| NavError::InvalidRequest {
        message: "--snapshot <file.json> is required for queries".to_string(),
    })?;
    let project_root = project
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    Navigator::open(&project_root, &snapshot)
}
