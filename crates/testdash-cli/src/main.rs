mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use testdash_core::config::parse_project_dirs;

#[derive(Parser)]
#[command(
    name = "testdash",
    about = "Discover, browse and run the test files in your projects",
    version,
    propagate_version = true
)]
struct Cli {
    /// Dashboard base directory (default: current directory)
    #[arg(long, global = true, env = "TESTDASH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the web dashboard
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, env = "PORT", default_value = "8085")]
        port: u16,

        /// Colon-separated project roots used for discovery and test lookup
        #[arg(long, env = "PROJECT_DIRS")]
        project_dirs: Option<String>,

        /// Registry file (default: <root>/test-registry.json)
        #[arg(long, env = "TESTDASH_REGISTRY")]
        registry: Option<PathBuf>,

        /// Don't open browser automatically
        #[arg(long)]
        no_open: bool,
    },

    /// Scan for test files and rewrite the registry
    Discover {
        /// Directories to scan (default: the base directory)
        dirs: Vec<PathBuf>,

        /// Registry file (default: <root>/test-registry.json)
        #[arg(long, env = "TESTDASH_REGISTRY")]
        registry: Option<PathBuf>,

        /// Filename regex replacing the built-in rules (repeatable)
        #[arg(long = "pattern", value_name = "REGEX")]
        patterns: Vec<String>,
    },

    /// Run a single test file with its interpreter
    Run {
        /// Test file, absolute or relative to the base directory or a project root
        path: String,

        /// Colon-separated alternate project roots searched for relative paths
        #[arg(long, env = "PROJECT_DIRS")]
        project_dirs: Option<String>,
    },

    /// Show whether CLAUDE.md and claude_tasks/ are present
    Status,

    /// Create claude_tasks/ with starter documents, CLAUDE.md and .gitignore entries
    Init {
        /// Rewrite starter documents and add the task reference to an existing CLAUDE.md
        #[arg(long)]
        force: bool,

        /// Don't touch .gitignore
        #[arg(long)]
        no_git: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Serve {
            port,
            project_dirs,
            registry,
            no_open,
        } => {
            let project_dirs = project_roots(&root, project_dirs.as_deref());
            cmd::serve::run(&root, port, project_dirs, registry, no_open)
        }
        Commands::Discover {
            dirs,
            registry,
            patterns,
        } => cmd::discover::run(&root, dirs, registry, &patterns, cli.json),
        Commands::Run { path, project_dirs } => {
            cmd::run::run(&root, &path, project_roots(&root, project_dirs.as_deref()), cli.json)
        }
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Init { force, no_git } => cmd::init::run(&root, force, no_git, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// `PROJECT_DIRS` entries, relative ones taken against the base dir.
fn project_roots(root: &Path, raw: Option<&str>) -> Vec<PathBuf> {
    raw.map(parse_project_dirs)
        .unwrap_or_default()
        .into_iter()
        .map(|dir| root.join(dir))
        .collect()
}
