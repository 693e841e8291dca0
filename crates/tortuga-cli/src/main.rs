//! Tortuga CLI
//!
//! Resolves types across a module's reference graph and runs console test
//! suites.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tortuga_cli::commands::{self, Context, Outcome};
use tortuga_cli::output::{self, ColorMode, StyledOutput};
use tortuga_cli::config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tortuga")]
#[command(about = "Cross-module type resolver and console test runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./tortuga.toml, then ~/.tortuga/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print JSON instead of styled text
    #[arg(long, global = true)]
    json: bool,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a type by fully-qualified name
    Type {
        /// Module manifest the search starts from
        module: PathBuf,
        /// Fully-qualified type name
        full_name: String,
    },

    /// List the classes of a namespace in referenced modules
    Namespace {
        /// Module manifest the search starts from
        module: PathBuf,
        /// Namespace, without trailing separator
        namespace: String,
    },

    /// Run tests from a test library through the console runner
    Test {
        /// Compiled test library
        library: PathBuf,
        /// Fully-qualified test name (repeatable)
        #[arg(short, long = "test", value_name = "NAME")]
        tests: Vec<String>,
    },

    /// Show configuration and environment
    Info,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut out = StyledOutput::new(output::resolve_color_choice(cli.color));

    match run(cli) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            out.stderr_error(&format!("Error: {:#}", e));
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let loaded = config::discover(cli.config.as_deref())?;
    let mut ctx = Context {
        config: loaded,
        out: StyledOutput::new(output::resolve_color_choice(cli.color)),
        json: cli.json,
    };

    match cli.command {
        Commands::Type { module, full_name } => {
            commands::types::execute(&mut ctx, &module, &full_name)
        }
        Commands::Namespace { module, namespace } => {
            commands::namespace::execute(&mut ctx, &module, &namespace)
        }
        Commands::Test { library, tests } => commands::test::execute(&mut ctx, &library, &tests),
        Commands::Info => commands::info::execute(&mut ctx),
    }
}

/// Log to stderr, filtered by `-v` or else `TORTUGA_LOG` (default `warn`)
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("TORTUGA_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
