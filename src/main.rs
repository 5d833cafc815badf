use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod describe;
mod init;
mod list;
mod syntax;
mod tree;

use describe::{DescribeContext, describe_class, resolve_class};
use init::init_config;
use jdesc::Config;
use list::list_classes;
use tree::show_tree;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "jdesc")]
#[command(about = "Describe the public API of compiled JVM classes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Class path entry (directory or .jar), searched before the configured ones
    #[arg(short = 'c', long = "classpath", global = true, value_name = "ENTRY")]
    classpath: Vec<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the public methods of a class as JSON
    Describe {
        /// Binary class name (com.example.Greeter) or path to a .class file
        class: String,

        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the superclass chain of a class
    Tree {
        /// Binary class name or path to a .class file
        class: String,
    },
    /// List classes on the class path
    List {
        /// Regular expression matched against binary class names
        pattern: Option<String>,
    },
    /// Initialize a new jdesc.toml configuration file
    Init {
        /// Overwrite existing jdesc.toml if present
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(cli.verbose);

    let config = Config::load().with_leading_classpath(cli.classpath);
    let classpath = config.class_path();

    let result = match cli.command {
        Commands::Describe { class, output } => {
            let ctx = DescribeContext {
                config: config.clone(),
                classpath,
                verbose: cli.verbose,
                color: !cli.no_color,
            };
            describe_class(&ctx, &class, output.as_ref())
        }
        Commands::Tree { class } => resolve_class(&classpath, &class)
            .and_then(|class| show_tree(&classpath, &config.inspect_options(), &class)),
        Commands::List { pattern } => list_classes(&classpath, pattern.as_deref(), cli.verbose),
        Commands::Init { force } => init_config(force),
    };

    if let Err(e) = result {
        eprintln!("\n{} {}", "❌".red(), e.to_string().red());
        std::process::exit(1);
    }
}
