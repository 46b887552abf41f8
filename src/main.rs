//! SDK Destinations CLI
//!
//! Entry point for the `sdk-dest` command-line tool.

use clap::{Parser, Subcommand};
use sdk_destinations::{
    discover_bundles, ConfigurationStore, Destination, DestinationPaths, HostFileSystem, Triple,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "sdk-dest")]
#[command(about = "Resolve and override SDK build destinations", version)]
struct Cli {
    /// Root directory holding installed SDK bundles
    #[arg(long, global = true, default_value = ".")]
    sdk_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed bundles and the targets they support
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Inspect or modify per-target overrides
    Configure {
        #[command(subcommand)]
        action: ConfigureCommands,
    },
}

#[derive(Subcommand)]
enum ConfigureCommands {
    /// Show the resolved destination for an SDK and target triple
    Show {
        /// Bundle identifier
        sdk_id: String,

        /// Target triple (e.g. x86_64-unknown-linux-gnu)
        triple: String,
    },

    /// Set override path fields for an SDK and target triple
    Set {
        /// Bundle identifier
        sdk_id: String,

        /// Target triple (e.g. x86_64-unknown-linux-gnu)
        triple: String,

        /// Override the SDK root (sysroot) path
        #[arg(long)]
        sdk_root_path: Option<String>,

        /// Override the toolchain path
        #[arg(long)]
        toolchain_path: Option<String>,

        /// Add a header search path (repeatable)
        #[arg(long)]
        include_search_path: Vec<String>,

        /// Add a library search path (repeatable)
        #[arg(long)]
        library_search_path: Vec<String>,

        /// Add a toolset descriptor path (repeatable)
        #[arg(long)]
        toolset_path: Vec<String>,
    },

    /// Remove the stored override for an SDK and target triple
    Reset {
        /// Bundle identifier
        sdk_id: String,

        /// Target triple (e.g. x86_64-unknown-linux-gnu)
        triple: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { json } => run_list(&cli.sdk_root, json),
        Commands::Configure { action } => match action {
            ConfigureCommands::Show { sdk_id, triple } => {
                run_show(&cli.sdk_root, &sdk_id, &triple);
            }
            ConfigureCommands::Set {
                sdk_id,
                triple,
                sdk_root_path,
                toolchain_path,
                include_search_path,
                library_search_path,
                toolset_path,
            } => {
                let paths = DestinationPaths {
                    sdk_root_path,
                    toolchain_path,
                    include_search_paths: non_empty(include_search_path),
                    library_search_paths: non_empty(library_search_path),
                    toolset_paths: non_empty(toolset_path),
                };
                run_set(&cli.sdk_root, &sdk_id, &triple, paths);
            }
            ConfigureCommands::Reset { sdk_id, triple } => {
                run_reset(&cli.sdk_root, &sdk_id, &triple);
            }
        },
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

fn open_store(sdk_root: &Path) -> ConfigurationStore<HostFileSystem> {
    match ConfigurationStore::new(Triple::host(), sdk_root, HostFileSystem) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening configuration store: {}", e);
            process::exit(1);
        }
    }
}

fn parse_triple(s: &str) -> Triple {
    match Triple::parse(s) {
        Ok(triple) => triple,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_list(sdk_root: &Path, json: bool) {
    let bundles = match discover_bundles(sdk_root, &HostFileSystem) {
        Ok(bundles) => bundles,
        Err(e) => {
            eprintln!("Error scanning {}: {}", sdk_root.display(), e);
            process::exit(1);
        }
    };

    if json {
        let entries: Vec<serde_json::Value> = bundles
            .iter()
            .map(|b| {
                serde_json::json!({
                    "identifier": b.identifier(),
                    "path": b.path().display().to_string(),
                    "targets": b.target_triples().map(|t| t.to_string()).collect::<Vec<_>>(),
                })
            })
            .collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else if bundles.is_empty() {
        println!("No bundles installed under {}", sdk_root.display());
    } else {
        for bundle in &bundles {
            println!("{} ({})", bundle.identifier(), bundle.path().display());
            for triple in bundle.target_triples() {
                println!("  {}", triple);
            }
        }
    }
}

fn run_show(sdk_root: &Path, sdk_id: &str, triple: &str) {
    let store = open_store(sdk_root);
    let triple = parse_triple(triple);

    match store.read_configuration(sdk_id, &triple) {
        Ok(Some(destination)) => match serde_json::to_string_pretty(&destination) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        },
        Ok(None) => {
            eprintln!("No installed bundle provides {} for {}", sdk_id, triple);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error reading configuration: {}", e);
            process::exit(1);
        }
    }
}

fn run_set(sdk_root: &Path, sdk_id: &str, triple: &str, paths: DestinationPaths) {
    if paths.is_empty() {
        eprintln!("Error: no override fields given; nothing to set");
        process::exit(1);
    }

    let store = open_store(sdk_root);
    let triple = parse_triple(triple);
    let destination = Destination::new(triple.clone(), paths);

    match store.update_configuration(sdk_id, &destination) {
        Ok(()) => println!("Updated override for {} ({})", sdk_id, triple),
        Err(e) => {
            eprintln!("Error writing configuration: {}", e);
            process::exit(1);
        }
    }
}

fn run_reset(sdk_root: &Path, sdk_id: &str, triple: &str) {
    let store = open_store(sdk_root);
    let triple = parse_triple(triple);

    match store.reset_configuration(sdk_id, &triple) {
        Ok(true) => println!("Removed override for {} ({})", sdk_id, triple),
        Ok(false) => println!("No override stored for {} ({})", sdk_id, triple),
        Err(e) => {
            eprintln!("Error resetting configuration: {}", e);
            process::exit(1);
        }
    }
}
