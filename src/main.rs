//! Gateway configuration generator CLI.
//!
//! ```text
//! blueprint.toml ──▶ load + validate ──▶ build App ──▶ generate ──▶ krakend.json
//!                         ▲                                  │
//!                         └──────── --watch (notify) ◀───────┘
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use gateway_config::config::watcher::BlueprintWatcher;
use gateway_config::config::{build_app, load_app, load_blueprint};
use gateway_config::observability::logging::init_logging;
use gateway_config::App;

#[derive(Parser)]
#[command(name = "gateway-config")]
#[command(about = "Generate API gateway configuration documents", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is unset.
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a blueprint and write the gateway document
    Generate {
        #[arg(short, long)]
        blueprint: PathBuf,

        #[arg(short, long, default_value = "krakend.json")]
        output: PathBuf,

        /// Regenerate whenever the blueprint changes
        #[arg(short, long)]
        watch: bool,
    },
    /// Validate a blueprint without writing anything
    Check {
        #[arg(short, long)]
        blueprint: PathBuf,
    },
    /// Write the default gateway document with no endpoints
    Defaults {
        #[arg(short, long, default_value = "krakend.json")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Generate {
            blueprint,
            output,
            watch,
        } => {
            load_app(&blueprint)?.generate(&output)?;
            if watch {
                watch_and_regenerate(&blueprint, &output)?;
            }
        }
        Commands::Check { blueprint } => {
            let loaded = load_blueprint(&blueprint)?;
            let app = build_app(&loaded)?;
            println!(
                "{}: {} endpoint(s) OK",
                blueprint.display(),
                app.endpoints().len()
            );
        }
        Commands::Defaults { output } => {
            App::default_gateway().generate(&output)?;
        }
    }

    Ok(())
}

fn watch_and_regenerate(blueprint: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (watcher, updates) = BlueprintWatcher::new(blueprint);
    let _handle = watcher.run()?;

    for loaded in updates {
        if let Err(e) = build_app(&loaded).and_then(|app| app.generate(output)) {
            tracing::error!("Regeneration failed: {}", e);
        }
    }

    Ok(())
}
