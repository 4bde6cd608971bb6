//! Geoscape equipment - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geoscape_tools::error::Result;
use geoscape_tools::{inspect, simulate, validate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "geoscape-tools")]
#[command(about = "Development tools for the geoscape equipment engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files
    Validate {
        /// Path to a data file or directory
        #[arg(default_value = "assets/data")]
        path: PathBuf,
    },
    /// Run an equipment plan hour by hour
    Simulate {
        /// Simulation plan (RON)
        plan: PathBuf,
        /// Path to a data file or directory
        #[arg(long, default_value = "assets/data")]
        data: PathBuf,
        /// Override the plan's number of hours
        #[arg(long)]
        hours: Option<u32>,
        /// Write the final state to a save file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print the slots stored in a save file
    Inspect {
        /// Save file
        save: PathBuf,
    },
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {}", path.display());
            let report = validate::validate_data_directory(&path)?;
            tracing::info!(
                files = report.files.len(),
                items = report.items,
                aircraft_classes = report.aircraft_classes,
                "Validation passed"
            );
            for id in &report.not_installable {
                tracing::info!(item = %id, "Item can never be installed");
            }
        }
        Commands::Simulate {
            plan,
            data,
            hours,
            save,
        } => {
            let catalog = validate::load_catalog(&data)?;
            let mut plan = simulate::SimulationPlan::load(&plan)?;
            if let Some(hours) = hours {
                plan.hours = hours;
            }
            let report = simulate::run_simulation(catalog, &plan)?;
            for timed in &report.notices {
                println!("[hour {:>4}] {}", timed.hour, timed.notice);
            }
            for (id, stats) in &report.aircraft {
                println!("aircraft #{}: {:?}", id.0, stats.0);
            }
            println!("base can shoot: {}", report.base_can_shoot);
            if let Some(path) = save {
                inspect::write_save(&path, &report.campaign)?;
            }
        }
        Commands::Inspect { save } => {
            let record = inspect::read_save(&save)?;
            print!("{}", inspect::render(&record));
        }
    }
    Ok(())
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
