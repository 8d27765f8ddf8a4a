//! Quarterwave command-line interface.
//!
//! Compute Bragg mirror spectra from TOML job files:
//! ```sh
//! quarterwave-cli run mirror.toml
//! quarterwave-cli validate mirror.toml
//! quarterwave-cli materials
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quarterwave_materials::MaterialProvider;

#[derive(Parser)]
#[command(name = "quarterwave-cli")]
#[command(about = "Quarterwave: normal-incidence reflectance of quarter-wave Bragg stacks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a spectrum from a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a job file without computing the spectrum.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List the built-in material presets.
    Materials,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Quarterwave Bragg Stack Solver");
            println!("==============================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let run = runner::run_job(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_spectra {
                runner::write_spectrum_csv(&run, &out_dir.join("spectrum.csv"))?;
            }
            if job.output.save_json {
                runner::write_spectrum_json(&run, &out_dir.join("spectrum.json"))?;
            }

            println!("Computation complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let stack = job.to_stack_config()?;
            println!("Configuration is valid: {}", config.display());
            println!(
                "  {} layers, {} samples over [{:.1}, {:.1}] nm",
                stack.layer_count(),
                stack.sample_count(),
                stack.scan_range.begin_nm,
                stack.scan_range.end_nm
            );
            Ok(())
        }
        Commands::Materials => {
            println!("Available materials (constant real index, visible range):");
            println!();
            for m in quarterwave_materials::catalogue() {
                println!("    {:<10} n = {:<9} {}", m.name(), m.refractive_index(), m.description());
            }
            println!();
            println!("Any index may also be given as a number in the job file.");
            println!("Refractive index database: https://refractiveindex.info");
            Ok(())
        }
    }
}
