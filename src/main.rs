//! anchorgen CLI entry point

use clap::Parser;
use env_logger::Env;
use log::info;

use anchorgen::cli::{commands, Cli, Commands};
use anchorgen::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Some(command) => handle_command(command),
        None => {
            println!("anchorgen v{}", env!("CARGO_PKG_VERSION"));
            println!("Degraded anchor synthesis for source separation listening tests");
            println!();
            println!("Use --help to see available commands");
            Ok(())
        }
    }
}

fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            target,
            others,
            distorted_target,
            artefacts,
            interference,
            overall_quality,
            target_sound_quality,
            all,
            output_dir,
            num_points,
            window,
            relative_loudness,
            seed,
            bit_depth,
            report,
        } => {
            info!("anchorgen v{}", env!("CARGO_PKG_VERSION"));
            commands::generate(&commands::GenerateOptions {
                target,
                others,
                distorted_target,
                artefacts,
                interference,
                overall_quality,
                target_sound_quality,
                all,
                output_dir,
                num_points,
                window,
                relative_loudness,
                seed,
                bit_depth,
                report,
            })
        }
        Commands::Analyze { path } => commands::analyze(&path),
    }
}
