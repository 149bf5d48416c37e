//! chordz - generate chord progressions as MIDI files
//!
//! Subcommands:
//! - `chordz generate` - Generate a progression and write a `.mid` file
//! - `chordz list` - Show the scale, genre, chord and rhythm tables
//! - `chordz config` - Print the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use chordz_cli::commands::{self, GenerateArgs};
use chordz_cli::ChordzConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chordz")]
#[command(about = "Genre-conditioned chord progression generator")]
#[command(version)]
struct Cli {
    /// Config file, used in place of ./chordz.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a progression and write it as a MIDI file
    Generate(GenerateArgs),

    /// List scales, genres, chord types, voicings, densities and rhythms
    List,

    /// Print the effective configuration and where it came from
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = ChordzConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.output.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => {
            let outcome = commands::generate(&config, &args)?;
            if args.json {
                println!("{}", commands::render_json(&outcome)?);
            } else {
                print!("{}", commands::render_outcome(&outcome));
            }
        }
        Commands::List => {
            print!("{}", commands::list());
        }
        Commands::Config => {
            print!("{}", commands::show_config(&config, &sources));
        }
    }

    Ok(())
}
