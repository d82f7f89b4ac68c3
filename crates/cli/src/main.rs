mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// artcfg - compose ART build-module properties from knobs
#[derive(Parser)]
#[command(name = "artcfg")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Arguments shared by every command that reads a build file.
#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Path to the build file
  #[arg(default_value = "art.json")]
  pub file: PathBuf,

  /// Print machine-readable JSON
  #[arg(long)]
  pub json: bool,

  /// Set a knob, overriding the build file and the environment
  #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = parse_env_override)]
  pub env: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
  /// Compose every module and record installed tests
  Compose {
    #[command(flatten)]
    build: BuildArgs,

    /// Maximum number of modules composed in parallel
    #[arg(short, long)]
    jobs: Option<usize>,
  },

  /// Show the selected codegen architectures
  Arches {
    #[command(flatten)]
    build: BuildArgs,
  },

  /// Show every recognised knob with its resolved value
  Knobs {
    #[command(flatten)]
    build: BuildArgs,
  },
}

fn parse_env_override(raw: &str) -> Result<(String, String), String> {
  match raw.split_once('=') {
    Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
    _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "info" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Compose { build, jobs } => cmd::cmd_compose(&build, jobs, cli.verbose),
    Commands::Arches { build } => cmd::cmd_arches(&build),
    Commands::Knobs { build } => cmd::cmd_knobs(&build),
  }
}
