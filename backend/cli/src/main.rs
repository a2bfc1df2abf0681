mod check_cmd;
mod emit_cmd;
mod init_cmd;
mod terminal_output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sysaudit_config::{config_dir, config_file_path};

#[derive(Parser)]
#[command(name = "sysaudit")]
#[command(about = "sysaudit: inspect configuration and exercise audit hooks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file and print errors and warnings
    Check {
        /// Config file (defaults to ~/.sysaudit/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Report one event through an auditor with event logging enabled
    Emit {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Event name, e.g. "os.remove"
        event: String,
        /// Event arguments; numbers and true/false/none are typed
        args: Vec<String>,
    },
    /// Write a config file with every default spelled out
    Init {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn resolve(config: Option<PathBuf>) -> PathBuf {
    config.unwrap_or_else(|| config_file_path(&config_dir()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => check_cmd::run(&resolve(config)),
        Commands::Emit {
            config,
            event,
            args,
        } => emit_cmd::run(&resolve(config), &event, &args),
        Commands::Init { config, force } => init_cmd::run(&resolve(config), force),
    }
}
