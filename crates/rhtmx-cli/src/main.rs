mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rhtmx_theme::ThemeSettings;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "rhtmx")]
#[command(version, about = "RHTMX CLI - theme management", long_about = None)]
struct Cli {
    /// Project configuration file
    #[arg(short, long, global = true, default_value = "rhtmx.toml")]
    config: PathBuf,

    /// Show debug output (candidate paths, mirrored files)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Installs themes assets into the web directory
    #[command(name = "assets:themes-install")]
    ThemesInstall(InstallArgs),

    /// Theme management commands
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
}

#[derive(clap::Args)]
#[command(after_help = "A \"themes\" directory is created inside the target directory and the \
\"<theme>/public\" directory of each theme is copied into it.\n\n\
With --symlink each theme is linked instead, falling back to a hard copy \
when symbolic links aren't possible.")]
struct InstallArgs {
    /// The target directory
    #[arg(default_value = "web")]
    target: String,

    /// Symlinks the assets instead of copying them
    #[arg(long)]
    symlink: bool,
}

#[derive(Subcommand)]
enum ThemeCommands {
    /// Install theme assets (same as assets:themes-install)
    Install(InstallArgs),

    /// List available themes
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a template through the active theme
    Locate {
        /// Template path relative to Resources/views/
        template: String,

        /// Override directory checked before bundle resources
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print every match instead of the first one
        #[arg(short, long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let settings = ThemeSettings::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    // Execute command
    match cli.command {
        Commands::ThemesInstall(args) => {
            commands::theme::install(&settings, &args.target, args.symlink)?;
        }
        Commands::Theme { command } => match command {
            ThemeCommands::Install(args) => {
                commands::theme::install(&settings, &args.target, args.symlink)?;
            }
            ThemeCommands::List { json } => {
                commands::theme::list(&settings, json)?;
            }
            ThemeCommands::Locate { template, dir, all } => {
                commands::theme::locate(&settings, &template, dir.as_deref(), all)?;
            }
        },
    }

    Ok(())
}
