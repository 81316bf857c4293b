#[cfg(target_os = "macos")]
mod app;
mod core;
#[cfg(target_os = "macos")]
mod macos;
mod platform;
mod prefs;

use anyhow::Result;
use argh::FromArgs;
#[cfg(target_os = "macos")]
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tansu - macOS menu bar utilities
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Tile(TileCmd),
    Scroll(ScrollCmd),
    Keys(KeysCmd),
    Version(VersionCmd),
}

/// Run the window tiler
#[derive(FromArgs)]
#[argh(subcommand, name = "tile")]
struct TileCmd {}

/// Run the scroll reverser
#[derive(FromArgs)]
#[argh(subcommand, name = "scroll")]
struct ScrollCmd {}

/// Run the key remapper
#[derive(FromArgs)]
#[argh(subcommand, name = "keys")]
struct KeysCmd {}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            // No subcommand - show help (simulate --help)
            let args: Vec<&str> = vec!["tansu", "--help"];
            match Cli::from_args(&args[..1], &args[1..]) {
                Ok(_) => {}
                Err(e) => {
                    println!("{}", e.output);
                }
            }
            Ok(())
        }
        Some(SubCommand::Version(_)) => {
            println!("tansu {}", VERSION);
            Ok(())
        }
        Some(subcmd) => run_utility(subcmd),
    }
}

#[cfg(target_os = "macos")]
fn run_utility(subcmd: SubCommand) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match subcmd {
        SubCommand::Tile(_) => {
            tracing::info!("tansu tile starting");
            app::run_tile()
        }
        SubCommand::Scroll(_) => {
            tracing::info!("tansu scroll starting");
            app::run_scroll()
        }
        SubCommand::Keys(_) => {
            tracing::info!("tansu keys starting");
            app::run_keys()
        }
        SubCommand::Version(_) => Ok(()),
    }
}

#[cfg(not(target_os = "macos"))]
fn run_utility(_subcmd: SubCommand) -> Result<()> {
    anyhow::bail!("tansu only runs on macOS")
}
