//! Command dispatch logic for netscore

use super::{InitArgs, ScoreArgs, init_config, process_score};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "netscore", version, author, long_about = None)]
#[command(about = "Score the quality of open-source package repositories")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: NetscoreSubcommand,
}

#[derive(Subcommand, Debug)]
enum NetscoreSubcommand {
    /// Score repositories and print one JSON report per line
    Score(Box<ScoreArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        NetscoreSubcommand::Score(score_args) => process_score(host, score_args).await,
        NetscoreSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
