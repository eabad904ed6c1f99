//! Command-line interface and orchestration for netscore
//!
//! This module parses the command line, loads configuration, sets up logging,
//! and runs the requested command against a [`Host`], which stands in for the
//! process's standard streams and exit code so commands can be driven from tests.
//!
//! ## Commands
//!
//! - **score**: Resolve each input URL to a GitHub repository, score it with the
//!   [`NetScorer`](crate::scoring::NetScorer), and print one JSON report per line.
//!   URLs that cannot be scored are reported on the error stream; the command
//!   keeps going and exits with status 1 at the end.
//! - **init**: Write the default configuration file.
//!
//! Configuration is a TOML file (`netscore.toml`) holding service URLs and timeouts.
//! The GitHub token is never read from it; it comes from `--github-token` or the
//! `GITHUB_TOKEN` environment variable, and `score` refuses to start without it.

mod common;
mod config;
mod host;
mod init;
mod run;
mod score;

#[cfg(debug_assertions)]
pub use config::Config;

pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use score::{ScoreArgs, process_score, score_urls};
