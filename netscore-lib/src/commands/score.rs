use super::Host;
use super::common::{LoggingArgs, init_logging};
use super::config::Config;
use crate::Result;
use crate::facts::github::{Client, ClientConfig};
use crate::facts::{GitAcquirer, PackageResolver, RepoAcquirer};
use crate::reports::generate_ndjson;
use crate::scoring::NetScorer;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use directories::BaseDirs;
use ohno::{IntoAppError, app_err, bail};
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "     score";

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// File holding the URLs to score, one per line
    #[arg(value_name = "URL_FILE")]
    pub url_file: Option<Utf8PathBuf>,

    /// A GitHub repository or npm package URL to score (may be repeated)
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `netscore.toml` in the current directory)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory under which repositories are cloned while they are scored
    #[arg(long, value_name = "PATH")]
    pub work_dir: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Collect the URLs to score: the file's non-blank lines first, then `--url` values.
fn collect_urls(args: &ScoreArgs) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    if let Some(path) = &args.url_file {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading URL file '{path}'"))?;
        urls.extend(text.lines().map(str::trim).filter(|line| !line.is_empty()).map(String::from));
    }

    urls.extend(args.urls.iter().map(|u| u.trim().to_string()).filter(|u| !u.is_empty()));

    if urls.is_empty() {
        bail!("no URLs to score; pass a URL file or use --url");
    }

    Ok(urls)
}

fn work_root(args: &ScoreArgs) -> Result<Utf8PathBuf> {
    if let Some(dir) = &args.work_dir {
        return Ok(dir.clone());
    }

    let cache_dir = BaseDirs::new()
        .into_app_err("could not determine cache directory")?
        .cache_dir()
        .join("netscore")
        .join("work");

    Utf8PathBuf::try_from(cache_dir).into_app_err("cache directory path is not valid UTF-8")
}

pub async fn process_score<H: Host>(host: &mut H, args: &ScoreArgs) -> Result<()> {
    init_logging(&args.logging)?;

    // refuse to do anything without a credential
    let client_config = match ClientConfig::new(args.github_token.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            let _ = writeln!(host.error(), "{e}");
            host.exit(1);
            return Err(e);
        }
    };

    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let urls = collect_urls(args)?;

    let client_config = client_config
        .with_base_url(config.github_api_url.as_str())
        .with_request_timeout(config.request_timeout);
    let client = Client::new(&client_config)?;
    let resolver = PackageResolver::new(&config.npm_registry_url, config.request_timeout)?;
    let acquirer = GitAcquirer::new(config.clone_timeout);
    let scorer = NetScorer::new(acquirer, client, work_root(args)?, config.scorer_timeout);

    score_urls(host, &resolver, &scorer, &urls).await
}

/// Score every URL in order, writing one NDJSON line per success.
///
/// Failures are reported on the error stream and do not stop later URLs.
pub async fn score_urls<H: Host, A: RepoAcquirer>(
    host: &mut H,
    resolver: &PackageResolver,
    scorer: &NetScorer<A>,
    urls: &[String],
) -> Result<()> {
    let mut failures = 0_usize;

    for url in urls {
        log::info!(target: LOG_TARGET, "Scoring '{url}'");

        let outcome = match resolver.resolve(url).await {
            Ok(spec) => scorer.score(url, &spec).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(report) => {
                let mut line = String::new();
                generate_ndjson(core::slice::from_ref(&report), &mut line)?;
                let _ = write!(host.output(), "{line}");
            }
            Err(e) => {
                failures += 1;
                log::error!(target: LOG_TARGET, "Could not score '{url}': {e:#}");
                let _ = writeln!(host.error(), "Could not score '{url}': {e:#}");
            }
        }
    }

    if failures > 0 {
        let e = app_err!("{failures} of {} URL(s) could not be scored", urls.len());
        let _ = writeln!(host.error(), "{e}");
        host.exit(1);
        return Err(e);
    }

    Ok(())
}
