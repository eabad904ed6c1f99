use super::{DimensionResults, NetScoreReport};
use crate::Result;
use crate::facts::github::Client;
use crate::facts::{RepoAcquirer, RepoSpec, documents};
use crate::metrics::{Dimension, MetricResult, bus_factor, correctness, license, ramp_up, responsiveness};
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "   scoring";

/// Drives one scoring run per repository: acquire, analyze the README, fan out
/// to the scorers, then combine their results into a [`NetScoreReport`].
#[derive(Debug)]
pub struct NetScorer<A> {
    acquirer: A,
    client: Client,
    work_root: PathBuf,
    scorer_timeout: Duration,
}

impl<A: RepoAcquirer> NetScorer<A> {
    /// Create a scorer.
    ///
    /// Each run clones into its own fresh directory below `work_root`. Every
    /// concurrent scorer must finish within `scorer_timeout` of the fan-out
    /// starting, otherwise its dimension is reported as unavailable.
    #[must_use]
    pub fn new(acquirer: A, client: Client, work_root: impl Into<PathBuf>, scorer_timeout: Duration) -> Self {
        Self {
            acquirer,
            client,
            work_root: work_root.into(),
            scorer_timeout,
        }
    }

    /// Score a repository, labelling the report with `input_url`.
    ///
    /// The only error is a failure to acquire the repository; in that case no
    /// scorer runs. Every other failure is confined to its own dimension.
    pub async fn score(&self, input_url: &str, spec: &RepoSpec) -> Result<NetScoreReport> {
        let start = Instant::now();

        tokio::fs::create_dir_all(&self.work_root)
            .await
            .into_app_err_with(|| format!("could not create work directory '{}'", self.work_root.display()))?;

        let work_dir = tempfile::Builder::new()
            .prefix("netscore-")
            .tempdir_in(&self.work_root)
            .into_app_err_with(|| format!("could not create a run directory in '{}'", self.work_root.display()))?;

        let result = self.score_in(input_url, spec, work_dir.path(), start).await;
        cleanup(work_dir);
        result
    }

    async fn score_in(&self, input_url: &str, spec: &RepoSpec, work_dir: &Path, start: Instant) -> Result<NetScoreReport> {
        let checkout = work_dir.join(spec.repo());

        let clone_time = self
            .acquirer
            .acquire(spec.url(), &checkout)
            .await
            .map_err(|e| e.enrich_with(|| format!("could not acquire repository '{spec}'")))?;
        log::info!(target: LOG_TARGET, "Acquired '{spec}' in {:.3}s", clone_time.as_secs_f64());

        let readme: Option<Arc<str>> = documents::read_readme(&checkout).await.map(Arc::from);
        let ramp_up = ramp_up::score(readme.as_deref());

        let bus_factor_task = {
            let client = self.client.clone();
            let spec = spec.clone();
            tokio::spawn(async move { bus_factor::score(&client, &spec).await })
        };

        let license_task = {
            let checkout = checkout.clone();
            let readme = readme.clone();
            tokio::spawn(async move { license::score(&checkout, readme.as_deref()).await })
        };

        let responsiveness_task = {
            let client = self.client.clone();
            let spec = spec.clone();
            tokio::spawn(async move { responsiveness::score(&client, &spec).await })
        };

        let correctness_task = tokio::spawn(async move { correctness::score(&checkout).await });

        let deadline = tokio::time::Instant::now() + self.scorer_timeout;
        let (bus_factor, license, responsiveness, correctness) = tokio::join!(
            settle(Dimension::BusFactor, bus_factor_task, deadline),
            settle(Dimension::License, license_task, deadline),
            settle(Dimension::Responsiveness, responsiveness_task, deadline),
            settle(Dimension::Correctness, correctness_task, deadline),
        );

        let results = DimensionResults {
            bus_factor,
            correctness,
            license,
            ramp_up,
            responsiveness,
        };

        let report = NetScoreReport::new(input_url, &results, start.elapsed());
        log::info!(target: LOG_TARGET, "NetScore for '{spec}' is {:.3}", report.net_score);
        Ok(report)
    }
}

/// Wait for one scorer task, confining a panic or an overrun to its own dimension.
async fn settle(dimension: Dimension, mut task: JoinHandle<MetricResult>, deadline: tokio::time::Instant) -> MetricResult {
    match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(Ok(result)) => {
            log::debug!(target: LOG_TARGET, "{dimension}: {result}");
            result
        }
        Ok(Err(e)) => {
            log::error!(target: LOG_TARGET, "{dimension} scorer failed: {e}");
            MetricResult::unavailable(format!("scorer failed: {e}"))
        }
        Err(_) => {
            task.abort();
            log::warn!(target: LOG_TARGET, "{dimension} scorer timed out");
            MetricResult::unavailable("scorer timed out")
        }
    }
}

fn cleanup(work_dir: TempDir) {
    let path = work_dir.path().to_path_buf();
    if let Err(e) = work_dir.close() {
        log::warn!(target: LOG_TARGET, "Could not remove work directory '{}': {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deadline_in(duration: Duration) -> tokio::time::Instant {
        tokio::time::Instant::now() + duration
    }

    #[tokio::test]
    #[expect(clippy::panic, reason = "simulating a crashing scorer")]
    async fn test_panicking_scorer_is_unavailable() {
        let task: JoinHandle<MetricResult> = tokio::spawn(async { panic!("scorer blew up") });
        let result = settle(Dimension::License, task, deadline_in(Duration::from_secs(5))).await;

        assert!(!result.is_available());
        assert!(result.to_string().contains("scorer failed"));
        assert!(result.score().abs() < f64::EPSILON);
        assert_eq!(result.latency(), Duration::ZERO);
    }

    #[tokio::test]
    #[expect(clippy::panic, reason = "simulating a crashing scorer")]
    async fn test_panic_does_not_affect_siblings() {
        let deadline = deadline_in(Duration::from_secs(5));
        let failing: JoinHandle<MetricResult> = tokio::spawn(async { panic!("scorer blew up") });
        let finishing = tokio::spawn(async { MetricResult::scored(0.75, Duration::from_millis(20)) });

        let (failed, finished) = tokio::join!(
            settle(Dimension::Correctness, failing, deadline),
            settle(Dimension::BusFactor, finishing, deadline),
        );

        assert!(!failed.is_available());
        assert_eq!(finished, MetricResult::scored(0.75, Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_overrun_is_unavailable() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            MetricResult::scored(1.0, Duration::ZERO)
        });
        let result = settle(Dimension::Responsiveness, task, deadline_in(Duration::from_millis(50))).await;

        assert!(!result.is_available());
        assert!(result.to_string().contains("timed out"));
    }
}
