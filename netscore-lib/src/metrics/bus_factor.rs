//! Contributor and activity health.

use super::MetricResult;
use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::github::{Client, Issue, IssueState, StopRule};
use serde::de::IgnoredAny;
use std::time::Instant;

const LOG_TARGET: &str = "bus_factor";

const MAX_CONTRIBUTORS: f64 = 100.0;
const MAX_WORKFLOW_RUNS: f64 = 1000.0;
const MAX_PULL_REQUESTS: f64 = 500.0;
const MAX_ISSUES: f64 = 500.0;

const CONTRIBUTORS_WEIGHT: f64 = 0.4;
const WORKFLOW_RUNS_WEIGHT: f64 = 0.2;
const PULL_REQUESTS_WEIGHT: f64 = 0.1;
const ISSUES_WEIGHT: f64 = 0.3;

/// Raw collection sizes the score is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub contributors: usize,
    pub workflow_runs: usize,
    pub pull_requests: usize,
    pub open_issues: usize,
    pub closed_issues: usize,
}

/// Each count is scaled linearly against its ceiling, weighted, and the sum capped at 1.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
pub fn compute_score(counts: &ActivityCounts) -> f64 {
    let scaled = |count: usize, ceiling: f64| (count as f64 / ceiling).min(1.0);

    let activity = scaled(counts.contributors, MAX_CONTRIBUTORS) * CONTRIBUTORS_WEIGHT;
    let ci_cd = scaled(counts.workflow_runs, MAX_WORKFLOW_RUNS) * WORKFLOW_RUNS_WEIGHT;
    let pr = scaled(counts.pull_requests, MAX_PULL_REQUESTS) * PULL_REQUESTS_WEIGHT;
    let issues = scaled(counts.open_issues + counts.closed_issues, MAX_ISSUES) * ISSUES_WEIGHT;

    (activity + ci_cd + pr + issues).min(1.0)
}

/// Fetch the four activity collections concurrently.
pub async fn fetch_counts(client: &Client, spec: &RepoSpec) -> Result<ActivityCounts> {
    let owner = spec.owner();
    let repo = spec.repo();

    let contributors_endpoint = format!("repos/{owner}/{repo}/contributors");
    let runs_endpoint = format!("repos/{owner}/{repo}/actions/runs");
    let pulls_endpoint = format!("repos/{owner}/{repo}/pulls");
    let issues_endpoint = format!("repos/{owner}/{repo}/issues");

    let (contributors, runs, pulls, issues) = tokio::join!(
        client.fetch_all::<IgnoredAny>(&contributors_endpoint, &[], StopRule::EmptyPage),
        client.fetch_all_wrapped::<IgnoredAny>(&runs_endpoint, &[], "workflow_runs", StopRule::EmptyPage),
        client.fetch_all::<IgnoredAny>(&pulls_endpoint, &[("state", "all")], StopRule::EmptyPage),
        client.fetch_all::<Issue>(&issues_endpoint, &[("state", "all")], StopRule::EmptyPage),
    );

    let issues = issues?;
    let open_issues = issues.iter().filter(|i| i.state == IssueState::Open).count();

    Ok(ActivityCounts {
        contributors: contributors?.len(),
        workflow_runs: runs?.len(),
        pull_requests: pulls?.len(),
        open_issues,
        closed_issues: issues.len() - open_issues,
    })
}

pub async fn score(client: &Client, spec: &RepoSpec) -> MetricResult {
    let start = Instant::now();

    match fetch_counts(client, spec).await {
        Ok(counts) => {
            log::debug!(target: LOG_TARGET, "Activity counts for '{spec}': {counts:?}");
            let score = compute_score(&counts);
            log::info!(target: LOG_TARGET, "Bus factor score for '{spec}' is {score:.3}");
            MetricResult::scored_since(score, start)
        }
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Bus factor unavailable for '{spec}': {e:#}");
            MetricResult::unavailable(format!("{e:#}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collections_score_zero() {
        assert!(compute_score(&ActivityCounts::default()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_above_every_ceiling_is_capped() {
        let counts = ActivityCounts {
            contributors: 150,
            workflow_runs: 2000,
            pull_requests: 600,
            open_issues: 300,
            closed_issues: 400,
        };
        assert!((compute_score(&counts) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_counts() {
        let counts = ActivityCounts {
            contributors: 50,
            workflow_runs: 500,
            pull_requests: 0,
            open_issues: 100,
            closed_issues: 150,
        };
        // 0.5 * 0.4 + 0.5 * 0.2 + 0 + 0.5 * 0.3
        assert!((compute_score(&counts) - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_open_and_closed_issues_share_a_ceiling() {
        let open_only = ActivityCounts {
            open_issues: 250,
            ..ActivityCounts::default()
        };
        let split = ActivityCounts {
            open_issues: 125,
            closed_issues: 125,
            ..ActivityCounts::default()
        };
        assert!((compute_score(&open_only) - compute_score(&split)).abs() < f64::EPSILON);
    }
}
