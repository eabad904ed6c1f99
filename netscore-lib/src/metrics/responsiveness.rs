//! How quickly maintainers close issues and pull requests.

use super::MetricResult;
use crate::Result;
use crate::facts::RepoSpec;
use crate::facts::github::{Client, Issue, PullRequest, StopRule};
use chrono::{DateTime, Utc};
use std::time::Instant;

const LOG_TARGET: &str = "responsive";

/// Turnaround at or beyond which a repository scores 0; also the stand-in for an empty collection.
pub const CEILING_HOURS: f64 = 168.0;

/// Hours between creation and closing for every item that has both timestamps.
#[expect(clippy::cast_precision_loss, reason = "second counts are far below 2^52")]
fn turnaround_hours(items: impl IntoIterator<Item = (DateTime<Utc>, Option<DateTime<Utc>>)>) -> Vec<f64> {
    items
        .into_iter()
        .filter_map(|(created, closed)| closed.map(|closed| (closed - created).num_seconds() as f64 / 3600.0))
        .collect()
}

#[expect(clippy::cast_precision_loss, reason = "collection sizes are far below 2^52")]
fn average_or_ceiling(hours: &[f64]) -> f64 {
    if hours.is_empty() {
        CEILING_HOURS
    } else {
        hours.iter().sum::<f64>() / hours.len() as f64
    }
}

/// Normalize issue and pull request turnaround into a score rounded to two decimals.
#[must_use]
pub fn compute_score(issue_hours: &[f64], pr_hours: &[f64]) -> f64 {
    let avg = f64::midpoint(average_or_ceiling(issue_hours), average_or_ceiling(pr_hours));
    let score = 1.0 - (avg / CEILING_HOURS).min(1.0);
    (score * 100.0).round() / 100.0
}

/// Fetch closed issues and closed pull requests, returning their turnaround hours.
pub async fn fetch_turnaround(client: &Client, spec: &RepoSpec) -> Result<(Vec<f64>, Vec<f64>)> {
    let issues_endpoint = format!("repos/{}/{}/issues", spec.owner(), spec.repo());
    let pulls_endpoint = format!("repos/{}/{}/pulls", spec.owner(), spec.repo());
    let query = [("state", "closed")];

    let (issues, pulls) = tokio::join!(
        client.fetch_all::<Issue>(&issues_endpoint, &query, StopRule::ShortPage),
        client.fetch_all::<PullRequest>(&pulls_endpoint, &query, StopRule::ShortPage),
    );

    // the issues endpoint lists pull requests too
    let issue_hours = turnaround_hours(
        issues?
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .map(|issue| (issue.created_at, issue.closed_at)),
    );
    let pr_hours = turnaround_hours(pulls?.into_iter().map(|pr| (pr.created_at, pr.closed_at)));

    Ok((issue_hours, pr_hours))
}

pub async fn score(client: &Client, spec: &RepoSpec) -> MetricResult {
    let start = Instant::now();

    match fetch_turnaround(client, spec).await {
        Ok((issue_hours, pr_hours)) => {
            log::debug!(
                target: LOG_TARGET,
                "'{spec}' has {} closed issues and {} closed pull requests",
                issue_hours.len(),
                pr_hours.len()
            );
            let score = compute_score(&issue_hours, &pr_hours);
            log::info!(target: LOG_TARGET, "Responsiveness score for '{spec}' is {score:.2}");
            MetricResult::scored_since(score, start)
        }
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Responsiveness unavailable for '{spec}': {e:#}");
            MetricResult::unavailable(format!("{e:#}"))
        }
    }
}
