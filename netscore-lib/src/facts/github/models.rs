//! Minimal GitHub payloads with only the fields the scorers read.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// An entry from the issues endpoint, which also lists pull requests.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub state: IssueState,
    pub pull_request: Option<PullRequestMarker>,
}

impl Issue {
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Present on issue payloads that are really pull requests.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestMarker {
    pub merged_at: Option<DateTime<Utc>>,
}

/// An entry from the pulls endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}
