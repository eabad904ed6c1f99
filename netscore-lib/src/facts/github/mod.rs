//! GitHub REST API access.
//!
//! The [`Client`] is built once from a [`ClientConfig`] and shared by every
//! network-backed scorer. All collection endpoints are drained through the
//! paginated fetcher, which requests pages of [`PAGE_SIZE`] records until the
//! source reports there is nothing left.

mod client;
mod models;

pub use client::{Client, ClientConfig, GITHUB_API_URL, PAGE_SIZE, StopRule};
pub use models::{Issue, IssueState, PullRequest, PullRequestMarker};
