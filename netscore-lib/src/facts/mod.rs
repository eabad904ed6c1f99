//! Data gathering for repository scoring
//!
//! This module is responsible for everything the scorers need to know about a
//! repository before any judgement is made: where it lives, a local working copy
//! of it, the well-known documents inside it, and access to the GitHub REST API.
//!
//! # Implementation Model
//!
//! - [`PackageResolver`] turns an input URL (GitHub or npm) into a [`RepoSpec`].
//! - [`RepoAcquirer`] produces a working copy; [`GitAcquirer`] does so with a shallow
//!   `git clone` into a directory it empties first.
//! - [`documents`] finds README and LICENSE files by an ordered list of names.
//! - [`readme`] parses Markdown into a node tree and derives [`ReadmeMetrics`].
//! - [`github`] holds the authenticated client and its paginated fetcher.

pub mod acquisition;
pub mod documents;
mod git;
pub mod github;
pub mod package_url;
pub mod readme;
mod repo_spec;

pub use acquisition::{GitAcquirer, RepoAcquirer};
pub use package_url::PackageResolver;
pub use readme::ReadmeMetrics;
pub use repo_spec::RepoSpec;
