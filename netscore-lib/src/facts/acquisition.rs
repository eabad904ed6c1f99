//! Obtaining a local working copy of a repository.

use super::git;
use crate::Result;
use core::time::Duration;
use std::path::Path;
use std::time::Instant;
use url::Url;

const LOG_TARGET: &str = "   acquire";

/// Produces a local working copy of a remote repository.
pub trait RepoAcquirer: Send + Sync {
    /// Populate `dest` with a copy of the repository at `url`, returning how long it took.
    ///
    /// Anything already present at `dest` is destroyed. On error the contents of
    /// `dest` are unspecified and must not be used.
    fn acquire(&self, url: &Url, dest: &Path) -> impl Future<Output = Result<Duration>> + Send;
}

/// Acquires repositories with a shallow `git clone`.
#[derive(Debug, Clone)]
pub struct GitAcquirer {
    clone_timeout: Duration,
}

impl GitAcquirer {
    #[must_use]
    pub const fn new(clone_timeout: Duration) -> Self {
        Self { clone_timeout }
    }
}

impl RepoAcquirer for GitAcquirer {
    async fn acquire(&self, url: &Url, dest: &Path) -> Result<Duration> {
        let start = Instant::now();
        git::clone_fresh(url, dest, self.clone_timeout).await?;

        let elapsed = start.elapsed();
        log::debug!(target: LOG_TARGET, "Cloned '{url}' in {:.3}s", elapsed.as_secs_f64());
        Ok(elapsed)
    }
}
