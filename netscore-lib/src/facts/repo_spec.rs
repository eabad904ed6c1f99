use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use std::sync::Arc;
use url::Url;

const GITHUB_HOST: &str = "github.com";

/// A GitHub repository, reduced to its owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    url: Arc<Url>,
    owner: Arc<str>,
    repo: Arc<str>,
}

impl RepoSpec {
    /// Parse a GitHub repository URL such as `https://github.com/owner/repo(.git)`.
    ///
    /// Any trailing path (`/tree/main/...`) is dropped.
    pub fn parse(url: &Url) -> Result<Self> {
        let host = url.host_str().unwrap_or_default();
        if !host.eq_ignore_ascii_case(GITHUB_HOST) {
            bail!("not a GitHub repository URL: {url}");
        }

        let path_segments: Vec<_> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let [owner, repo, ..] = path_segments.as_slice() else {
            bail!("invalid repository URL format: {url}");
        };

        let repo = repo.trim_end_matches(".git");
        if repo.is_empty() {
            bail!("invalid repository URL: empty repository name: {url}");
        }

        let clean_url = Url::parse(&format!("https://{GITHUB_HOST}/{owner}/{repo}")).into_app_err("reconstructing repository URL")?;

        Ok(Self {
            url: Arc::new(clean_url),
            owner: Arc::from(*owner),
            repo: Arc::from(repo),
        })
    }

    /// Parse a repository URL given as text.
    pub fn parse_str(url: &str) -> Result<Self> {
        let url = Url::parse(url.trim()).into_app_err_with(|| format!("invalid URL '{url}'"))?;
        Self::parse(&url)
    }

    /// The canonical `https://github.com/owner/repo` URL, suitable for cloning.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
