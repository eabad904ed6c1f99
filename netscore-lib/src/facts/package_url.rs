//! Resolution of package URLs to the GitHub repository that hosts them.
//!
//! Two input forms are accepted: a GitHub repository URL, used as is, and an npm
//! package page URL (`https://www.npmjs.com/package/<name>`), which is looked up in
//! the npm registry to find the package's `repository` field.

use super::RepoSpec;
use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use url::Url;

const LOG_TARGET: &str = "   package";

pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

static NPM_PACKAGE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/package/(@[^/]+/[^/]+|[^/]+)/?$").expect("invalid regex"));

static SSH_GITHUB_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:ssh://git@|git@)(github\.com)[:/](.+?)(?:\.git)?$").expect("invalid regex"));

/// What an input URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageUrl {
    GitHub(RepoSpec),
    Npm(String),
}

impl PackageUrl {
    /// Classify an input URL without touching the network.
    pub fn classify(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim()).into_app_err_with(|| format!("invalid URL '{input}'"))?;

        match url.host_str() {
            Some(host) if host.eq_ignore_ascii_case("github.com") => Ok(Self::GitHub(RepoSpec::parse(&url)?)),
            Some(host) if host.eq_ignore_ascii_case("www.npmjs.com") || host.eq_ignore_ascii_case("npmjs.com") => {
                let Some(name) = NPM_PACKAGE_PATH.captures(url.path()).and_then(|c| c.get(1)) else {
                    bail!("invalid npm package URL '{url}'");
                };
                Ok(Self::Npm(name.as_str().to_string()))
            }
            _ => bail!("unsupported package URL '{url}'; expected a GitHub repository or an npm package"),
        }
    }
}

/// Normalize a `repository` URL as found in npm package metadata.
///
/// Strips a `git+` prefix, rewrites SSH forms pointing at GitHub to HTTPS, and
/// drops a trailing `.git`.
#[must_use]
pub fn clean_repository_url(raw: &str) -> String {
    let mut cleaned = raw.trim().strip_prefix("git+").unwrap_or_else(|| raw.trim()).to_string();

    if let Some(caps) = SSH_GITHUB_URL.captures(&cleaned) {
        cleaned = format!("https://{}/{}", &caps[1], &caps[2]);
    }

    if let Some(stripped) = cleaned.strip_suffix(".git") {
        cleaned = stripped.to_string();
    }

    cleaned
}

#[derive(Debug, Deserialize)]
struct PackageDocument {
    repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Repository {
    Url(String),
    Object { url: Option<String> },
}

impl Repository {
    fn into_url(self) -> Option<String> {
        match self {
            Self::Url(url) => Some(url),
            Self::Object { url } => url,
        }
    }
}

/// Turns input URLs into GitHub repositories, consulting the npm registry when needed.
#[derive(Debug, Clone)]
pub struct PackageResolver {
    client: reqwest::Client,
    registry_url: Arc<str>,
}

impl PackageResolver {
    pub fn new(registry_url: &str, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("netscore")
            .timeout(request_timeout)
            .build()
            .into_app_err("could not create HTTP client")?;

        Ok(Self {
            client,
            registry_url: Arc::from(registry_url),
        })
    }

    /// Resolve an input URL to the GitHub repository it refers to.
    pub async fn resolve(&self, input: &str) -> Result<RepoSpec> {
        match PackageUrl::classify(input)? {
            PackageUrl::GitHub(spec) => Ok(spec),
            PackageUrl::Npm(name) => {
                let raw = self.fetch_repository_url(&name).await?;
                let cleaned = clean_repository_url(&raw);
                log::debug!(target: LOG_TARGET, "npm package '{name}' lives at '{cleaned}'");

                RepoSpec::parse_str(&cleaned).into_app_err_with(|| format!("npm package '{name}' is not hosted on GitHub"))
            }
        }
    }

    fn package_document_url(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.registry_url).into_app_err_with(|| format!("invalid npm registry URL '{}'", self.registry_url))?;

        {
            let Ok(mut segments) = url.path_segments_mut() else {
                bail!("invalid npm registry URL '{}'", self.registry_url);
            };
            // scoped names are a single path segment with the slash encoded
            let _ = segments.pop_if_empty().push(name);
        }

        Ok(url)
    }

    async fn fetch_repository_url(&self, name: &str) -> Result<String> {
        let url = self.package_document_url(name)?;
        log::info!(target: LOG_TARGET, "Looking up npm package '{name}'");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .into_app_err_with(|| format!("sending HTTP request to {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("unexpected HTTP status {status} fetching npm package '{name}'");
        }

        let doc: PackageDocument = resp
            .json()
            .await
            .into_app_err_with(|| format!("malformed package metadata for '{name}'"))?;

        doc.repository
            .and_then(Repository::into_url)
            .into_app_err_with(|| format!("npm package '{name}' has no repository information"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_classify_github() {
        let expected = RepoSpec::parse_str("https://github.com/cloudinary/cloudinary_npm").unwrap();
        assert_eq!(
            PackageUrl::classify("https://github.com/cloudinary/cloudinary_npm/tree/master").unwrap(),
            PackageUrl::GitHub(expected)
        );
    }

    #[test]
    fn test_classify_npm() {
        assert_eq!(
            PackageUrl::classify("https://www.npmjs.com/package/express").unwrap(),
            PackageUrl::Npm("express".to_string())
        );
        assert_eq!(
            PackageUrl::classify("https://www.npmjs.com/package/@babel/core").unwrap(),
            PackageUrl::Npm("@babel/core".to_string())
        );
    }

    #[test]
    fn test_classify_rejects_other_hosts() {
        let _ = PackageUrl::classify("https://gitlab.com/owner/repo").unwrap_err();
        let _ = PackageUrl::classify("https://www.npmjs.com/search?q=foo").unwrap_err();
        let _ = PackageUrl::classify("not a url").unwrap_err();
    }

    #[test]
    fn test_clean_repository_url() {
        assert_eq!(
            clean_repository_url("git+https://github.com/expressjs/express.git"),
            "https://github.com/expressjs/express"
        );
        assert_eq!(
            clean_repository_url("git@github.com:lodash/lodash.git"),
            "https://github.com/lodash/lodash"
        );
        assert_eq!(
            clean_repository_url("git+ssh://git@github.com/browserify/browserify.git"),
            "https://github.com/browserify/browserify"
        );
        assert_eq!(clean_repository_url("https://github.com/nodejs/node"), "https://github.com/nodejs/node");
        assert_eq!(
            clean_repository_url("git+https://gitlab.com/owner/repo.git"),
            "https://gitlab.com/owner/repo"
        );
    }

    #[test]
    fn test_scoped_package_document_url() {
        let resolver = PackageResolver::new("https://registry.npmjs.org/", Duration::from_secs(5)).unwrap();
        let url = resolver.package_document_url("@babel/core").unwrap();
        assert_eq!(url.as_str(), "https://registry.npmjs.org/@babel%2Fcore");
    }

    #[tokio::test]
    async fn test_resolve_npm_string_repository() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/browserify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "browserify",
                "repository": "git+ssh://git@github.com/browserify/browserify.git"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = PackageResolver::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let spec = resolver.resolve("https://www.npmjs.com/package/browserify").await.unwrap();
        assert_eq!(spec.url().as_str(), "https://github.com/browserify/browserify");
    }

    #[tokio::test]
    async fn test_resolve_npm_object_repository() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/express"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "repository": { "type": "git", "url": "git+https://github.com/expressjs/express.git" }
            })))
            .mount(&server)
            .await;

        let resolver = PackageResolver::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let spec = resolver.resolve("https://www.npmjs.com/package/express").await.unwrap();
        assert_eq!(spec.to_string(), "expressjs/express");
    }

    #[tokio::test]
    async fn test_resolve_npm_not_on_github() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/elsewhere"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "repository": "https://gitlab.com/owner/elsewhere.git"
            })))
            .mount(&server)
            .await;

        let resolver = PackageResolver::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = resolver.resolve("https://www.npmjs.com/package/elsewhere").await.unwrap_err();
        assert!(format!("{err:#}").contains("not hosted on GitHub"));
    }

    #[tokio::test]
    async fn test_resolve_npm_missing_repository() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bare"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "bare" })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resolver = PackageResolver::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let _ = resolver.resolve("https://www.npmjs.com/package/bare").await.unwrap_err();
        let _ = resolver.resolve("https://www.npmjs.com/package/gone").await.unwrap_err();
    }

    #[tokio::test]
    async fn test_github_url_needs_no_lookup() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let resolver = PackageResolver::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let spec = resolver.resolve("https://github.com/lodash/lodash.git").await.unwrap();
        assert_eq!(spec.url().as_str(), "https://github.com/lodash/lodash");
    }
}
