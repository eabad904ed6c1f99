//! Correctness signals read from the working copy.

use super::MetricResult;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

const LOG_TARGET: &str = "   correct";

const TEST_DIRS: &[&str] = &["test", "tests", "__tests__"];

const COVERAGE_SUMMARY: &str = "coverage/coverage-summary.json";

const CI_PATHS: &[&str] = &[
    ".github/workflows",
    ".travis.yml",
    ".circleci",
    "azure-pipelines.yml",
    "appveyor.yml",
    ".gitlab-ci.yml",
    "Jenkinsfile",
];

/// Coverage assumed when a project publishes no coverage summary.
const COVERAGE_FALLBACK: f64 = 0.2;

const TEST_SUITE_WEIGHT: f64 = 0.3;
const COVERAGE_WEIGHT: f64 = 0.5;
const CI_WEIGHT: f64 = 0.2;

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    scripts: Scripts,
}

#[derive(Debug, Default, Deserialize)]
struct Scripts {
    test: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoverageSummary {
    total: CoverageTotals,
}

#[derive(Debug, Deserialize)]
struct CoverageTotals {
    statements: CoverageEntry,
    branches: CoverageEntry,
    functions: CoverageEntry,
    lines: CoverageEntry,
}

#[derive(Debug, Deserialize)]
struct CoverageEntry {
    pct: f64,
}

/// 1 when a conventional test directory exists or `package.json` declares a test script.
pub async fn test_suite_score(repo: &Path) -> f64 {
    for dir in TEST_DIRS {
        let path = repo.join(dir);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {
                log::debug!(target: LOG_TARGET, "Found test directory '{dir}'");
                return 1.0;
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::error!(target: LOG_TARGET, "Could not access '{}': {e}", path.display()),
        }
    }

    let manifest_path = repo.join("package.json");
    match tokio::fs::read(&manifest_path).await {
        Ok(bytes) => match serde_json::from_slice::<PackageManifest>(&bytes) {
            Ok(manifest) if manifest.scripts.test.as_deref().is_some_and(|s| !s.trim().is_empty()) => {
                log::debug!(target: LOG_TARGET, "Found a test script in package.json");
                return 1.0;
            }
            Ok(_) => {}
            Err(e) => log::warn!(target: LOG_TARGET, "Could not parse '{}': {e}", manifest_path.display()),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::error!(target: LOG_TARGET, "Could not read '{}': {e}", manifest_path.display()),
    }

    0.0
}

/// Mean of the four coverage percentages, or the fallback when there is no usable summary.
pub async fn coverage_score(repo: &Path) -> f64 {
    let path = repo.join(COVERAGE_SUMMARY);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                log::error!(target: LOG_TARGET, "Could not read '{}': {e}", path.display());
            }
            return COVERAGE_FALLBACK;
        }
    };

    match serde_json::from_slice::<CoverageSummary>(&bytes) {
        Ok(summary) => {
            let t = &summary.total;
            let mean = (t.statements.pct + t.branches.pct + t.functions.pct + t.lines.pct) / 4.0;
            log::debug!(target: LOG_TARGET, "Coverage summary reports {mean:.1}%");
            (mean / 100.0).clamp(0.0, 1.0)
        }
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Ignoring malformed coverage summary '{}': {e}", path.display());
            COVERAGE_FALLBACK
        }
    }
}

/// 1 when any well-known CI configuration is present.
pub async fn ci_score(repo: &Path) -> f64 {
    for ci in CI_PATHS {
        if tokio::fs::try_exists(repo.join(ci)).await.unwrap_or(false) {
            log::debug!(target: LOG_TARGET, "Found CI configuration '{ci}'");
            return 1.0;
        }
    }

    0.0
}

#[must_use]
pub fn combine(test_suite: f64, coverage: f64, ci: f64) -> f64 {
    (TEST_SUITE_WEIGHT * test_suite + COVERAGE_WEIGHT * coverage + CI_WEIGHT * ci).clamp(0.0, 1.0)
}

pub async fn score(repo: &Path) -> MetricResult {
    let start = Instant::now();

    let (test_suite, coverage, ci) = tokio::join!(test_suite_score(repo), coverage_score(repo), ci_score(repo));
    log::debug!(target: LOG_TARGET, "Sub-scores: test suite {test_suite}, coverage {coverage:.3}, ci {ci}");

    let score = combine(test_suite, coverage, ci);
    log::info!(target: LOG_TARGET, "Correctness score is {score:.3}");
    MetricResult::scored_since(score, start)
}
