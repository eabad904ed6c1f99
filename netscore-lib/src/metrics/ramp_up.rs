//! Onboarding ease, judged from README structure.

use super::MetricResult;
use crate::facts::ReadmeMetrics;
use crate::facts::readme::SectionName;
use core::time::Duration;
use std::time::Instant;

const LOG_TARGET: &str = "   ramp_up";

const CODE_BLOCK_CEILING: f64 = 50.0;
const LINK_CEILING: f64 = 50.0;

#[must_use]
#[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
pub fn compute_score(metrics: &ReadmeMetrics) -> f64 {
    let essential = metrics.sections_present() as f64 / SectionName::count() as f64;
    let code = (metrics.code_block_count as f64 / CODE_BLOCK_CEILING).min(1.0);
    let links = (metrics.link_count as f64 / LINK_CEILING).min(1.0);

    ((essential + code + links) / 3.0).clamp(0.0, 1.0)
}

/// Score ramp-up from README text, timing the Markdown analysis as well as the scoring.
/// Without a README the score is 0 with no latency.
#[must_use]
pub fn score(readme: Option<&str>) -> MetricResult {
    let Some(readme) = readme else {
        log::info!(target: LOG_TARGET, "No README, ramp-up defaults to 0");
        return MetricResult::scored(0.0, Duration::ZERO);
    };

    let start = Instant::now();
    let metrics = ReadmeMetrics::from_text(readme);
    log::debug!(
        target: LOG_TARGET,
        "README has {} of the essential sections, {} code blocks and {} links",
        metrics.sections_present(),
        metrics.code_block_count,
        metrics.link_count
    );

    let score = compute_score(&metrics);
    log::info!(target: LOG_TARGET, "Ramp-up score is {score:.3}");
    MetricResult::scored_since(score, start)
}
