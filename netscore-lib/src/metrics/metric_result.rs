use core::fmt::{Display, Formatter};
use core::time::Duration;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of scoring one dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricResult {
    /// The dimension was computed. `score` is always within `[0, 1]`.
    Scored { score: f64, latency: Duration },

    /// The dimension could not be computed; carries the reason.
    Unavailable(Arc<str>),
}

impl MetricResult {
    /// Build a scored result, clamping `score` into `[0, 1]`. A NaN score is treated as 0.
    #[must_use]
    pub fn scored(score: f64, latency: Duration) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self::Scored { score, latency }
    }

    /// Build a scored result whose latency is measured from `start` until now.
    #[must_use]
    pub fn scored_since(score: f64, start: Instant) -> Self {
        Self::scored(score, start.elapsed())
    }

    #[must_use]
    pub fn unavailable(reason: impl AsRef<str>) -> Self {
        Self::Unavailable(Arc::from(reason.as_ref()))
    }

    /// The score used for weighting; an unavailable dimension counts as 0.
    #[must_use]
    pub const fn score(&self) -> f64 {
        match self {
            Self::Scored { score, .. } => *score,
            Self::Unavailable(_) => 0.0,
        }
    }

    /// The latency reported for this dimension; an unavailable dimension reports 0.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        match self {
            Self::Scored { latency, .. } => *latency,
            Self::Unavailable(_) => Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }
}

impl Display for MetricResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Scored { score, latency } => write!(f, "{score:.3} in {:.3}s", latency.as_secs_f64()),
            Self::Unavailable(reason) => write!(f, "unavailable ({reason})"),
        }
    }
}
