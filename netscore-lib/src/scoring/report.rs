use crate::metrics::{Dimension, MetricResult};
use core::time::Duration;
use serde::Serialize;
use strum::IntoEnumIterator;

/// Results for every dimension of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionResults {
    pub bus_factor: MetricResult,
    pub correctness: MetricResult,
    pub license: MetricResult,
    pub ramp_up: MetricResult,
    pub responsiveness: MetricResult,
}

impl DimensionResults {
    #[must_use]
    pub const fn get(&self, dimension: Dimension) -> &MetricResult {
        match dimension {
            Dimension::BusFactor => &self.bus_factor,
            Dimension::Correctness => &self.correctness,
            Dimension::License => &self.license,
            Dimension::RampUp => &self.ramp_up,
            Dimension::Responsiveness => &self.responsiveness,
        }
    }

    /// Weighted combination of every dimension, clamped to `[0, 1]`.
    ///
    /// Unavailable dimensions contribute 0.
    #[must_use]
    pub fn net_score(&self) -> f64 {
        let total: f64 = Dimension::iter().map(|d| d.weight() * self.get(d).score()).sum();
        total.clamp(0.0, 1.0)
    }
}

/// The final artifact of a scoring run. Field names are part of the output contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetScoreReport {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "NetScore")]
    pub net_score: f64,

    #[serde(rename = "NetScore_Latency")]
    pub net_score_latency: f64,

    #[serde(rename = "RampUp")]
    pub ramp_up: f64,

    #[serde(rename = "RampUp_Latency")]
    pub ramp_up_latency: f64,

    #[serde(rename = "Correctness")]
    pub correctness: f64,

    #[serde(rename = "Correctness_Latency")]
    pub correctness_latency: f64,

    #[serde(rename = "BusFactor")]
    pub bus_factor: f64,

    #[serde(rename = "BusFactor_Latency")]
    pub bus_factor_latency: f64,

    #[serde(rename = "ResponsiveMaintainer")]
    pub responsive_maintainer: f64,

    #[serde(rename = "ResponsiveMaintainer_Latency")]
    pub responsive_maintainer_latency: f64,

    #[serde(rename = "License")]
    pub license: f64,

    #[serde(rename = "License_Latency")]
    pub license_latency: f64,
}

impl NetScoreReport {
    /// Assemble a report, rounding every number to three decimals.
    #[must_use]
    pub fn new(url: impl Into<String>, results: &DimensionResults, total: Duration) -> Self {
        let score = |r: &MetricResult| round3(r.score());
        let latency = |r: &MetricResult| round3(r.latency().as_secs_f64());

        Self {
            url: url.into(),
            net_score: round3(results.net_score()),
            net_score_latency: round3(total.as_secs_f64()),
            ramp_up: score(&results.ramp_up),
            ramp_up_latency: latency(&results.ramp_up),
            correctness: score(&results.correctness),
            correctness_latency: latency(&results.correctness),
            bus_factor: score(&results.bus_factor),
            bus_factor_latency: latency(&results.bus_factor),
            responsive_maintainer: score(&results.responsiveness),
            responsive_maintainer_latency: latency(&results.responsiveness),
            license: score(&results.license),
            license_latency: latency(&results.license),
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
