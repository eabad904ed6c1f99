//! Per-dimension scorers
//!
//! Each submodule scores one [`Dimension`] of repository quality and reports the
//! outcome as a [`MetricResult`]. Scorers recover from their own failures: a
//! scorer whose data source fails returns [`MetricResult::Unavailable`] rather
//! than an error, so one bad dimension never aborts a run.
//!
//! # Implementation Model
//!
//! Every scorer splits into a pure `compute_score`-style function that turns raw
//! counts into a value in `[0, 1]`, and an async `score` entry point that gathers
//! the inputs, times the work, and logs the outcome.
//!
//! - [`bus_factor`]: contributor, workflow run, pull request and issue counts
//! - [`correctness`]: test suite, coverage summary and CI configuration presence
//! - [`license`]: LGPL-2.1 compatibility from the README or a LICENSE file
//! - [`ramp_up`]: README structure
//! - [`responsiveness`]: issue and pull request turnaround

pub mod bus_factor;
pub mod correctness;
mod dimension;
pub mod license;
mod metric_result;
pub mod ramp_up;
pub mod responsiveness;

pub use dimension::Dimension;
pub use metric_result::MetricResult;
