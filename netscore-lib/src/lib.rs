#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for netscore
//!
//! This library consolidates all functionality for the netscore tool, which scores
//! open-source package repositories on five quality dimensions and combines them
//! into a single weighted NetScore.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`facts`]: Repository acquisition, document lookup, and GitHub access
//! - [`metrics`]: The per-dimension scorers
//! - [`scoring`]: The aggregation pipeline and its report
//! - [`reports`]: Report rendering

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod facts;
#[cfg(not(any(debug_assertions, test)))]
mod facts;

#[cfg(any(debug_assertions, test))]
pub mod metrics;
#[cfg(not(any(debug_assertions, test)))]
mod metrics;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod scoring;
#[cfg(not(any(debug_assertions, test)))]
mod scoring;

pub use crate::commands::{Host, run};
