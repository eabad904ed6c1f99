//! The NetScore aggregation pipeline
//!
//! [`NetScorer`] runs a single pass per repository:
//!
//! 1. Acquire a working copy in a fresh directory. Failure here aborts the run
//!    and no report is produced.
//! 2. Read and parse the README, if there is one. This gates the ramp-up
//!    dimension, which is computed inline.
//! 3. Spawn the bus factor, license, responsiveness and correctness scorers as
//!    independent tasks sharing one deadline.
//! 4. Collect each task. A task that panics or misses the deadline turns into an
//!    unavailable result for its own dimension; finished siblings are kept.
//! 5. Combine the weighted scores into a clamped NetScore and build the
//!    [`NetScoreReport`].
//!
//! The working directory is removed afterwards; failing to remove it is only logged.

mod net_scorer;
mod report;

pub use net_scorer::NetScorer;
pub use report::{DimensionResults, NetScoreReport};
