//! Report rendering
//!
//! Reports are emitted as newline-delimited JSON: one [`NetScoreReport`](crate::scoring::NetScoreReport)
//! object per line, in the order the inputs were scored.

mod ndjson;

pub use ndjson::generate as generate_ndjson;
