//! Durable storage for observations and alerting state.
//!
//! Two files live under the configured base directory:
//!
//! - `samples.jsonl`: append-only, newline-delimited log of
//!   [`SampleRecord`](crate::SampleRecord)s, pruned by date after each daily
//!   summary.
//! - `state.json`: the [`AlertState`](crate::monitors::uptime::AlertState)
//!   singleton, fully overwritten (write temp, rename) after every tick.
//!
//! Both writers use the temp-file-plus-rename discipline so a crash
//! mid-operation never leaves a half-written file behind.

pub mod error;
pub mod samples;
pub mod state;

pub use error::{StoreError, StoreResult};
pub use samples::SampleStore;
pub use state::{FileStateRepository, MemoryStateRepository, StateRepository};
