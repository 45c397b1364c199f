//! Activity logs for VALET agents.
//!
//! An [`ActivityTracker`] buffers one [`ActivityRecord`] per request an agent
//! makes (or a service observes) and flushes the buffer to a block store as a
//! single JSON array. An [`ActivityReporter`] turns a set of records back
//! into totals and a printable report.

#![warn(missing_docs)]

mod error;
mod record;
mod reporter;
mod tracker;

pub use error::*;
pub use record::*;
pub use reporter::*;
pub use tracker::*;
