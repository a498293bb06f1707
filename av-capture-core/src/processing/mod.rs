//! Concurrency primitives and producer-side statistics shared by the
//! capture sessions.

pub mod drop_queue;
pub mod latest_cell;
pub mod level;
