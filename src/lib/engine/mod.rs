//! Execution engine: per-partition parallel processing.

pub mod par_granges;

pub use par_granges::{ParGranges, Partition, RegionProcessor};
