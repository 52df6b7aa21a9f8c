//! Parallel genomic partition processing.
//!
//! The [`ParGranges`] executor fans whole reference sequences out across a
//! dedicated Rayon pool. Each partition is handed to a [`RegionProcessor`]
//! which owns all state for that partition; results are gathered once every
//! partition has finished and concatenated in partition order.

mod partitions;
mod scheduler;
mod types;

pub use partitions::{header_to_partitions, select_partitions};
pub use scheduler::ParGranges;
pub use types::{Partition, RegionProcessor};
