use anyhow::Result;
use serde::Serialize;
use std::fmt;

/// A whole reference sequence processed independently of every other one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Target id in the BAM header.
    pub tid: u32,
    /// Reference sequence name.
    pub name: String,
    /// Reference sequence length in bp.
    pub len: u32,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:0-{}", self.name, self.len)
    }
}

/// Trait defining how a partition is processed.
///
/// Partitions never overlap, so implementations may assume that nothing they
/// produce can collide with the output of another partition.
pub trait RegionProcessor {
    /// The type returned when processing a partition.
    type P: 'static + Send + Sync + Serialize;

    /// Process every read of `partition`. An error aborts the whole run.
    fn process_region(&self, partition: &Partition) -> Result<Vec<Self::P>>;
}
