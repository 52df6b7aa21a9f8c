pub mod fragments;

pub mod prelude {
    pub use super::fragments::{
        collapse_fragments, BarcodeProcessor, BarcodeSource, CompletedFragment, DedupedFragment,
        FragmentAssembler, FragmentProcessor, PartitionBuilder, PartitionStats, SegmentFilter,
    };
}
