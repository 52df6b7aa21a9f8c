//! ATAC fragment extraction for single-cell data
//!
//! Paired reads of one partition are turned into Tn5-corrected fragments,
//! incomplete pairs are dropped and duplicates are collapsed per coordinate.
//!
//! # Key Components
//!
//! - [`barcode`]: cell barcode allow-list
//! - [`segment`]: per-read admission (barcode, mapping quality, placement)
//! - [`assembler`]: mate pairing with Tn5 shift correction
//! - [`id_lookup`]: dense surrogate ids for matrix indexing
//! - [`dedup`]: duplicate collapsing through a sparse count matrix
//! - [`region_processor`]: the per-partition pipeline for `ParGranges`
//! - [`output`]: fragment file serialization

pub mod assembler;
pub mod barcode;
pub mod dedup;
pub mod id_lookup;
pub mod output;
pub mod region_processor;
pub mod segment;

#[cfg(test)]
pub(crate) mod testutil;

pub use assembler::{CompletedFragment, FragmentAssembler, InProgressFragment};
pub use barcode::BarcodeProcessor;
pub use dedup::{collapse_fragments, DedupedFragment};
pub use region_processor::{FragmentProcessor, PartitionBuilder, PartitionStats};
pub use segment::{BarcodeSource, SegmentDecision, SegmentFilter};
