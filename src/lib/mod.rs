//! scfrag: single-cell ATAC fragment extraction
//!
//! scfrag turns the paired reads of an indexed, cell-barcoded BAM file into
//! ATAC fragments and collapses PCR and sequencing duplicates. The library
//! provides functionality for:
//! 1. Filtering reads by mapping quality and cell barcode
//! 2. Pairing mates into Tn5-corrected fragments
//! 3. Collapsing duplicate fragments per coordinate
//! 4. Processing contigs in parallel
//!
//! # Modules
//!
//! - [`core`]: errors, I/O, read filtering and sparse matrix helpers
//! - [`engine`]: parallel per-contig execution
//! - [`pipeline`]: the fragment pipeline itself
//! - [`utils`]: convenience re-exports

pub mod core;
pub mod engine;
pub mod pipeline;
pub mod utils;
