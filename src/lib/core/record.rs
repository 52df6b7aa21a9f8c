//! Minimal view of an aligned segment.
//!
//! Fragment assembly only needs a handful of alignment fields. [`AlignedRead`]
//! exposes exactly those so the pipeline can be driven by `rust_htslib` records
//! in production and by plain structs in tests.

use rust_htslib::bam::record::{Aux, Cigar, Record};

/// Read-only accessors used by the segment filter and fragment assembler.
///
/// Coordinates are 0-based, end-exclusive, as in the BAM format.
pub trait AlignedRead {
    /// Read (pair) identifier shared by both mates.
    fn query_name(&self) -> &[u8];

    /// Leftmost aligned reference position, not counting soft clips.
    fn reference_start(&self) -> i64;

    /// One past the last aligned reference position, `None` when the read is
    /// unmapped or carries no CIGAR.
    fn reference_end(&self) -> Option<i64>;

    /// Number of leading soft-clipped bases.
    fn query_alignment_start(&self) -> i64;

    fn is_reverse(&self) -> bool;

    fn mapping_quality(&self) -> u8;

    /// String value of an auxiliary tag, `None` when absent or not textual.
    fn string_tag(&self, tag: &[u8]) -> Option<String>;
}

impl AlignedRead for Record {
    #[inline]
    fn query_name(&self) -> &[u8] {
        self.qname()
    }

    #[inline]
    fn reference_start(&self) -> i64 {
        self.pos()
    }

    fn reference_end(&self) -> Option<i64> {
        if self.is_unmapped() || self.raw_cigar().is_empty() {
            return None;
        }
        Some(self.cigar().end_pos())
    }

    fn query_alignment_start(&self) -> i64 {
        let mut offset = 0i64;
        for op in self.cigar().iter() {
            match op {
                Cigar::HardClip(_) => continue,
                Cigar::SoftClip(len) => offset += *len as i64,
                _ => break,
            }
        }
        offset
    }

    #[inline]
    fn is_reverse(&self) -> bool {
        Record::is_reverse(self)
    }

    #[inline]
    fn mapping_quality(&self) -> u8 {
        self.mapq()
    }

    fn string_tag(&self, tag: &[u8]) -> Option<String> {
        match self.aux(tag) {
            Ok(Aux::String(value)) => Some(value.to_string()),
            Ok(Aux::ArrayU8(array)) => {
                let bytes: Vec<u8> = array.iter().collect();
                String::from_utf8(bytes).ok()
            }
            _ => None,
        }
    }
}
