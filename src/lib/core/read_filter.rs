//! Read filtering primitives used across scfrag.
//!
//! This module exposes the [`ReadFilter`] trait along with the default
//! mapping-quality based filter.

use super::record::AlignedRead;

/// A trait for filtering reads based on alignment properties.
///
/// Implementations return `true` if the read passes the filter and `false` otherwise.
pub trait ReadFilter {
    /// Filter a read based on various criteria.
    fn filter_read<R: AlignedRead>(&self, read: &R) -> bool;
}

/// A straightforward read filter based on mapping quality.
#[derive(Debug, Clone, Copy)]
pub struct DefaultReadFilter {
    /// Minimum mapping quality for a read to pass filtering.
    ///
    /// The read's mapping quality must be greater than or equal to this value to pass.
    min_mapq: u8,
}

impl DefaultReadFilter {
    /// Create a new [`DefaultReadFilter`] with the specified criteria.
    pub fn new(min_mapq: u8) -> Self {
        Self { min_mapq }
    }

    #[inline]
    pub fn min_mapq(&self) -> u8 {
        self.min_mapq
    }

    #[inline(always)]
    pub fn passes_mapq<R: AlignedRead>(&self, read: &R) -> bool {
        read.mapping_quality() >= self.min_mapq
    }

    /// Reads without a resolvable reference end cannot anchor a fragment.
    #[inline(always)]
    pub fn is_placed<R: AlignedRead>(&self, read: &R) -> bool {
        read.reference_end().is_some()
    }
}

impl ReadFilter for DefaultReadFilter {
    /// Filter reads based on mapping quality and placement.
    #[inline(always)]
    fn filter_read<R: AlignedRead>(&self, read: &R) -> bool {
        self.passes_mapq(read) && self.is_placed(read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bam::record::{Cigar, CigarString, Record};

    fn record_with_mapq(mapq: u8) -> Record {
        let cigar = CigarString(vec![Cigar::Match(4)]);
        let mut record = Record::new();
        record.set(b"read", Some(&cigar), b"ACGT", &[30, 30, 30, 30]);
        record.set_pos(10);
        record.set_flags(0x1);
        record.set_mapq(mapq);
        record
    }

    #[test]
    fn rejects_low_quality_reads() {
        let filter = DefaultReadFilter::new(30);
        let record = record_with_mapq(10);
        assert!(!filter.filter_read(&record));
    }

    #[test]
    fn accepts_high_quality_reads() {
        let filter = DefaultReadFilter::new(20);
        let record = record_with_mapq(25);
        assert!(filter.filter_read(&record));
    }

    #[test]
    fn rejects_unplaced_reads() {
        let filter = DefaultReadFilter::new(0);
        let mut record = record_with_mapq(60);
        record.set_flags(0x1 | 0x4);
        assert!(filter.passes_mapq(&record));
        assert!(!filter.filter_read(&record));
    }
}
