//! Per-partition fragment pipeline.
//!
//! [`PartitionBuilder`] folds the reads of one partition through the segment
//! filter and the fragment assembler, then drops incomplete pairs and
//! collapses duplicates. [`FragmentProcessor`] plugs it into the
//! [`ParGranges`](crate::engine::ParGranges) executor: every partition opens
//! its own reader and owns all of its state.

use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use log::*;
use rust_htslib::bam::{self, Read};

use super::assembler::FragmentAssembler;
use super::dedup::{collapse_fragments, DedupedFragment};
use super::segment::{RejectReason, SegmentDecision, SegmentFilter};
use crate::core::error::{FragmentError, Result};
use crate::core::record::AlignedRead;
use crate::engine::par_granges::{Partition, RegionProcessor};

/// Unparseable read names reported individually per partition before only
/// counting them.
const MAX_REPORTED_UNPARSEABLE: u64 = 5;

/// Read and fragment tallies of one partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub reads: u64,
    pub accepted: u64,
    pub rejected_barcode: u64,
    pub rejected_mapq: u64,
    pub rejected_unmapped: u64,
    pub unparseable_barcode: u64,
    /// Pairs surviving the completeness filter.
    pub fragments: u64,
    /// Fragments left after duplicate collapsing.
    pub unique_fragments: u64,
}

impl PartitionStats {
    fn record_rejection(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::Barcode => self.rejected_barcode += 1,
            RejectReason::MappingQuality => self.rejected_mapq += 1,
            RejectReason::Unmapped => self.rejected_unmapped += 1,
        }
    }
}

impl fmt::Display for PartitionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} reads ({} accepted; rejected: {} barcode, {} mapq, {} unmapped; {} unparseable barcodes), {} fragments -> {} unique",
            self.reads,
            self.accepted,
            self.rejected_barcode,
            self.rejected_mapq,
            self.rejected_unmapped,
            self.unparseable_barcode,
            self.fragments,
            self.unique_fragments
        )
    }
}

/// Accumulates the reads of a single partition.
pub struct PartitionBuilder<'a> {
    chrom: &'a str,
    filter: &'a SegmentFilter,
    assembler: FragmentAssembler,
    stats: PartitionStats,
}

impl<'a> PartitionBuilder<'a> {
    pub fn new(chrom: &'a str, filter: &'a SegmentFilter) -> Self {
        Self {
            chrom,
            filter,
            assembler: FragmentAssembler::new(),
            stats: PartitionStats::default(),
        }
    }

    /// Feed one read. Each read must be fed at most once.
    ///
    /// A read whose barcode cannot be parsed is skipped and counted; any other
    /// error is returned.
    pub fn push<R: AlignedRead>(&mut self, read: &R) -> Result<()> {
        self.stats.reads += 1;
        match self.filter.evaluate(read) {
            Ok(SegmentDecision::Accept { cell }) => {
                if self.assembler.add_read(self.chrom, read, cell.as_deref()) {
                    self.stats.accepted += 1;
                }
            }
            Ok(SegmentDecision::Reject(reason)) => self.stats.record_rejection(reason),
            Err(err @ FragmentError::UnparseableBarcode { .. }) => {
                self.stats.unparseable_barcode += 1;
                if self.stats.unparseable_barcode <= MAX_REPORTED_UNPARSEABLE {
                    warn!("{}: skipping read, {}", self.chrom, err);
                } else {
                    debug!("{}: skipping read, {}", self.chrom, err);
                }
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    pub fn stats(&self) -> &PartitionStats {
        &self.stats
    }

    /// Drop incomplete pairs and collapse duplicates.
    pub fn finish(self) -> Result<(Vec<DedupedFragment>, PartitionStats)> {
        let PartitionBuilder {
            chrom,
            assembler,
            mut stats,
            ..
        } = self;

        trace!("{}: {} read names seen", chrom, assembler.len());
        let completed = assembler.into_completed();
        stats.fragments = completed.len() as u64;

        let collapsed = collapse_fragments(&completed)?;
        stats.unique_fragments = collapsed.len() as u64;

        if stats.unparseable_barcode > MAX_REPORTED_UNPARSEABLE {
            warn!(
                "{}: {} reads skipped because their barcode could not be parsed",
                chrom, stats.unparseable_barcode
            );
        }
        Ok((collapsed, stats))
    }
}

/// Runs the fragment pipeline over one indexed BAM, one contig at a time.
pub struct FragmentProcessor {
    /// Path to the indexed BAM file
    reads: PathBuf,
    filter: SegmentFilter,
}

impl FragmentProcessor {
    pub fn new(reads: PathBuf, filter: SegmentFilter) -> Self {
        Self { reads, filter }
    }
}

impl RegionProcessor for FragmentProcessor {
    type P = DedupedFragment;

    fn process_region(&self, partition: &Partition) -> anyhow::Result<Vec<DedupedFragment>> {
        let mut reader = bam::IndexedReader::from_path(&self.reads)
            .with_context(|| format!("Failed to open indexed BAM {}", self.reads.display()))?;
        reader
            .fetch((partition.tid, 0u32, partition.len))
            .with_context(|| format!("Failed to fetch {}", partition))?;

        let mut builder = PartitionBuilder::new(&partition.name, &self.filter);
        let mut record = bam::Record::new();
        while let Some(result) = reader.read(&mut record) {
            result.with_context(|| format!("Failed to read record from {}", partition))?;
            builder.push(&record)?;
        }

        let (fragments, stats) = builder.finish()?;
        info!("{}: {}", partition.name, stats);
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fragments::barcode::BarcodeProcessor;
    use crate::pipeline::fragments::segment::BarcodeSource;
    use crate::pipeline::fragments::testutil::TestRead;
    use rust_htslib::bam::record::{Aux, Cigar, CigarString};
    use std::path::Path;
    use std::sync::Arc;

    fn cb_filter() -> SegmentFilter {
        SegmentFilter::new(30, BarcodeSource::tag("CB").unwrap(), None)
    }

    #[test]
    fn builds_fragment_from_mate_pair() {
        let filter = cb_filter();
        let mut builder = PartitionBuilder::new("chr1", &filter);
        builder
            .push(&TestRead::forward("R1", 100, 50).with_soft_clip(2).with_cb("AAAA").with_mapq(40))
            .unwrap();
        builder
            .push(&TestRead::reverse("R1", 250, 50).with_cb("AAAA").with_mapq(40))
            .unwrap();

        let (fragments, stats) = builder.finish().unwrap();
        assert_eq!(
            fragments,
            vec![DedupedFragment {
                chrom: "chr1".into(),
                start: 106,
                end: 245,
                cell: "AAAA".into(),
                count: 1,
            }]
        );
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.fragments, 1);
    }

    #[test]
    fn low_mapq_mate_drops_the_pair() {
        let filter = cb_filter();
        let mut builder = PartitionBuilder::new("chr1", &filter);
        builder
            .push(&TestRead::forward("R1", 100, 50).with_cb("AAAA").with_mapq(40))
            .unwrap();
        builder
            .push(&TestRead::reverse("R1", 250, 50).with_cb("AAAA").with_mapq(20))
            .unwrap();

        let (fragments, stats) = builder.finish().unwrap();
        assert!(fragments.is_empty());
        assert_eq!(stats.rejected_mapq, 1);
        assert_eq!(stats.fragments, 0);
    }

    #[test]
    fn disallowed_barcode_is_counted() {
        let filter = SegmentFilter::new(
            30,
            BarcodeSource::default(),
            Some(Arc::new(BarcodeProcessor::from_vec(vec!["AAAA".to_string()]))),
        );
        let mut builder = PartitionBuilder::new("chr1", &filter);
        builder
            .push(&TestRead::forward("R1", 100, 50).with_cb("CCCC"))
            .unwrap();
        builder
            .push(&TestRead::reverse("R1", 250, 50).unplaced().with_cb("AAAA"))
            .unwrap();
        assert_eq!(builder.stats().rejected_barcode, 1);
        assert_eq!(builder.stats().rejected_unmapped, 1);
        assert_eq!(builder.stats().reads, 2);
    }

    #[test]
    fn unparseable_barcodes_are_skipped_not_fatal() {
        let filter = SegmentFilter::new(0, BarcodeSource::read_name("[ACGT]+").unwrap(), None);
        let mut builder = PartitionBuilder::new("chr1", &filter);
        for i in 0..8 {
            builder
                .push(&TestRead::forward(&format!("xx:{}", i), 100, 50))
                .unwrap();
        }
        builder.push(&TestRead::forward("ACGT:1", 100, 50)).unwrap();
        builder.push(&TestRead::reverse("ACGT:1", 300, 50)).unwrap();

        let (fragments, stats) = builder.finish().unwrap();
        assert_eq!(stats.unparseable_barcode, 8);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].cell.as_str(), "ACGT");
    }

    #[test]
    fn duplicates_collapse_within_partition() {
        let filter = cb_filter();
        let mut builder = PartitionBuilder::new("chr1", &filter);
        for (name, cell) in [("a", "AAAA"), ("b", "AAAA"), ("c", "BBBB")] {
            builder
                .push(&TestRead::forward(name, 100, 50).with_soft_clip(2).with_cb(cell))
                .unwrap();
            builder
                .push(&TestRead::reverse(name, 250, 50).with_cb(cell))
                .unwrap();
        }
        let (fragments, stats) = builder.finish().unwrap();
        assert_eq!(stats.fragments, 3);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].cell.as_str(), "AAAA");
        assert_eq!(fragments[0].count, 3);
    }

    struct Mate {
        name: &'static str,
        pos: i64,
        reverse: bool,
        mapq: u8,
        cb: &'static str,
    }

    fn write_indexed_bam(path: &Path) {
        let mut header = bam::Header::new();
        for (name, len) in [("chr1", 10_000), ("chr2", 10_000)] {
            let mut sq = bam::header::HeaderRecord::new(b"SQ");
            sq.push_tag(b"SN", &name);
            sq.push_tag(b"LN", &len);
            header.push_record(&sq);
        }

        let mates = [
            Mate { name: "p1", pos: 100, reverse: false, mapq: 60, cb: "AAAA" },
            Mate { name: "p2", pos: 100, reverse: false, mapq: 60, cb: "AAAA" },
            Mate { name: "p3", pos: 120, reverse: false, mapq: 10, cb: "CCCC" },
            Mate { name: "p3", pos: 180, reverse: true, mapq: 60, cb: "CCCC" },
            Mate { name: "p1", pos: 200, reverse: true, mapq: 60, cb: "AAAA" },
            Mate { name: "p2", pos: 200, reverse: true, mapq: 60, cb: "AAAA" },
        ];

        let mut writer = bam::Writer::from_path(path, &header, bam::Format::Bam).unwrap();
        let cigar = CigarString(vec![Cigar::Match(50)]);
        let seq = vec![b'A'; 50];
        let qual = vec![30u8; 50];
        for mate in mates.iter() {
            let mut record = bam::Record::new();
            record.set(mate.name.as_bytes(), Some(&cigar), &seq, &qual);
            record.set_tid(0);
            record.set_pos(mate.pos);
            record.set_mtid(0);
            record.set_mapq(mate.mapq);
            record.set_flags(if mate.reverse { 0x1 | 0x2 | 0x10 } else { 0x1 | 0x2 | 0x20 });
            record.push_aux(b"CB", Aux::String(mate.cb)).unwrap();
            writer.write(&record).unwrap();
        }
        drop(writer);
        bam::index::build(path, None, bam::index::Type::Bai, 1).unwrap();
    }

    #[test]
    fn processes_partition_from_indexed_bam() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.bam");
        write_indexed_bam(&path);

        let processor = FragmentProcessor::new(path, cb_filter());
        let partition = Partition {
            tid: 0,
            name: "chr1".to_string(),
            len: 10_000,
        };
        let fragments = processor.process_region(&partition).unwrap();
        assert_eq!(
            fragments,
            vec![DedupedFragment {
                chrom: "chr1".into(),
                start: 104,
                end: 245,
                cell: "AAAA".into(),
                count: 2,
            }]
        );

        let empty = Partition {
            tid: 1,
            name: "chr2".to_string(),
            len: 10_000,
        };
        assert!(processor.process_region(&empty).unwrap().is_empty());
    }
}
