//! Pairing of mates into fragments.
//!
//! Each admitted read contributes one end of its fragment: the forward mate the
//! start, the reverse mate the end. Both ends are corrected for leading soft
//! clips and for the 9 bp duplex offset left by Tn5 tagmentation (+4 on the
//! forward strand, -5 on the reverse strand).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smartstring::alias::String;

use crate::core::record::AlignedRead;

/// Shift applied to the start of forward-strand reads.
pub const TN5_FORWARD_SHIFT: i64 = 4;
/// Shift subtracted from the end of reverse-strand reads.
pub const TN5_REVERSE_SHIFT: i64 = 5;

/// The fragment end a single read determines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MateEnd {
    Start(i64),
    End(i64),
}

impl MateEnd {
    /// Tn5-corrected end contributed by `read`, `None` when the read has no
    /// reference end.
    pub fn of<R: AlignedRead>(read: &R) -> Option<Self> {
        let end = read.reference_end()?;
        if read.is_reverse() {
            Some(MateEnd::End(end - TN5_REVERSE_SHIFT))
        } else {
            let start = read.reference_start() + read.query_alignment_start();
            Some(MateEnd::Start(start + TN5_FORWARD_SHIFT))
        }
    }
}

/// A fragment for which not every mate may have been seen yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InProgressFragment {
    pub chrom: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
    /// Barcode of the first mate seen; never reconciled with the other mate.
    pub cell: Option<String>,
}

impl InProgressFragment {
    fn set(&mut self, mate_end: MateEnd) {
        match mate_end {
            MateEnd::Start(start) => self.start = Some(start),
            MateEnd::End(end) => self.end = Some(end),
        }
    }

    /// Completeness check: every field present and no empty string.
    pub fn complete(self) -> Option<CompletedFragment> {
        match self {
            InProgressFragment {
                chrom,
                start: Some(start),
                end: Some(end),
                cell: Some(cell),
            } if !chrom.is_empty() && !cell.is_empty() => Some(CompletedFragment {
                chrom,
                start,
                end,
                cell,
            }),
            _ => None,
        }
    }
}

/// A fragment with both ends and a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletedFragment {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub cell: String,
}

/// In-progress fragments of one partition keyed by read name.
///
/// Entries are kept in the order their first mate was seen. Feeding the same
/// read twice is not detected and overwrites the end it set.
#[derive(Debug, Default)]
pub struct FragmentAssembler {
    index: FxHashMap<Vec<u8>, usize>,
    fragments: Vec<InProgressFragment>,
}

impl FragmentAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an admitted read into the mapping.
    ///
    /// Returns `false` when the read has no reference end and was ignored.
    pub fn add_read<R: AlignedRead>(&mut self, chrom: &str, read: &R, cell: Option<&str>) -> bool {
        let Some(mate_end) = MateEnd::of(read) else {
            return false;
        };

        match self.index.get(read.query_name()) {
            Some(&idx) => self.fragments[idx].set(mate_end),
            None => {
                let mut fragment = InProgressFragment {
                    chrom: String::from(chrom),
                    start: None,
                    end: None,
                    cell: cell.map(String::from),
                };
                fragment.set(mate_end);
                self.index
                    .insert(read.query_name().to_vec(), self.fragments.len());
                self.fragments.push(fragment);
            }
        }
        true
    }

    pub fn get(&self, query_name: &[u8]) -> Option<&InProgressFragment> {
        self.index.get(query_name).map(|&idx| &self.fragments[idx])
    }

    /// Number of distinct read names seen.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Drop incomplete entries and return the rest in first-seen order.
    pub fn into_completed(self) -> Vec<CompletedFragment> {
        self.fragments
            .into_iter()
            .filter_map(InProgressFragment::complete)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fragments::testutil::TestRead;
    use proptest::prelude::*;

    fn completed(chrom: &str, start: i64, end: i64, cell: &str) -> CompletedFragment {
        CompletedFragment {
            chrom: chrom.into(),
            start,
            end,
            cell: cell.into(),
        }
    }

    #[test]
    fn assembles_soft_clipped_pair() {
        let mut assembler = FragmentAssembler::new();
        let fwd = TestRead::forward("R1", 100, 50).with_soft_clip(2);
        let rev = TestRead::reverse("R1", 250, 50);
        assert!(assembler.add_read("chr1", &fwd, Some("AAAA")));
        assert!(assembler.add_read("chr1", &rev, Some("AAAA")));

        assert_eq!(
            assembler.into_completed(),
            vec![completed("chr1", 106, 245, "AAAA")]
        );
    }

    #[test]
    fn first_mate_fixes_chrom_and_cell() {
        let mut assembler = FragmentAssembler::new();
        assembler.add_read("chr1", &TestRead::reverse("R1", 300, 50), Some("AAAA"));
        assembler.add_read("chr2", &TestRead::forward("R1", 100, 50), Some("CCCC"));

        let fragment = assembler.get(b"R1").unwrap();
        assert_eq!(fragment.chrom.as_str(), "chr1");
        assert_eq!(fragment.cell.as_deref(), Some("AAAA"));
        assert_eq!((fragment.start, fragment.end), (Some(104), Some(295)));
    }

    #[test]
    fn drops_incomplete_and_barcodeless_pairs() {
        let mut assembler = FragmentAssembler::new();
        assembler.add_read("chr1", &TestRead::forward("single", 10, 50), Some("AAAA"));
        assembler.add_read("chr1", &TestRead::forward("nocell", 10, 50), None);
        assembler.add_read("chr1", &TestRead::reverse("nocell", 200, 50), None);
        assembler.add_read("chr1", &TestRead::forward("empty", 10, 50), Some(""));
        assembler.add_read("chr1", &TestRead::reverse("empty", 200, 50), Some(""));
        assembler.add_read("chr1", &TestRead::forward("ok", 10, 50), Some("AAAA"));
        assembler.add_read("chr1", &TestRead::reverse("ok", 200, 50), Some("AAAA"));
        assert_eq!(assembler.len(), 4);

        assert_eq!(
            assembler.into_completed(),
            vec![completed("chr1", 14, 195, "AAAA")]
        );
    }

    #[test]
    fn keeps_zero_valued_coordinates() {
        let fragment = InProgressFragment {
            chrom: "chr1".into(),
            start: Some(0),
            end: Some(0),
            cell: Some("AAAA".into()),
        };
        assert_eq!(fragment.complete(), Some(completed("chr1", 0, 0, "AAAA")));
    }

    #[test]
    fn ignores_reads_without_reference_end() {
        let mut assembler = FragmentAssembler::new();
        assert!(!assembler.add_read("chr1", &TestRead::forward("R1", 10, 50).unplaced(), None));
        assert!(assembler.is_empty());
    }

    proptest! {
        #[test]
        fn forward_and_reverse_shifts(
            start in 0i64..1_000_000,
            qstart in 0i64..50,
            len in 1i64..300,
        ) {
            let fwd = TestRead::forward("r", start, len).with_soft_clip(qstart);
            prop_assert_eq!(MateEnd::of(&fwd), Some(MateEnd::Start(start + qstart + 4)));
            let rev = TestRead::reverse("r", start + len, len).with_soft_clip(qstart);
            prop_assert_eq!(MateEnd::of(&rev), Some(MateEnd::End(start + len - 5)));
        }
    }
}
