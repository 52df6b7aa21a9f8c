//! Duplicate collapsing of completed fragments.
//!
//! Fragments sharing `(chrom, start, end)` are duplicates regardless of the
//! barcode they carry. Counts are first tallied per coordinate and barcode,
//! then laid out as a sparse matrix with one row per coordinate and one column
//! per barcode. Each row becomes a single fragment attributed to its
//! best-supported barcode.
//!
//! The reported count is the row total, i.e. the depth of every barcode seen
//! at that coordinate. Reads carrying a minority barcode are treated as
//! barcode errors of the dominant molecule and their depth is folded into it.

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smartstring::alias::String;

use super::assembler::CompletedFragment;
use super::id_lookup::IdLookup;
use crate::core::error::{FragmentError, Result};
use crate::core::sparse::SparseOps;

/// A unique fragment of a partition with its duplicate count.
///
/// Field order is the column order of the fragment file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupedFragment {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub cell: String,
    pub count: u32,
}

type Coordinate<'a> = (&'a str, i64, i64);

/// Collapse duplicates, returning one fragment per coordinate sorted by
/// `(chrom, start, end)`.
///
/// When several barcodes tie for the most reads at a coordinate, the barcode
/// whose first occurrence anywhere in `fragments` comes earliest wins.
pub fn collapse_fragments(fragments: &[CompletedFragment]) -> Result<Vec<DedupedFragment>> {
    if fragments.is_empty() {
        return Ok(Vec::new());
    }

    let mut pair_counts: FxHashMap<(Coordinate<'_>, &str), u32> = FxHashMap::default();
    for fragment in fragments {
        let key = (
            (fragment.chrom.as_str(), fragment.start, fragment.end),
            fragment.cell.as_str(),
        );
        *pair_counts.entry(key).or_insert(0) += 1;
    }

    let mut coordinates: IdLookup<Coordinate<'_>> = IdLookup::new();
    let mut barcodes: IdLookup<&str> = IdLookup::new();
    for fragment in fragments {
        coordinates.insert((fragment.chrom.as_str(), fragment.start, fragment.end));
        barcodes.insert(fragment.cell.as_str());
    }

    let mut triplets = Vec::with_capacity(pair_counts.len());
    for ((coordinate, barcode), count) in pair_counts {
        let row = coordinates.id_of(&coordinate).ok_or_else(|| {
            FragmentError::SparseMatrix(format!("Unindexed coordinate {:?}", coordinate))
        })?;
        let col = barcodes.id_of(&barcode).ok_or_else(|| {
            FragmentError::SparseMatrix(format!("Unindexed barcode {}", barcode))
        })?;
        triplets.push((row, col, count));
    }

    let matrix = SparseOps::from_triplets_u32(coordinates.len(), barcodes.len(), triplets)?;
    let (density, nnz, _) = SparseOps::get_density_stats(&matrix);
    debug!(
        "Collapsing {} fragments: {} coordinates x {} barcodes ({} non-zero, density {:.2e})",
        fragments.len(),
        coordinates.len(),
        barcodes.len(),
        nnz,
        density
    );

    let row_sums = SparseOps::compute_row_sums(&matrix);
    let row_argmax = SparseOps::compute_row_argmax(&matrix);

    let mut collapsed = Vec::with_capacity(coordinates.len());
    for (row, (count, argmax)) in row_sums.into_iter().zip(row_argmax).enumerate() {
        let &(chrom, start, end) = coordinates
            .key_of(row)
            .ok_or_else(|| FragmentError::SparseMatrix(format!("No coordinate for row {}", row)))?;
        let cell = argmax
            .and_then(|col| barcodes.key_of(col))
            .ok_or_else(|| {
                FragmentError::SparseMatrix(format!(
                    "Fragment {}:{}-{} has no supporting reads",
                    chrom, start, end
                ))
            })?;
        collapsed.push(DedupedFragment {
            chrom: String::from(chrom),
            start,
            end,
            cell: String::from(*cell),
            count,
        });
    }

    collapsed.sort_by(|a, b| (&a.chrom, a.start, a.end).cmp(&(&b.chrom, b.start, b.end)));
    Ok(collapsed)
}
