//! Fragment file reading and writing.
//!
//! One fragment per line, `chrom  start  end  cell  count`, tab separated and
//! without a header. Paths ending in `.gz`, `.bgz` or `.bgzf` are BGZF
//! compressed; `-` is stdout/stdin.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use super::dedup::DedupedFragment;
use crate::core::fs::{is_bgzipped, is_stdio, make_parent_dirs};
use crate::core::io::{get_reader, get_writer};

/// Compression level for BGZF output.
pub const COMPRESSION_LEVEL: u32 = 6;

/// Write `fragments` in the given order.
pub fn write_fragments<P: AsRef<Path>>(
    path: P,
    fragments: &[DedupedFragment],
    threads: usize,
) -> Result<()> {
    let path = path.as_ref();
    if !is_stdio(path) {
        make_parent_dirs(path)?;
    }
    let bgzipped = !is_stdio(path) && is_bgzipped(path);

    let mut writer = get_writer(&Some(path), bgzipped, false, threads, COMPRESSION_LEVEL)?;
    for fragment in fragments {
        writer.serialize(fragment)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!("Wrote {} fragments to {}", fragments.len(), path.display());
    Ok(())
}

/// Parse a fragment file written by [`write_fragments`].
pub fn read_fragments<P: AsRef<Path>>(path: P) -> Result<Vec<DedupedFragment>> {
    let path = path.as_ref();
    let bgzipped = !is_stdio(path) && is_bgzipped(path);
    let mut reader = get_reader(&Some(path), false, bgzipped)?;

    reader
        .deserialize()
        .enumerate()
        .map(|(line, record)| {
            record.with_context(|| format!("Malformed fragment on line {} of {}", line + 1, path.display()))
        })
        .collect()
}
