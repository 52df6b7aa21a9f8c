use anyhow::{anyhow, Result};
use log::*;
use regex::Regex;
use rust_htslib::bam::HeaderView;

use super::types::Partition;

/// Turn `(name, length)` targets into partitions, keeping names matched by
/// `filter` (every target when `None`). Zero-length targets are skipped.
pub fn select_partitions<I>(targets: I, filter: Option<&Regex>) -> Vec<Partition>
where
    I: IntoIterator<Item = (String, u32)>,
{
    targets
        .into_iter()
        .enumerate()
        .filter_map(|(tid, (name, len))| {
            if let Some(filter) = filter {
                if !filter.is_match(&name) {
                    trace!("Skipping contig {} (does not match /{}/)", name, filter);
                    return None;
                }
            }
            if len == 0 {
                warn!("Skipping zero-length contig {}", name);
                return None;
            }
            Some(Partition {
                tid: tid as u32,
                name,
                len,
            })
        })
        .collect()
}

/// Enumerate the partitions of a BAM header.
pub fn header_to_partitions(header: &HeaderView, filter: Option<&Regex>) -> Result<Vec<Partition>> {
    let mut targets = Vec::with_capacity(header.target_count() as usize);
    for tid in 0..header.target_count() {
        let len: u32 = header
            .target_len(tid)
            .ok_or_else(|| anyhow!("Missing target length for TID {}", tid))?
            .try_into()
            .map_err(|_| anyhow!("Target length overflow for TID {}", tid))?;
        let name = std::str::from_utf8(header.tid2name(tid))
            .map_err(|_| anyhow!("Invalid contig name at TID {}", tid))?
            .to_string();
        targets.push((name, len));
    }
    Ok(select_partitions(targets, filter))
}
