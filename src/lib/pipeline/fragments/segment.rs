//! Per-read admission into fragment assembly.
//!
//! A read is admitted when its cell barcode can be resolved, the barcode is on
//! the allow-list (if any), its mapping quality reaches the threshold and its
//! reference end is known. Barcode extraction happens first so that a
//! malformed read name is reported even for reads that would be rejected
//! later.

use regex::Regex;
use std::sync::Arc;

use super::barcode::BarcodeProcessor;
use crate::core::error::{FragmentError, Result};
use crate::core::read_filter::DefaultReadFilter;
use crate::core::record::AlignedRead;

/// Default tag holding the corrected cell barcode.
pub const DEFAULT_CB_TAG: &str = "CB";

/// Where the cell barcode of a read is taken from.
#[derive(Debug, Clone)]
pub enum BarcodeSource {
    /// A two-character auxiliary tag. A missing tag yields no barcode.
    Tag([u8; 2]),
    /// The leading part of the read name matched by a regex.
    ReadName { regex: Regex, pattern: String },
}

impl BarcodeSource {
    pub fn tag(tag: &str) -> Result<Self> {
        let bytes: [u8; 2] = tag.as_bytes().try_into().map_err(|_| {
            FragmentError::Config(format!("Barcode tag must be 2 characters, got '{}'", tag))
        })?;
        Ok(BarcodeSource::Tag(bytes))
    }

    /// The pattern must match at the start of the read name.
    pub fn read_name(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(BarcodeSource::ReadName {
            regex,
            pattern: pattern.to_string(),
        })
    }

    /// Resolve the barcode of `read`.
    ///
    /// In read-name mode a name that does not match, or matches only the empty
    /// string, is an [`FragmentError::UnparseableBarcode`].
    pub fn extract<R: AlignedRead>(&self, read: &R) -> Result<Option<String>> {
        match self {
            BarcodeSource::Tag(tag) => Ok(read.string_tag(tag)),
            BarcodeSource::ReadName { regex, pattern } => {
                let unparseable = || FragmentError::UnparseableBarcode {
                    read_name: String::from_utf8_lossy(read.query_name()).into_owned(),
                    pattern: pattern.clone(),
                };
                let name = std::str::from_utf8(read.query_name()).map_err(|_| unparseable())?;
                match regex.find(name) {
                    Some(m) if !m.as_str().is_empty() => Ok(Some(m.as_str().to_string())),
                    _ => Err(unparseable()),
                }
            }
        }
    }
}

impl Default for BarcodeSource {
    fn default() -> Self {
        BarcodeSource::Tag([b'C', b'B'])
    }
}

/// Why a read was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Barcode present but not on the allow-list.
    Barcode,
    MappingQuality,
    /// No resolvable reference end.
    Unmapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentDecision {
    /// The read contributes to assembly; `cell` may be absent in tag mode.
    Accept { cell: Option<String> },
    Reject(RejectReason),
}

/// Combines barcode extraction, the allow-list and the mapping-quality filter.
#[derive(Debug, Clone)]
pub struct SegmentFilter {
    read_filter: DefaultReadFilter,
    barcode_source: BarcodeSource,
    allow_list: Option<Arc<BarcodeProcessor>>,
}

impl SegmentFilter {
    pub fn new(
        min_mapq: u8,
        barcode_source: BarcodeSource,
        allow_list: Option<Arc<BarcodeProcessor>>,
    ) -> Self {
        Self {
            read_filter: DefaultReadFilter::new(min_mapq),
            barcode_source,
            allow_list,
        }
    }

    pub fn barcode_source(&self) -> &BarcodeSource {
        &self.barcode_source
    }

    pub fn evaluate<R: AlignedRead>(&self, read: &R) -> Result<SegmentDecision> {
        let cell = self.barcode_source.extract(read)?;

        if let (Some(allow_list), Some(barcode)) = (&self.allow_list, cell.as_deref()) {
            if !allow_list.is_valid(barcode) {
                return Ok(SegmentDecision::Reject(RejectReason::Barcode));
            }
        }
        if !self.read_filter.passes_mapq(read) {
            return Ok(SegmentDecision::Reject(RejectReason::MappingQuality));
        }
        if !self.read_filter.is_placed(read) {
            return Ok(SegmentDecision::Reject(RejectReason::Unmapped));
        }

        Ok(SegmentDecision::Accept { cell })
    }
}
