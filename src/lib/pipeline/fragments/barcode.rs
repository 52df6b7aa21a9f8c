//! Cell barcode allow-list

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Set of accepted cell barcodes, loaded from a flat text file.
#[derive(Debug, Clone, Default)]
pub struct BarcodeProcessor {
    barcodes: FxHashSet<String>,
}

impl BarcodeProcessor {
    /// Load barcodes from a file, one per line. `.gz` files are decompressed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let reader: Box<dyn BufRead> = if path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("gz"))
            .unwrap_or(false)
        {
            Box::new(BufReader::with_capacity(256 * 1024, MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::with_capacity(256 * 1024, file))
        };

        Self::from_reader(reader)
            .with_context(|| format!("Failed to read barcodes from {}", path.display()))
    }

    fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut barcodes = FxHashSet::default();
        for line in reader.lines() {
            let line = line?;
            let barcode = line.trim();
            if !barcode.is_empty() {
                barcodes.insert(barcode.to_string());
            }
        }
        barcodes.shrink_to_fit();
        Ok(Self { barcodes })
    }

    /// Construct a processor from an explicit list of barcodes.
    pub fn from_vec(barcodes: Vec<String>) -> Self {
        Self {
            barcodes: barcodes.into_iter().collect(),
        }
    }

    /// Check if a barcode is on the allow-list
    #[inline]
    pub fn is_valid(&self, barcode: &str) -> bool {
        self.barcodes.contains(barcode)
    }

    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }
}
