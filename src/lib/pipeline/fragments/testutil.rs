//! Lightweight reads for exercising the fragment pipeline without BAM files.

use crate::core::record::AlignedRead;

#[derive(Debug, Clone)]
pub(crate) struct TestRead {
    name: String,
    start: i64,
    end: Option<i64>,
    qstart: i64,
    reverse: bool,
    mapq: u8,
    tags: Vec<([u8; 2], String)>,
}

impl TestRead {
    /// Forward mate aligned over `[start, start + len)`.
    pub(crate) fn forward(name: &str, start: i64, len: i64) -> Self {
        Self {
            name: name.to_string(),
            start,
            end: Some(start + len),
            qstart: 0,
            reverse: false,
            mapq: 60,
            tags: Vec::new(),
        }
    }

    /// Reverse mate aligned over `[end - len, end)`.
    pub(crate) fn reverse(name: &str, end: i64, len: i64) -> Self {
        Self {
            reverse: true,
            ..Self::forward(name, end - len, len)
        }
    }

    pub(crate) fn with_cb(mut self, barcode: &str) -> Self {
        self.tags.push(([b'C', b'B'], barcode.to_string()));
        self
    }

    pub(crate) fn with_mapq(mut self, mapq: u8) -> Self {
        self.mapq = mapq;
        self
    }

    pub(crate) fn with_soft_clip(mut self, qstart: i64) -> Self {
        self.qstart = qstart;
        self
    }

    pub(crate) fn unplaced(mut self) -> Self {
        self.end = None;
        self
    }
}

impl AlignedRead for TestRead {
    fn query_name(&self) -> &[u8] {
        self.name.as_bytes()
    }

    fn reference_start(&self) -> i64 {
        self.start
    }

    fn reference_end(&self) -> Option<i64> {
        self.end
    }

    fn query_alignment_start(&self) -> i64 {
        self.qstart
    }

    fn is_reverse(&self) -> bool {
        self.reverse
    }

    fn mapping_quality(&self) -> u8 {
        self.mapq
    }

    fn string_tag(&self, tag: &[u8]) -> Option<String> {
        self.tags
            .iter()
            .find(|(t, _)| t.as_slice() == tag)
            .map(|(_, v)| v.clone())
    }
}
