use anyhow::{Context, Result};
use log::*;
use rayon::prelude::*;
use regex::Regex;
use rust_htslib::bam::{IndexedReader, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::partitions;
use super::types::{Partition, RegionProcessor};

/// Parallel BAM partition executor driven by [`RegionProcessor`] implementations.
#[derive(Debug)]
pub struct ParGranges<R: 'static + RegionProcessor + Send + Sync> {
    /// Path to an indexed BAM file
    reads: PathBuf,
    /// Contig names to keep; every contig when `None`
    contig_filter: Option<Regex>,
    /// Number of partitions processed concurrently
    threads: usize,
    /// The rayon threadpool to operate in
    pool: rayon::ThreadPool,
    /// The implementation of [`RegionProcessor`] applied to each partition
    processor: R,
}

impl<R: RegionProcessor + Send + Sync> ParGranges<R> {
    /// Create a new [`ParGranges`] executor.
    pub fn new(
        reads: PathBuf,
        contig_filter: Option<Regex>,
        threads: Option<usize>,
        processor: R,
    ) -> Result<Self> {
        let requested_threads = threads.unwrap_or_else(num_cpus::get);
        let threads = std::cmp::max(requested_threads, 1);
        info!("Using {} worker threads.", threads);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build Rayon thread pool")?;

        Ok(Self {
            reads,
            contig_filter,
            threads,
            pool,
            processor,
        })
    }

    /// Partitions selected from the BAM header, in header order.
    pub fn partitions(&self) -> Result<Vec<Partition>> {
        let reader = IndexedReader::from_path(&self.reads)
            .with_context(|| format!("Failed to open indexed BAM {}", self.reads.display()))?;
        partitions::header_to_partitions(reader.header(), self.contig_filter.as_ref())
    }

    /// Process every partition and concatenate the results in partition order.
    ///
    /// Blocks until all partitions are done. The first failing partition fails
    /// the whole run.
    pub fn process(self) -> Result<Vec<R::P>> {
        info!("Reading from {:?}", self.reads);
        let partitions = self.partitions()?;
        if partitions.is_empty() {
            warn!("No contigs in {} passed the contig filter", self.reads.display());
            return Ok(Vec::new());
        }
        info!(
            "Processing {} partitions on {} threads",
            partitions.len(),
            self.threads
        );
        Self::run(&self.pool, &self.processor, partitions)
    }

    fn run(pool: &rayon::ThreadPool, processor: &R, partitions: Vec<Partition>) -> Result<Vec<R::P>> {
        let total = partitions.len();
        let completed = AtomicUsize::new(0);

        let per_partition: Vec<Vec<R::P>> = pool.install(|| {
            partitions
                .into_par_iter()
                .map(|partition| -> Result<Vec<R::P>> {
                    trace!("Processing {} on TID {}", partition, partition.tid);
                    let results = processor
                        .process_region(&partition)
                        .with_context(|| format!("Failed to process partition {}", partition))?;
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    info!(
                        "Finished {} ({} / {} partitions)",
                        partition.name, done, total
                    );
                    Ok(results)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(per_partition.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct TestProcessor;

    impl RegionProcessor for TestProcessor {
        type P = (String, u32);

        fn process_region(&self, partition: &Partition) -> Result<Vec<Self::P>> {
            if partition.name == "bad" {
                return Err(anyhow!("unreadable"));
            }
            Ok((0..partition.len)
                .map(|i| (partition.name.clone(), i))
                .collect())
        }
    }

    fn partition(tid: u32, name: &str, len: u32) -> Partition {
        Partition {
            tid,
            name: name.to_string(),
            len,
        }
    }

    fn pool(threads: usize) -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    #[test]
    fn concatenates_in_partition_order() {
        let partitions: Vec<_> = (0..16)
            .map(|i| partition(i, &format!("chr{}", i), (i % 3) + 1))
            .collect();
        let expected: Vec<_> = partitions
            .iter()
            .flat_map(|p| (0..p.len).map(move |i| (p.name.clone(), i)))
            .collect();

        let results =
            ParGranges::<TestProcessor>::run(&pool(4), &TestProcessor, partitions).unwrap();
        assert_eq!(results, expected);
    }

    #[test]
    fn failing_partition_fails_the_run() {
        let partitions = vec![partition(0, "chr1", 2), partition(1, "bad", 2)];
        let err = ParGranges::<TestProcessor>::run(&pool(2), &TestProcessor, partitions)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("unreadable"));
    }
}
