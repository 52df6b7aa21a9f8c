mod args;

use anyhow::{Context, Result};
use log::info;
use scfrag_lib::engine::ParGranges;
use scfrag_lib::pipeline::fragments::{
    output, BarcodeProcessor, FragmentProcessor, SegmentFilter,
};
use scfrag_lib::utils;
use std::sync::Arc;

pub use args::{FragmentsArgs, FragmentsConfig};

/// Execute the `fragments` command end-to-end.
pub fn run_fragments(args: FragmentsArgs) -> Result<()> {
    let config = FragmentsConfig::try_from(args).context("Invalid arguments")?;

    info!("Running scfrag fragments on {:?}", config.bam);
    let threads = utils::determine_allowed_cpus(config.threads)?;

    let allow_list = match &config.barcodes {
        Some(path) => {
            let barcodes = BarcodeProcessor::from_file(path)?;
            info!("Loaded {} allowed barcodes from {:?}", barcodes.len(), path);
            Some(Arc::new(barcodes))
        }
        None => None,
    };

    let filter = SegmentFilter::new(config.min_mapq, config.barcode_source.clone(), allow_list);
    let processor = FragmentProcessor::new(config.bam.clone(), filter);

    let runner = ParGranges::new(
        config.bam.clone(),
        config.contig_filter.clone(),
        Some(threads),
        processor,
    )?;

    let fragments = runner.process()?;
    let total_reads: u64 = fragments.iter().map(|f| f.count as u64).sum();
    info!(
        "Collapsed {} fragment reads into {} unique fragments",
        total_reads,
        fragments.len()
    );

    output::write_fragments(&config.output, &fragments, threads)?;
    info!("Fragment extraction complete -> {:?}", config.output);
    Ok(())
}
