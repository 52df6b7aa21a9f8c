use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use scfrag_lib::core::error::FragmentError;
use scfrag_lib::pipeline::fragments::segment::{BarcodeSource, DEFAULT_CB_TAG};
use std::path::PathBuf;
use structopt::StructOpt;

/// Default minimum mapping quality.
pub const DEFAULT_MIN_MAPQ: u8 = 30;

/// Default contig filter: names starting with `chr`, matched case-insensitively.
pub const DEFAULT_CONTIG_PATTERN: &str = "^chr";

lazy_static! {
    /// [`DEFAULT_MIN_MAPQ`] as a string.
    pub static ref DEFAULT_MIN_MAPQ_STR: String = DEFAULT_MIN_MAPQ.to_string();
}

/// CLI arguments for the `fragments` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(author, name = "fragments")]
pub struct FragmentsArgs {
    /// Input indexed BAM file.
    #[structopt(short, long, parse(from_os_str))]
    pub bam: PathBuf,

    /// Output fragment file (`-` for stdout, `.gz` for BGZF compression).
    #[structopt(short, long, parse(from_os_str))]
    pub fragments: PathBuf,

    /// Minimum mapping quality for a read to contribute to a fragment.
    #[structopt(long, short = "q", default_value = DEFAULT_MIN_MAPQ_STR.as_str())]
    pub min_mapq: u8,

    /// Number of contigs processed in parallel.
    #[structopt(long, short = "t", default_value = "1")]
    pub threads: usize,

    /// Tag holding the cell barcode.
    #[structopt(long, default_value = DEFAULT_CB_TAG)]
    pub cb_tag: String,

    /// Regex selecting contigs to process (case-insensitive).
    #[structopt(long, short = "c", default_value = DEFAULT_CONTIG_PATTERN)]
    pub chromosomes: String,

    /// Visit every contig in the BAM header, ignoring `--chromosomes`.
    #[structopt(long = "allcontigs", short = "A")]
    pub all_contigs: bool,

    /// Regex extracting the cell barcode from the start of the read name instead
    /// of the barcode tag, e.g. `[^:]*`.
    #[structopt(long)]
    pub readname_barcode: Option<String>,

    /// File of cell barcodes to keep, one per line. Keeps every barcode when absent.
    #[structopt(long, parse(from_os_str))]
    pub barcodes: Option<PathBuf>,
}

/// Validated configuration derived from [`FragmentsArgs`].
#[derive(Debug, Clone)]
pub struct FragmentsConfig {
    pub bam: PathBuf,
    pub output: PathBuf,
    pub min_mapq: u8,
    pub threads: usize,
    pub barcode_source: BarcodeSource,
    pub contig_filter: Option<Regex>,
    pub barcodes: Option<PathBuf>,
}

impl TryFrom<FragmentsArgs> for FragmentsConfig {
    type Error = FragmentError;

    fn try_from(args: FragmentsArgs) -> Result<Self, Self::Error> {
        let barcode_source = match &args.readname_barcode {
            Some(pattern) => BarcodeSource::read_name(pattern)?,
            None => BarcodeSource::tag(&args.cb_tag)?,
        };

        let contig_filter = if args.all_contigs {
            None
        } else {
            Some(
                RegexBuilder::new(&args.chromosomes)
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(FragmentsConfig {
            bam: args.bam,
            output: args.fragments,
            min_mapq: args.min_mapq,
            threads: args.threads,
            barcode_source,
            contig_filter,
            barcodes: args.barcodes,
        })
    }
}
