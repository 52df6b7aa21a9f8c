//! scfrag - single-cell ATAC fragment extraction
//!
//! scfrag reads an indexed, cell-barcoded BAM file of paired-end ATAC reads and
//! writes one line per unique fragment: chromosome, Tn5-corrected start and
//! end, the most likely cell barcode and the number of reads supporting it.
//!
//! # Usage
//!
//! ```bash
//! # Fragments from the CB tag, canonical chr* contigs, 8 contigs at a time
//! scfrag fragments --bam possorted.bam --fragments fragments.tsv.gz -t 8
//!
//! # Barcode stored before the first ':' of the read name, restricted to known cells
//! scfrag fragments -b reads.bam -f - --readname-barcode '[^:]*' --barcodes cells.txt
//! ```

extern crate scfrag_lib;
pub mod commands;
use anyhow::Result;
use env_logger::Env;
use log::*;
use scfrag_lib::utils;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case", author, about)]
/// Single-cell ATAC fragment extraction and duplicate collapsing
struct Args {
    #[structopt(subcommand)]
    subcommand: Subcommand,
}

#[derive(StructOpt)]
enum Subcommand {
    /// Create a deduplicated fragment file from a BAM file
    Fragments(commands::FragmentsArgs),
}

impl Subcommand {
    fn run(self) -> Result<()> {
        match self {
            Subcommand::Fragments(args) => commands::run_fragments(args)?,
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = Args::from_args().subcommand.run() {
        if utils::is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
