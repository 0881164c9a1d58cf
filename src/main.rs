#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]

//! Scores candidate somatic variants from a tumor/normal pair and writes them as VCF.
mod cli;

use lancet::vcf::read_candidates_from_path;
use lancet::{Error, Result};
use log::info;
use std::io::Write;
use structopt::StructOpt;

fn main() -> Result<()> {
    let opt = cli::Lancet::from_args();
    opt.set_logging();

    rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build_global()
        .map_err(|_| Error::ThreadError)?;

    let filters = opt.filters();

    info!("Reading candidates from {}", opt.candidates.display());
    let mut variants = read_candidates_from_path(&opt.candidates)?;
    info!("Scoring {} candidate variants...", variants.len());
    variants.update()?;
    variants.sort();

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    variants.write_vcf(&filters, &mut out)?;
    out.flush()?;

    Ok(())
}
