mod cli;
mod engine;
mod error;
mod mask;
mod model;
mod output;
mod reader;
mod transform;

use crate::error::Result;
use clap::Parser;
use miette::IntoDiagnostic;

/// Inject reproducible missingness and reference rebasing into simulated VCF data.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Unmasked VCF rendered by the simulator (one data line per candidate site).
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    input: String,

    /// Chromosome label written to every row.
    #[arg(long, default_value = "1")]
    chrom: String,

    /// Expected number of candidate sites in the input.
    #[arg(long)]
    sites: Option<usize>,

    /// Expected number of output samples (the reserved reference slot excluded).
    #[arg(long)]
    samples: Option<usize>,

    /// Allele copies per sample.
    #[arg(long, default_value_t = 2)]
    ploidy: usize,

    /// Percentage of samples marked missing at every retained site.
    #[arg(long, default_value_t = 0.0)]
    sample_missing_percent: f64,

    /// Percentage of candidate sites dropped, chosen uniformly.
    #[arg(long)]
    site_mask_percent: Option<f64>,

    /// Hidden-chain model: missingness probability in the good state.
    #[arg(long)]
    chain_baseline: Option<f64>,

    /// Hidden-chain model: factor applied to the baseline in the bad state.
    #[arg(long)]
    chain_multiplier: Option<f64>,

    /// Hidden-chain model: probability of moving from the good to the bad state.
    #[arg(long)]
    chain_good_to_bad: Option<f64>,

    /// Hidden-chain model: probability of moving from the bad to the good state.
    #[arg(long)]
    chain_bad_to_good: Option<f64>,

    /// Random seed.
    #[arg(long)]
    seed: u64,

    /// Output VCF path. Omit, or pass "None", to print to the console.
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<String>,

    /// Write a population-assignment file for the output samples.
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    population_file: Option<String>,

    /// Display names for the output samples, in column order.
    #[arg(long, value_delimiter = ',')]
    sample_names: Option<Vec<String>>,

    /// Prefix of the simulator's sample columns.
    #[arg(long, default_value = "tsk_")]
    sample_prefix: String,

    /// Number of threads used to transform rows.
    #[arg(short, long)]
    threads: Option<usize>,
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let run_spec = cli::build_run_spec(&args)?;
    let command_line = std::env::args().collect::<Vec<_>>().join(" ");
    cli::run(&run_spec, &command_line)
}

fn main() -> miette::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    try_main().into_diagnostic()
}
