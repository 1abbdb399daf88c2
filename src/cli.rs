use crate::Args;
use crate::engine::{self, EngineConfig};
use crate::error::{CustomError, Result};
use crate::mask::{ChainParams, MissingnessModel};
use crate::output::{Destination, write_population_file, write_vcf};
use crate::reader::SiteSource;
use crate::reader::prerendered::PrerenderedVcf;
use log::info;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunSpec {
    pub input: PathBuf,
    pub destination: Destination,
    pub population_file: Option<PathBuf>,
    pub expected_sites: Option<usize>,
    pub expected_samples: Option<usize>,
    pub engine: EngineConfig,
}

impl RunSpec {
    // Open the simulator output and check it against the requested dimensions
    pub fn open_source(&self) -> Result<PrerenderedVcf> {
        let source = PrerenderedVcf::open(&self.input)?;
        if let Some(expected) = self.expected_sites {
            if source.n_sites() != expected {
                return Err(CustomError::SiteCount {
                    expected,
                    found: source.n_sites(),
                });
            }
        }
        if let Some(expected) = self.expected_samples {
            if source.samples().len() != expected + 1 {
                return Err(CustomError::SampleCount {
                    expected,
                    found: source.samples().len(),
                });
            }
        }
        if source.samples().is_empty() {
            return Err(CustomError::NoSamples { n_samples: 0 });
        }
        Ok(source)
    }
}

pub fn build_run_spec(args: &Args) -> Result<RunSpec> {
    if args.ploidy == 0 {
        return Err(CustomError::Ploidy { ploidy: args.ploidy });
    }
    check_percent("--sample-missing-percent", args.sample_missing_percent)?;
    let model = select_model(
        args.site_mask_percent,
        [
            args.chain_baseline,
            args.chain_multiplier,
            args.chain_good_to_bad,
            args.chain_bad_to_good,
        ],
    )?;

    Ok(RunSpec {
        input: PathBuf::from(&args.input),
        destination: Destination::from_arg(args.output.as_deref()),
        population_file: args.population_file.as_ref().map(PathBuf::from),
        expected_sites: args.sites,
        expected_samples: args.samples,
        engine: EngineConfig {
            chrom: args.chrom.clone(),
            ploidy: args.ploidy,
            sample_missing_percent: args.sample_missing_percent,
            model,
            seed: args.seed,
            sample_prefix: args.sample_prefix.clone(),
            sample_names: args.sample_names.clone(),
            threads: args.threads,
        },
    })
}

/// Exactly one of the count-based percentage or the full chain parameter set.
/// Chain parameters are ordered baseline, multiplier, good-to-bad, bad-to-good.
pub fn select_model(
    site_mask_percent: Option<f64>,
    chain: [Option<f64>; 4],
) -> Result<MissingnessModel> {
    match (site_mask_percent, chain) {
        (Some(percent), [None, None, None, None]) => {
            check_percent("--site-mask-percent", percent)?;
            Ok(MissingnessModel::Count { percent })
        }
        (None, [Some(baseline), Some(multiplier), Some(good_to_bad), Some(bad_to_good)]) => {
            check_probability("--chain-baseline", baseline)?;
            check_probability("--chain-good-to-bad", good_to_bad)?;
            check_probability("--chain-bad-to-good", bad_to_good)?;
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(CustomError::Multiplier { value: multiplier });
            }
            Ok(MissingnessModel::HiddenChain(ChainParams {
                baseline,
                multiplier,
                good_to_bad,
                bad_to_good,
            }))
        }
        _ => Err(CustomError::ModelAmbiguity),
    }
}

fn check_percent(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(CustomError::PercentRange { name, value })
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CustomError::ProbabilityRange { name, value })
    }
}

pub fn run(spec: &RunSpec, command_line: &str) -> Result<()> {
    let mut source = spec.open_source()?;
    info!(
        "Read {} candidate sites and {} sample columns from {}",
        source.n_sites(),
        source.samples().len(),
        source.path().display()
    );

    let table = engine::run(&spec.engine, &mut source)?;

    match &spec.destination {
        Destination::File(path) => info!("Writing {} rows to {}...", table.rows.len(), path.display()),
        Destination::Console => info!("Writing {} rows to the console...", table.rows.len()),
    }
    write_vcf(&table, command_line, &spec.destination)?;

    if let Some(path) = &spec.population_file {
        info!("Writing population assignments to {}...", path.display());
        write_population_file(&table.samples, path)?;
    }
    Ok(())
}
