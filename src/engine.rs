use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::error::Result;
use crate::mask::{self, MissingnessModel};
use crate::model::{MissingSamples, VariantRow};
use crate::reader::SiteSource;
use crate::reader::table::VcfTable;
use crate::transform::RowTransformer;

/// The serializer writes 0-based positions; output is 1-based.
const POSITION_OFFSET: u64 = 1;
const UNKNOWN_ID: &str = ".";
const PARALLEL_THRESHOLD: usize = 500;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub chrom: String,
    pub ploidy: usize,
    pub sample_missing_percent: f64,
    pub model: MissingnessModel,
    pub seed: u64,
    pub sample_prefix: String,
    pub sample_names: Option<Vec<String>>,
    pub threads: Option<usize>,
}

/// Masks sites, renders them through `source` and transforms every retained row.
///
/// Randomness is drawn from one stream in a fixed order: the site mask first, then
/// each row's missing samples in row order. Rows are transformed only after all
/// draws are taken, so the result does not depend on the thread count.
pub fn run(config: &EngineConfig, source: &mut dyn SiteSource) -> Result<VcfTable> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let site_mask = mask::generate(&config.model, source.n_sites(), &mut rng);
    info!(
        "Masked {} of {} candidate sites",
        site_mask.n_masked(),
        site_mask.len()
    );

    let rendered = source.render(&site_mask)?;
    let mut table = VcfTable::parse(&rendered, &config.sample_prefix, source.samples().len())?;

    let transformer = RowTransformer::new(
        table.samples.len(),
        config.ploidy,
        config.sample_missing_percent,
    );
    debug!(
        "Marking {} of {} samples missing per row",
        transformer.n_missing(),
        transformer.n_samples().saturating_sub(1)
    );
    let draws: Vec<MissingSamples> = (0..table.rows.len())
        .map(|_| transformer.draw_missing(&mut rng))
        .collect();
    debug!(
        "Drew {} missing genotypes across {} rows",
        draws.iter().map(MissingSamples::len).sum::<usize>(),
        draws.len()
    );

    let rows = transform_rows(&transformer, &table.rows, &draws, config.threads)?;
    table.rows = rows;

    for row in &mut table.rows {
        row.chrom.clone_from(&config.chrom);
        row.pos += POSITION_OFFSET;
        row.id = UNKNOWN_ID.to_string();
    }
    table.drop_reserved_sample();
    if let Some(names) = &config.sample_names {
        table.rename_samples(names)?;
    }
    Ok(table)
}

fn transform_rows(
    transformer: &RowTransformer,
    rows: &[VariantRow],
    draws: &[MissingSamples],
    threads: Option<usize>,
) -> Result<Vec<VariantRow>> {
    let pb = ProgressBar::new(rows.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:30} {pos}/{len} rows")
    {
        pb.set_style(style);
    }

    let transformed = if (threads.is_none() && rows.len() < PARALLEL_THRESHOLD) || threads == Some(1)
    {
        rows.iter()
            .zip(draws)
            .enumerate()
            .map(|(row_idx, (row, missing))| {
                let out = transformer.transform(row_idx, row, missing);
                pb.inc(1);
                out
            })
            .collect::<Result<Vec<_>>>()
    } else {
        let par_transform = || {
            rows.par_iter()
                .zip(draws.par_iter())
                .enumerate()
                .map(|(row_idx, (row, missing))| {
                    let out = transformer.transform(row_idx, row, missing);
                    pb.inc(1);
                    out
                })
                .collect::<Result<Vec<_>>>()
        };
        match threads {
            Some(n) => ThreadPoolBuilder::new()
                .num_threads(n)
                .build()?
                .install(par_transform),
            None => par_transform(),
        }
    };

    pb.abandon();
    transformed
}
