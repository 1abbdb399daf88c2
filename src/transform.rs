use itertools::Itertools;
use rand::Rng;
use rand::seq::index;

use crate::error::{CustomError, Result};
use crate::model::{
    EMPTY_FIELD, GT_SEPARATOR, MissingSamples, VariantRow, missing_genotype, percent_of,
};

/// Sample slot whose missingness moves the reference to the next retained sample.
const RESERVED_REFERENCE_SLOT: usize = 1;

/// Re-derives REF from a designated sample, compacts ALT and applies per-row missingness.
#[derive(Debug, Clone)]
pub struct RowTransformer {
    n_samples: usize,
    ploidy: usize,
    missing_percent: f64,
    missing_gt: String,
}

impl RowTransformer {
    pub fn new(n_samples: usize, ploidy: usize, missing_percent: f64) -> Self {
        Self {
            n_samples,
            ploidy,
            missing_percent,
            missing_gt: missing_genotype(ploidy),
        }
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Every sample outside slot 0 is missing, so REF is reported missing too.
    pub fn all_missing(&self) -> bool {
        self.missing_percent == 100.0
    }

    /// Samples to mark missing per row, drawn from the pool that excludes slot 0.
    pub fn n_missing(&self) -> usize {
        let pool = self.n_samples.saturating_sub(1);
        percent_of(self.missing_percent, pool).min(pool)
    }

    pub fn draw_missing<R: Rng + ?Sized>(&self, rng: &mut R) -> MissingSamples {
        let pool = self.n_samples.saturating_sub(1);
        let picked = index::sample(rng, pool, self.n_missing());
        MissingSamples::from_indices(self.n_samples, picked.into_iter().map(|i| i + 1))
    }

    /// Flat allele position whose code becomes the new REF.
    pub fn reference_position(&self, missing: &MissingSamples) -> usize {
        if !missing.contains(RESERVED_REFERENCE_SLOT) || self.all_missing() {
            return 0;
        }
        (RESERVED_REFERENCE_SLOT + 1..self.n_samples)
            .find(|&sample| !missing.contains(sample))
            .map_or(0, |sample| sample * self.ploidy)
    }

    pub fn transform(
        &self,
        row_idx: usize,
        row: &VariantRow,
        missing: &MissingSamples,
    ) -> Result<VariantRow> {
        if row.genotypes.len() != self.n_samples {
            return Err(CustomError::RowFields {
                row: row_idx,
                n_fields: row.genotypes.len(),
                expected: self.n_samples,
            });
        }
        if self.n_samples == 0 {
            return Err(CustomError::NoSamples { n_samples: 0 });
        }

        // Missing-to-be samples read as all-REF so they never drive the rebasing.
        let mut codes = Vec::with_capacity(self.n_samples * self.ploidy);
        for (sample, gt) in row.genotypes.iter().enumerate() {
            if missing.contains(sample) {
                codes.extend(std::iter::repeat_n(0, self.ploidy));
            } else {
                self.parse_genotype(row_idx, sample, gt, &mut codes)?;
            }
        }

        let mut alleles: Vec<&str> = Vec::with_capacity(row.alternates.len() + 1);
        alleles.push(row.reference.as_str());
        alleles.extend(row.alternates.iter().map(String::as_str));
        if let Some(&code) = codes.iter().find(|&&c| c >= alleles.len()) {
            return Err(CustomError::InputAlleleOutOfRange {
                row: row_idx,
                code,
                n_alleles: alleles.len(),
            });
        }

        let target = codes[self.reference_position(missing)];
        let (reference, alleles) = if target != 0 {
            rebase(&alleles, target, &mut codes)
        } else {
            (alleles[0], alleles)
        };

        let alternates = compact(&alleles, &mut codes);
        self.validate(row_idx, &codes, missing, alternates.len())?;

        let mut genotypes: Vec<String> = codes
            .chunks(self.ploidy)
            .map(|chunk| chunk.iter().join(GT_SEPARATOR))
            .collect();
        for sample in missing.indices() {
            genotypes[sample] = self.missing_gt.clone();
        }

        let reference = if self.all_missing() {
            EMPTY_FIELD.to_string()
        } else {
            reference.to_string()
        };

        Ok(VariantRow {
            reference,
            alternates,
            genotypes,
            ..row.clone()
        })
    }

    fn parse_genotype(
        &self,
        row_idx: usize,
        sample: usize,
        gt: &str,
        codes: &mut Vec<usize>,
    ) -> Result<()> {
        let before = codes.len();
        for part in gt.split(GT_SEPARATOR) {
            let code = part.parse().map_err(|_| CustomError::GenotypeParse {
                row: row_idx,
                sample,
                genotype: gt.to_string(),
            })?;
            codes.push(code);
        }
        if codes.len() - before != self.ploidy {
            return Err(CustomError::GenotypePloidy {
                row: row_idx,
                sample,
                genotype: gt.to_string(),
                ploidy: self.ploidy,
            });
        }
        Ok(())
    }

    fn validate(
        &self,
        row_idx: usize,
        codes: &[usize],
        missing: &MissingSamples,
        n_alternates: usize,
    ) -> Result<()> {
        for (sample, chunk) in codes.chunks(self.ploidy).enumerate() {
            if missing.contains(sample) {
                continue;
            }
            if let Some(&code) = chunk.iter().find(|&&c| c > n_alternates) {
                return Err(CustomError::AlleleIndexOutOfRange {
                    row: row_idx,
                    code,
                    max_code: n_alternates,
                });
            }
        }
        Ok(())
    }
}

/// Promotes `alleles[target]` to REF. Returns the new REF and the reordered allele
/// list `[new REF, remaining ALTs..., old REF]`, remapping `codes` to match.
fn rebase<'a>(alleles: &[&'a str], target: usize, codes: &mut [usize]) -> (&'a str, Vec<&'a str>) {
    let n_alleles = alleles.len();
    let mut remap = vec![0usize; n_alleles];
    remap[0] = n_alleles - 1;
    for (old, slot) in remap.iter_mut().enumerate().skip(1) {
        *slot = match old.cmp(&target) {
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => old - 1,
            std::cmp::Ordering::Less => old,
        };
    }

    let mut reordered = Vec::with_capacity(n_alleles);
    reordered.push(alleles[target]);
    reordered.extend(
        alleles
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(i, _)| i != target)
            .map(|(_, &a)| a),
    );
    reordered.push(alleles[0]);

    for code in codes.iter_mut() {
        *code = remap[*code];
    }
    (alleles[target], reordered)
}

/// Drops ALT entries no code refers to and renumbers the rest in ascending order.
fn compact(alleles: &[&str], codes: &mut [usize]) -> Vec<String> {
    let mut used = vec![false; alleles.len()];
    for &code in codes.iter() {
        used[code] = true;
    }

    let mut table = vec![0usize; alleles.len()];
    let mut alternates = Vec::new();
    for (old, _) in used.iter().enumerate().skip(1).filter(|&(_, &u)| u) {
        alternates.push(alleles[old].to_string());
        table[old] = alternates.len();
    }

    for code in codes.iter_mut() {
        *code = table[*code];
    }
    alternates
}
