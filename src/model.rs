/// Separator between allele codes inside one phased genotype field.
pub const GT_SEPARATOR: &str = "|";
/// Marker for a missing allele copy.
pub const MISSING_ALLELE: &str = ".";
/// Written to ALT when a row has no alternate alleles, and to REF when every sample is missing.
pub const EMPTY_FIELD: &str = ".";

/// One genomic site's record, as rendered by the serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRow {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub reference: String,
    pub alternates: Vec<String>,
    pub qual: String,
    pub filter: String,
    pub info: String,
    pub format: String,
    /// One genotype field per sample, in column order.
    pub genotypes: Vec<String>,
}

impl VariantRow {
    pub fn alt_field(&self) -> String {
        if self.alternates.is_empty() {
            EMPTY_FIELD.to_string()
        } else {
            self.alternates.join(",")
        }
    }

    pub fn parse_alt_field(field: &str) -> Vec<String> {
        if field == EMPTY_FIELD {
            Vec::new()
        } else {
            field.split(',').map(str::to_string).collect()
        }
    }
}

/// Global site retention, one entry per candidate site. `true` drops the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMask {
    masked: Vec<bool>,
}

impl SiteMask {
    pub fn from_flags(masked: Vec<bool>) -> Self {
        Self { masked }
    }

    pub fn len(&self) -> usize {
        self.masked.len()
    }

    pub fn is_masked(&self, site: usize) -> bool {
        self.masked[site]
    }

    pub fn n_masked(&self) -> usize {
        self.masked.iter().filter(|&&m| m).count()
    }
}

/// Samples whose genotypes are overwritten with the missing encoding for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSamples {
    flags: Vec<bool>,
}

impl MissingSamples {
    pub fn from_indices(n_samples: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut flags = vec![false; n_samples];
        for idx in indices {
            flags[idx] = true;
        }
        Self { flags }
    }

    #[cfg(test)]
    pub fn none(n_samples: usize) -> Self {
        Self {
            flags: vec![false; n_samples],
        }
    }

    pub fn contains(&self, sample: usize) -> bool {
        self.flags.get(sample).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(idx, &f)| f.then_some(idx))
    }
}

/// `ploidy` missing markers, e.g. `.|.`.
pub fn missing_genotype(ploidy: usize) -> String {
    vec![MISSING_ALLELE; ploidy].join(GT_SEPARATOR)
}

/// `round(percent / 100 * total)` with ties going to the even neighbour.
pub fn percent_of(percent: f64, total: usize) -> usize {
    (percent / 100.0 * total as f64).round_ties_even() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genotype_encodings_follow_ploidy() {
        assert_eq!(missing_genotype(3), ".|.|.");
        assert_eq!(missing_genotype(1), ".");
        assert_eq!(missing_genotype(2), ".|.");
    }

    #[test]
    fn percent_rounds_half_to_even() {
        assert_eq!(percent_of(50.0, 5), 2);
        assert_eq!(percent_of(50.0, 7), 4);
        assert_eq!(percent_of(10.0, 16), 2);
        assert_eq!(percent_of(0.0, 100), 0);
        assert_eq!(percent_of(100.0, 9), 9);
    }

    #[test]
    fn alt_field_uses_sentinel_when_empty() {
        assert!(VariantRow::parse_alt_field(".").is_empty());
        assert_eq!(VariantRow::parse_alt_field("C,G"), vec!["C", "G"]);
    }
}
