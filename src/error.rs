use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("could not read {path}")]
    ReadWithPath {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write to {path}")]
    Write {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write to console")]
    WriteConsole {
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse rendered variant table")]
    CsvRead(#[from] csv::Error),

    #[error("could not assemble variant table")]
    CsvWrite {
        #[source]
        source: csv::Error,
    },

    #[error("no \"##\" header lines before the column header")]
    MissingHeader,

    #[error("no \"#CHROM\" column header line found")]
    MissingColumnHeader,

    #[error("expected column {idx} to be {expected} (got {found})")]
    ColumnLayout {
        idx: usize,
        expected: &'static str,
        found: String,
    },

    #[error("sample columns must run {first}..{last} directly after FORMAT")]
    SampleColumns { first: String, last: String },

    #[error("expected {expected} candidate sites (got {found})")]
    SiteCount { expected: usize, found: usize },

    #[error("expected {expected} samples plus the reserved slot (got {found} sample columns)")]
    SampleCount { expected: usize, found: usize },

    #[error("expected {expected} fields (got {n_fields}) in row {row}")]
    RowFields {
        row: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("could not parse POS \"{value}\" in row {row}")]
    Position {
        row: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("could not parse genotype \"{genotype}\" of sample {sample} in row {row}")]
    GenotypeParse {
        row: usize,
        sample: usize,
        genotype: String,
    },

    #[error("genotype \"{genotype}\" of sample {sample} in row {row} is not of ploidy {ploidy}")]
    GenotypePloidy {
        row: usize,
        sample: usize,
        genotype: String,
        ploidy: usize,
    },

    #[error("row {row} references allele {code} but only {n_alleles} alleles are listed")]
    InputAlleleOutOfRange {
        row: usize,
        code: usize,
        n_alleles: usize,
    },

    #[error("internal consistency fault: row {row} has allele {code} outside 0..={max_code}")]
    AlleleIndexOutOfRange {
        row: usize,
        code: usize,
        max_code: usize,
    },

    #[error(
        "specify exactly one site-missingness model: --site-mask-percent or all four --chain-* options"
    )]
    ModelAmbiguity,

    #[error("{name} must lie in [0, 100] (got {value})")]
    PercentRange { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1] (got {value})")]
    ProbabilityRange { name: &'static str, value: f64 },

    #[error("chain multiplier must be finite and non-negative (got {value})")]
    Multiplier { value: f64 },

    #[error("ploidy must be at least 1 (got {ploidy})")]
    Ploidy { ploidy: usize },

    #[error("need at least 1 sample column (got {n_samples})")]
    NoSamples { n_samples: usize },

    #[error("got {n_names} sample names for only {n_samples} samples")]
    TooManySampleNames { n_names: usize, n_samples: usize },

    #[error("could not build worker thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CustomError>;
