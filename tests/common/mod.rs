use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const N_SITES: usize = 40;
/// Output samples; the rendered input carries one more (the reserved slot).
pub const N_SAMPLES: usize = 6;
pub const PLOIDY: usize = 2;
const ALLELES: [&str; 4] = ["A", "C", "G", "T"];

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

pub struct Dataset {
    pub input: PathBuf,
    pub output: PathBuf,
    pub population_file: PathBuf,
}

pub fn create_dataset(label: &str) -> io::Result<Dataset> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base_dir = std::env::temp_dir().join("vcfmask-tests").join(format!(
        "{}-{}-{}",
        std::process::id(),
        id,
        label
    ));
    fs::create_dir_all(&base_dir)?;

    let input = base_dir.join("simulated.vcf");
    write_rendered_vcf(&input)?;
    Ok(Dataset {
        input,
        output: base_dir.join("masked.vcf"),
        population_file: base_dir.join("populations.txt"),
    })
}

/// Genotype of `sample` at `site`: every third site is biallelic, the rest multiallelic.
fn genotype(site: usize, sample: usize) -> [usize; PLOIDY] {
    if site % 3 == 0 {
        [(site + sample) % 2, sample % 2]
    } else {
        [(site + sample) % 4, (site * sample + 1) % 4]
    }
}

fn write_rendered_vcf(path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "##fileformat=VCFv4.2")?;
    writeln!(file, "##source=tskit 0.6.4")?;
    writeln!(file, "##FILTER=<ID=PASS,Description=\"All filters passed\">")?;
    writeln!(file, "##contig=<ID=1,length={N_SITES}>")?;
    writeln!(
        file,
        "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">"
    )?;
    write!(file, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT")?;
    for sample in 0..=N_SAMPLES {
        write!(file, "\ttsk_{sample}")?;
    }
    writeln!(file)?;

    for site in 0..N_SITES {
        let alt = if site % 3 == 0 { "C" } else { "C,G,T" };
        write!(file, "1\t{site}\t{site}\tA\t{alt}\t.\tPASS\t.\tGT")?;
        for sample in 0..=N_SAMPLES {
            let [a, b] = genotype(site, sample);
            write!(file, "\t{a}|{b}")?;
        }
        writeln!(file)?;
    }
    Ok(())
}

/// Allele strings carried by `sample` at `site`, before any transformation.
pub fn input_alleles(site: usize, sample: usize) -> [&'static str; PLOIDY] {
    genotype(site, sample).map(|code| ALLELES[code])
}

pub struct ParsedVcf {
    pub header: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn parse_vcf(text: &str) -> ParsedVcf {
    let mut header = Vec::new();
    let mut columns = Vec::new();
    let mut rows = Vec::new();
    for line in text.lines() {
        if line.starts_with("##") {
            header.push(line.to_string());
        } else if let Some(stripped) = line.strip_prefix('#') {
            columns = stripped.split('\t').map(str::to_string).collect();
        } else if !line.is_empty() {
            rows.push(line.split('\t').map(str::to_string).collect());
        }
    }
    ParsedVcf {
        header,
        columns,
        rows,
    }
}
