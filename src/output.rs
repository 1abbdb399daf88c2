use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CustomError, Result};
use crate::reader::table::VcfTable;

const SOURCE_PREFIX: &str = "##source=";
/// Population label written for every sample.
const POPULATION_LABEL: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Console,
}

impl Destination {
    /// `None` (or the literal string "None") renders to the console.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("None") => Destination::Console,
            Some(path) => Destination::File(PathBuf::from(path)),
        }
    }
}

/// Replaces the first `##source=` line with one recording this tool and its invocation.
pub fn rewrite_source(header: &[String], command_line: &str) -> Vec<String> {
    let mut header = header.to_vec();
    if let Some(line) = header.iter_mut().find(|l| l.starts_with(SOURCE_PREFIX)) {
        let upstream = line[SOURCE_PREFIX.len()..].trim();
        let command_line = command_line.replace('\t', " ");
        *line = format!(
            "{SOURCE_PREFIX}{upstream}, {} {}, {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            command_line.trim()
        );
    }
    header
}

pub fn write_vcf(table: &VcfTable, command_line: &str, destination: &Destination) -> Result<()> {
    match destination {
        Destination::File(path) => {
            let f = File::create(path).map_err(|e| CustomError::Write {
                source: e,
                path: path.clone(),
            })?;
            render_vcf(table, command_line, BufWriter::new(f)).map_err(|e| match e {
                RenderError::Io(source) => CustomError::Write {
                    source,
                    path: path.clone(),
                },
                RenderError::Csv(source) => CustomError::CsvWrite { source },
            })
        }
        Destination::Console => {
            let stdout = io::stdout();
            render_vcf(table, command_line, stdout.lock()).map_err(|e| match e {
                RenderError::Io(source) => CustomError::WriteConsole { source },
                RenderError::Csv(source) => CustomError::CsvWrite { source },
            })
        }
    }
}

#[derive(Debug)]
enum RenderError {
    Io(io::Error),
    Csv(csv::Error),
}

impl From<io::Error> for RenderError {
    fn from(e: io::Error) -> Self {
        RenderError::Io(e)
    }
}

impl From<csv::Error> for RenderError {
    fn from(e: csv::Error) -> Self {
        RenderError::Csv(e)
    }
}

fn render_vcf<W: Write>(
    table: &VcfTable,
    command_line: &str,
    mut out: W,
) -> std::result::Result<(), RenderError> {
    for line in rewrite_source(&table.header, command_line) {
        writeln!(out, "{line}")?;
    }
    out.write_all(b"#")?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(out);
    wtr.write_record(table.columns())?;
    for row in &table.rows {
        let pos = row.pos.to_string();
        let alt = row.alt_field();
        let fixed = [
            row.chrom.as_str(),
            pos.as_str(),
            row.id.as_str(),
            row.reference.as_str(),
            alt.as_str(),
            row.qual.as_str(),
            row.filter.as_str(),
            row.info.as_str(),
            row.format.as_str(),
        ];
        wtr.write_record(
            fixed
                .into_iter()
                .chain(row.genotypes.iter().map(String::as_str)),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

/// One `<sample>\t<population>` line per output sample.
///
/// Lists the samples of the written VCF, so slot 0 is left out and display names are
/// used when given. An existing file is replaced rather than appended to.
pub fn write_population_file(samples: &[String], path: &Path) -> Result<()> {
    let write_err = |e| CustomError::Write {
        source: e,
        path: path.to_path_buf(),
    };
    let f = File::create(path).map_err(write_err)?;
    let mut out = BufWriter::new(f);
    for sample in samples {
        writeln!(out, "{sample}\t{POPULATION_LABEL}").map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VariantRow;

    fn table() -> VcfTable {
        VcfTable {
            header: vec![
                "##fileformat=VCFv4.2".to_string(),
                "##source=tskit 0.6.4".to_string(),
            ],
            samples: vec!["s1".to_string(), "s2".to_string()],
            rows: vec![VariantRow {
                chrom: "chr2".to_string(),
                pos: 11,
                id: ".".to_string(),
                reference: "C".to_string(),
                alternates: vec!["G".to_string(), "A".to_string()],
                qual: ".".to_string(),
                filter: "PASS".to_string(),
                info: ".".to_string(),
                format: "GT".to_string(),
                genotypes: vec!["0|2".to_string(), ".|.".to_string()],
            }],
        }
    }

    #[test]
    fn source_line_records_command() {
        let header = rewrite_source(&table().header, "vcfmask\t--seed 3 ");
        assert_eq!(header[0], "##fileformat=VCFv4.2");
        assert_eq!(
            header[1],
            format!(
                "##source=tskit 0.6.4, vcfmask {}, vcfmask --seed 3",
                env!("CARGO_PKG_VERSION")
            )
        );
    }

    #[test]
    fn renders_prefixed_column_line_and_rows() {
        let mut buf = Vec::new();
        render_vcf(&table(), "vcfmask", &mut buf).expect("in-memory render");
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[2],
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\ts1\ts2"
        );
        assert_eq!(lines[3], "chr2\t11\t.\tC\tG,A\t.\tPASS\t.\tGT\t0|2\t.|.");
    }

    #[test]
    fn console_sentinel_is_recognised() {
        assert_eq!(Destination::from_arg(None), Destination::Console);
        assert_eq!(Destination::from_arg(Some("None")), Destination::Console);
        assert_eq!(
            Destination::from_arg(Some("out.vcf")),
            Destination::File(PathBuf::from("out.vcf"))
        );
    }

    #[test]
    fn population_file_replaces_previous_contents() {
        let dir = std::env::temp_dir().join(format!("vcfmask_popfile_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pops.txt");
        std::fs::write(&path, "stale\t9\n").unwrap();

        write_population_file(&table().samples, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "s1\t1\ns2\t1\n");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
