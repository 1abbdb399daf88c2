use crate::error::{CustomError, Result};
use crate::model::VariantRow;

pub const HEADER_PREFIX: &str = "##";
pub const FIXED_COLUMNS: [&str; 9] = [
    "CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// Rendered variant text split into its header block, sample columns and rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfTable {
    pub header: Vec<String>,
    pub samples: Vec<String>,
    pub rows: Vec<VariantRow>,
}

impl VcfTable {
    /// Parses serializer output whose sample columns run `{prefix}0..{prefix}{n_samples - 1}`.
    pub fn parse(text: &str, sample_prefix: &str, n_samples: usize) -> Result<Self> {
        let mut header = Vec::new();
        let mut body_start = None;
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            if line.starts_with(HEADER_PREFIX) {
                header.push(line.trim_end_matches(['\r', '\n']).to_string());
            } else if line.starts_with('#') {
                // Skip the decorator so the column line reads as a plain header record.
                body_start = Some(offset + 1);
                break;
            } else if !line.trim().is_empty() {
                break;
            }
            offset += line.len();
        }
        if header.is_empty() {
            return Err(CustomError::MissingHeader);
        }
        let body_start = body_start.ok_or(CustomError::MissingColumnHeader)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(text[body_start..].as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        for (idx, expected) in FIXED_COLUMNS.into_iter().enumerate() {
            let found = columns.get(idx).map(String::as_str).unwrap_or_default();
            if found != expected {
                return Err(CustomError::ColumnLayout {
                    idx,
                    expected,
                    found: found.to_string(),
                });
            }
        }
        let samples = locate_samples(&columns, sample_prefix, n_samples)?;

        let mut rows = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != columns.len() {
                return Err(CustomError::RowFields {
                    row: row_idx,
                    n_fields: record.len(),
                    expected: columns.len(),
                });
            }
            let pos = record[1].parse().map_err(|e| CustomError::Position {
                row: row_idx,
                value: record[1].to_string(),
                source: e,
            })?;
            rows.push(VariantRow {
                chrom: record[0].to_string(),
                pos,
                id: record[2].to_string(),
                reference: record[3].to_string(),
                alternates: VariantRow::parse_alt_field(&record[4]),
                qual: record[5].to_string(),
                filter: record[6].to_string(),
                info: record[7].to_string(),
                format: record[8].to_string(),
                genotypes: record
                    .iter()
                    .skip(FIXED_COLUMNS.len())
                    .map(str::to_string)
                    .collect(),
            });
        }

        Ok(Self {
            header,
            samples,
            rows,
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.samples.iter().map(String::as_str))
    }

    /// Removes sample slot 0, which only anchors the reference allele.
    pub fn drop_reserved_sample(&mut self) {
        if self.samples.is_empty() {
            return;
        }
        self.samples.remove(0);
        for row in &mut self.rows {
            row.genotypes.remove(0);
        }
    }

    /// Renames sample columns in order; surplus columns keep their names.
    pub fn rename_samples(&mut self, names: &[String]) -> Result<()> {
        if names.len() > self.samples.len() {
            return Err(CustomError::TooManySampleNames {
                n_names: names.len(),
                n_samples: self.samples.len(),
            });
        }
        for (sample, name) in self.samples.iter_mut().zip(names) {
            sample.clone_from(name);
        }
        Ok(())
    }
}

fn locate_samples(columns: &[String], prefix: &str, n_samples: usize) -> Result<Vec<String>> {
    let first = format!("{prefix}0");
    let last = format!("{prefix}{}", n_samples.saturating_sub(1));
    let start = columns.iter().position(|c| *c == first);
    let end = columns.iter().position(|c| *c == last);
    match (start, end) {
        (Some(start), Some(end))
            if n_samples > 0 && start == FIXED_COLUMNS.len() && end == columns.len() - 1 =>
        {
            Ok(columns[start..=end].to_vec())
        }
        _ => Err(CustomError::SampleColumns { first, last }),
    }
}
