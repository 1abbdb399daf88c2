use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CustomError, Result};
use crate::model::SiteMask;
use crate::reader::SiteSource;
use crate::reader::table::{FIXED_COLUMNS, HEADER_PREFIX};

/// A simulator's unmasked VCF output held in memory. Site `i` of a mask governs
/// the `i`-th data line, matching how the serializer indexes its site table.
pub struct PrerenderedVcf {
    path: PathBuf,
    header: Vec<String>,
    column_line: String,
    sites: Vec<String>,
    samples: Vec<String>,
}

impl PrerenderedVcf {
    pub fn open(path: &impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CustomError::ReadWithPath {
            source: e,
            path: path.as_ref().to_path_buf(),
        })?;
        let mut source = Self::from_text(&text)?;
        source.path = path.as_ref().to_path_buf();
        Ok(source)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let mut header = Vec::new();
        let column_line = loop {
            match lines.next() {
                Some(line) if line.starts_with(HEADER_PREFIX) => header.push(line.to_string()),
                Some(line) if line.starts_with('#') => break line.to_string(),
                _ => return Err(CustomError::MissingColumnHeader),
            }
        };
        if header.is_empty() {
            return Err(CustomError::MissingHeader);
        }

        let samples = column_line
            .split('\t')
            .skip(FIXED_COLUMNS.len())
            .map(str::to_string)
            .collect();
        let sites = lines.map(str::to_string).collect();

        Ok(Self {
            path: PathBuf::new(),
            header,
            column_line,
            sites,
            samples,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SiteSource for PrerenderedVcf {
    fn samples(&self) -> &[String] {
        &self.samples
    }

    fn n_sites(&self) -> usize {
        self.sites.len()
    }

    fn render(&mut self, mask: &SiteMask) -> Result<String> {
        if mask.len() != self.sites.len() {
            return Err(CustomError::SiteCount {
                expected: mask.len(),
                found: self.sites.len(),
            });
        }

        let mut text = String::new();
        for line in self.header.iter().chain(std::iter::once(&self.column_line)) {
            text.push_str(line);
            text.push('\n');
        }
        for (site, line) in self.sites.iter().enumerate() {
            if !mask.is_masked(site) {
                text.push_str(line);
                text.push('\n');
            }
        }
        Ok(text)
    }
}
