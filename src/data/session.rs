use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::loader::load_file;
use super::model::RawTable;
use super::recode::{RecodeError, RecodedTable, recode};

/// Session-owned data: the recoded table, built once when a file is opened
/// and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    source: Option<PathBuf>,
    raw_rows: usize,
    table: RecodedTable,
}

impl Session {
    /// Load and recode `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let raw = load_file(path)?;
        let mut session = Self::from_raw(&raw)
            .with_context(|| format!("recoding {}", path.display()))?;
        session.source = Some(path.to_path_buf());
        Ok(session)
    }

    /// Recode an already loaded table.
    pub fn from_raw(raw: &RawTable) -> Result<Self, RecodeError> {
        let table = recode(raw)?;
        log::info!("Recoded {} of {} rows", table.len(), raw.len());
        Ok(Self {
            source: None,
            raw_rows: raw.len(),
            table,
        })
    }

    pub fn table(&self) -> &RecodedTable {
        &self.table
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Rows in the input before missing values were dropped.
    pub fn raw_rows(&self) -> usize {
        self.raw_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;

    #[test]
    fn short_csv_row_is_dropped_on_recode() {
        let raw = read_csv("PESEX,HEFAMINC,PRMARSTA,AGE,ST\n1,11,7,25,6\n2,1,5,70\n".as_bytes())
            .unwrap();
        let session = Session::from_raw(&raw).unwrap();

        assert_eq!(session.raw_rows(), 2);
        assert_eq!(session.table().len(), 1);
        assert_eq!(session.table().records[0].label(0), Some("Male"));
        assert!(session.source().is_none());
    }
}
