use thiserror::Error;

use super::lookup::{self, LookupTable};
use super::model::{Cell, RawTable, Value};

// ---------------------------------------------------------------------------
// Column names of the CPS extract
// ---------------------------------------------------------------------------

pub const SEX_COLUMN: &str = "PESEX";
pub const INCOME_COLUMN: &str = "HEFAMINC";
pub const MARITAL_COLUMN: &str = "PRMARSTA";
pub const AGE_COLUMN: &str = "AGE";
/// Optional; extracts without it get no state filter or state charts.
pub const STATE_COLUMN: &str = "ST";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecodeError {
    #[error("required column '{0}' is missing from the input")]
    MissingColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// What a column means to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Sex,
    Income,
    MaritalStatus,
    Age,
    State,
    /// Any other column, carried through for summaries and correlation.
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Categorical,
    Numeric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub name: String,
    pub role: ColumnRole,
    pub kind: ColumnKind,
}

impl ColumnMeta {
    /// Lookup table backing this column, if it is a recoded one.
    pub fn lookup(&self) -> Option<&'static LookupTable> {
        match self.role {
            ColumnRole::Sex => Some(&lookup::SEX),
            ColumnRole::Income => Some(&lookup::INCOME),
            ColumnRole::MaritalStatus => Some(&lookup::MARITAL_STATUS),
            ColumnRole::State => Some(&lookup::STATE),
            ColumnRole::Age | ColumnRole::PassThrough => None,
        }
    }
}

/// Proof that the loaded table has a recoded state column.
///
/// Only the recoder can create one, so any operation taking a `StateColumn`
/// can rely on every record carrying a state label at `index()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateColumn {
    index: usize,
}

impl StateColumn {
    pub fn index(self) -> usize {
        self.index
    }
}

/// Schema variant decided once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateLayout {
    HasState(StateColumn),
    NoState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<ColumnMeta>,
    sex: usize,
    income: usize,
    marital: usize,
    age: usize,
    layout: StateLayout,
}

impl Schema {
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> &ColumnMeta {
        &self.columns[index]
    }

    pub fn sex(&self) -> usize {
        self.sex
    }

    pub fn income(&self) -> usize {
        self.income
    }

    pub fn marital_status(&self) -> usize {
        self.marital
    }

    pub fn age(&self) -> usize {
        self.age
    }

    /// The state capability, when the extract has a state column.
    pub fn state(&self) -> Option<StateColumn> {
        match self.layout {
            StateLayout::HasState(col) => Some(col),
            StateLayout::NoState => None,
        }
    }

    /// Indices of numeric columns in schema order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == ColumnKind::Numeric)
            .map(|(i, _)| i)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One recoded row; `cells` follows the schema's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    cells: Vec<Cell>,
}

impl Record {
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.cells[index].as_label()
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.cells[index].as_f64()
    }
}

/// The recoded table, with per-column category levels precomputed.
#[derive(Debug, Clone)]
pub struct RecodedTable {
    pub schema: Schema,
    pub records: Vec<Record>,
    /// For each categorical column the distinct labels present, in display
    /// order (code order for recoded columns, first appearance otherwise).
    /// Empty for numeric columns.
    levels: Vec<Vec<String>>,
}

impl RecodedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn levels(&self, column: usize) -> &[String] {
        &self.levels[column]
    }

    /// Observed (min, max) age, `None` for an empty table.
    pub fn age_bounds(&self) -> Option<(f64, f64)> {
        let age = self.schema.age();
        self.records
            .iter()
            .filter_map(|r| r.number(age))
            .fold(None, |acc, a| match acc {
                None => Some((a, a)),
                Some((lo, hi)) => Some((lo.min(a), hi.max(a))),
            })
    }
}

// ---------------------------------------------------------------------------
// Recoder
// ---------------------------------------------------------------------------

/// Apply the lookup tables and drop every row with a missing value.
///
/// Unmapped codes become missing and their rows are dropped silently; the
/// number of dropped rows is logged.
pub fn recode(raw: &RawTable) -> Result<RecodedTable, RecodeError> {
    let require = |name: &'static str| {
        raw.column_index(name)
            .ok_or(RecodeError::MissingColumn(name))
    };
    let sex = require(SEX_COLUMN)?;
    let income = require(INCOME_COLUMN)?;
    let marital = require(MARITAL_COLUMN)?;
    let age = require(AGE_COLUMN)?;
    let state = raw.column_index(STATE_COLUMN);

    let columns: Vec<ColumnMeta> = raw
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let role = match i {
                _ if i == sex => ColumnRole::Sex,
                _ if i == income => ColumnRole::Income,
                _ if i == marital => ColumnRole::MaritalStatus,
                _ if i == age => ColumnRole::Age,
                _ if Some(i) == state => ColumnRole::State,
                _ => ColumnRole::PassThrough,
            };
            let kind = match role {
                ColumnRole::Age => ColumnKind::Numeric,
                ColumnRole::PassThrough if is_numeric_column(raw, i) => ColumnKind::Numeric,
                _ => ColumnKind::Categorical,
            };
            ColumnMeta {
                name: name.clone(),
                role,
                kind,
            }
        })
        .collect();

    let layout = match state {
        Some(index) => StateLayout::HasState(StateColumn { index }),
        None => StateLayout::NoState,
    };

    let records: Vec<Record> = raw
        .rows
        .iter()
        .filter_map(|row| recode_row(&columns, row))
        .collect();

    let dropped = raw.len() - records.len();
    if dropped > 0 {
        log::info!("Dropped {dropped} of {} rows with missing or unmapped values", raw.len());
    }

    let levels = collect_levels(&columns, &records);

    Ok(RecodedTable {
        schema: Schema {
            columns,
            sex,
            income,
            marital,
            age,
            layout,
        },
        records,
        levels,
    })
}

fn is_numeric_column(raw: &RawTable, index: usize) -> bool {
    raw.rows
        .iter()
        .filter_map(|row| row.get(index))
        .filter(|v| !v.is_missing())
        .all(Value::is_numeric)
}

/// Recode one raw row, or `None` if any cell ends up missing.
fn recode_row(columns: &[ColumnMeta], row: &[Value]) -> Option<Record> {
    let cells = columns
        .iter()
        .enumerate()
        .map(|(i, meta)| {
            let value = row.get(i)?;
            if value.is_missing() {
                return None;
            }
            if let Some(table) = meta.lookup() {
                return table.recode(value).map(Cell::Label);
            }
            match meta.kind {
                ColumnKind::Numeric => value.as_f64().map(Cell::Number),
                ColumnKind::Categorical => Some(Cell::Text(value.to_string())),
            }
        })
        .collect::<Option<Vec<Cell>>>()?;
    Some(Record { cells })
}

fn collect_levels(columns: &[ColumnMeta], records: &[Record]) -> Vec<Vec<String>> {
    columns
        .iter()
        .enumerate()
        .map(|(i, meta)| {
            if meta.kind == ColumnKind::Numeric {
                return Vec::new();
            }
            let mut levels: Vec<String> = Vec::new();
            for label in records.iter().filter_map(|r| r.label(i)) {
                if !levels.iter().any(|l| l == label) {
                    levels.push(label.to_string());
                }
            }
            if let Some(table) = meta.lookup() {
                levels.sort_by_key(|l| table.rank(l));
            }
            levels
        })
        .collect()
}
