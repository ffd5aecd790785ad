use crate::data::filter::FilterSelection;
use crate::data::recode::{Record, RecodedTable, Schema};

use super::age_group::AgeGroup;

/// A filtered record with its derived age group.
#[derive(Debug, Clone, Copy)]
pub struct ViewRow<'a> {
    pub record: &'a Record,
    pub age_group: Option<AgeGroup>,
}

/// The records matching a selection, borrowed from the recoded table.
/// Rebuilt on every interaction and never cached.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    schema: &'a Schema,
    rows: Vec<ViewRow<'a>>,
}

impl<'a> FilteredView<'a> {
    pub fn new(table: &'a RecodedTable, selection: &FilterSelection) -> Self {
        let records = selection.apply(&table.schema, &table.records);
        Self::from_records(&table.schema, records)
    }

    /// Attach age groups to already selected records.
    pub fn from_records(schema: &'a Schema, records: Vec<&'a Record>) -> Self {
        let age = schema.age();
        let rows = records
            .into_iter()
            .map(|record| ViewRow {
                record,
                age_group: record.number(age).and_then(AgeGroup::bucket),
            })
            .collect();
        Self { schema, rows }
    }

    /// Filter this view again.
    pub fn refine(&self, selection: &FilterSelection) -> Self {
        let records = selection.apply(self.schema, self.records());
        Self::from_records(self.schema, records)
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn rows(&self) -> &[ViewRow<'a>] {
        &self.rows
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().map(|row| row.record)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of a numeric column, in row order.
    pub fn numbers(&self, column: usize) -> Vec<f64> {
        self.records().filter_map(|r| r.number(column)).collect()
    }
}
