use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::recode::{Record, RecodedTable, Schema, StateColumn};

// ---------------------------------------------------------------------------
// Filter selection: what the sidebar currently asks for
// ---------------------------------------------------------------------------

/// Age slider default before clamping to the data.
pub const DEFAULT_AGE_RANGE: AgeRange = AgeRange {
    lower: 18,
    upper: 65,
};

/// Inclusive age bounds. An inverted range (`lower > upper`) matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub lower: i64,
    pub upper: i64,
}

impl AgeRange {
    pub fn contains(&self, age: f64) -> bool {
        self.lower as f64 <= age && age <= self.upper as f64
    }
}

/// A categorical attribute the user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Sex,
    Income,
    MaritalStatus,
    State,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Sex,
        Attribute::Income,
        Attribute::MaritalStatus,
        Attribute::State,
    ];

    pub fn prompt(self) -> &'static str {
        match self {
            Attribute::Sex => "Select Gender:",
            Attribute::Income => "Select Income Range:",
            Attribute::MaritalStatus => "Select Marital Status:",
            Attribute::State => "Select State:",
        }
    }

    /// Column backing this attribute; `None` for state on a table without one.
    pub fn column(self, schema: &Schema) -> Option<usize> {
        match self {
            Attribute::Sex => Some(schema.sex()),
            Attribute::Income => Some(schema.income()),
            Attribute::MaritalStatus => Some(schema.marital_status()),
            Attribute::State => schema.state().map(StateColumn::index),
        }
    }
}

/// Per-attribute selections. An empty set means "no filter" on that
/// attribute, never "exclude everything".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub sex: BTreeSet<String>,
    pub income: BTreeSet<String>,
    pub marital_status: BTreeSet<String>,
    pub age: AgeRange,
    /// Ignored unless the table has a state column.
    pub state: BTreeSet<String>,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            sex: BTreeSet::new(),
            income: BTreeSet::new(),
            marital_status: BTreeSet::new(),
            age: DEFAULT_AGE_RANGE,
            state: BTreeSet::new(),
        }
    }
}

impl FilterSelection {
    /// Initial selection for a freshly loaded table: nothing selected and the
    /// default age range clamped to the observed ages.
    pub fn for_table(table: &RecodedTable) -> Self {
        let age = match table.age_bounds() {
            Some((min, max)) => {
                let (min, max) = (min.floor() as i64, max.ceil() as i64);
                AgeRange {
                    lower: DEFAULT_AGE_RANGE.lower.clamp(min, max),
                    upper: DEFAULT_AGE_RANGE.upper.clamp(min, max),
                }
            }
            None => DEFAULT_AGE_RANGE,
        };
        Self {
            age,
            ..Self::default()
        }
    }

    pub fn labels(&self, attribute: Attribute) -> &BTreeSet<String> {
        match attribute {
            Attribute::Sex => &self.sex,
            Attribute::Income => &self.income,
            Attribute::MaritalStatus => &self.marital_status,
            Attribute::State => &self.state,
        }
    }

    pub fn labels_mut(&mut self, attribute: Attribute) -> &mut BTreeSet<String> {
        match attribute {
            Attribute::Sex => &mut self.sex,
            Attribute::Income => &mut self.income,
            Attribute::MaritalStatus => &mut self.marital_status,
            Attribute::State => &mut self.state,
        }
    }

    /// Whether `record` passes every active predicate.
    ///
    /// Predicates run in a fixed order (sex, income, marital status, age,
    /// state) and are combined with AND.
    pub fn matches(&self, schema: &Schema, record: &Record) -> bool {
        in_selection(&self.sex, record.label(schema.sex()))
            && in_selection(&self.income, record.label(schema.income()))
            && in_selection(&self.marital_status, record.label(schema.marital_status()))
            && record
                .number(schema.age())
                .is_some_and(|age| self.age.contains(age))
            && schema
                .state()
                .map_or(true, |state| self.matches_state(state, record))
    }

    /// State predicate; needs the state capability from the schema.
    pub fn matches_state(&self, state: StateColumn, record: &Record) -> bool {
        in_selection(&self.state, record.label(state.index()))
    }

    /// Records passing the selection, in table order.
    pub fn apply<'a, I>(&self, schema: &Schema, records: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .filter(|r| self.matches(schema, r))
            .collect()
    }

    /// Toggle one label in a categorical selection.
    pub fn toggle(set: &mut BTreeSet<String>, label: &str) {
        if !set.remove(label) {
            set.insert(label.to_string());
        }
    }
}

fn in_selection(selected: &BTreeSet<String>, label: Option<&str>) -> bool {
    selected.is_empty() || label.is_some_and(|l| selected.contains(l))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RawTable, Value};
    use crate::data::recode::recode;

    fn table() -> RecodedTable {
        let rows = [
            [1, 11, 7, 25, 6],
            [2, 1, 5, 70, 12],
            [2, 11, 1, 40, 6],
            [1, 16, 1, 18, 36],
            [1, 11, 4, 65, 36],
        ]
        .iter()
        .map(|r| r.iter().map(|&v| Value::Integer(v)).collect())
        .collect();
        let columns = ["PESEX", "HEFAMINC", "PRMARSTA", "AGE", "ST"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        recode(&RawTable::new(columns, rows)).unwrap()
    }

    fn set(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    fn ages(records: &[&Record], schema: &Schema) -> Vec<f64> {
        records.iter().filter_map(|r| r.number(schema.age())).collect()
    }

    #[test]
    fn default_range_is_clamped_to_data() {
        let t = table();
        let sel = FilterSelection::for_table(&t);
        assert_eq!(sel.age, AgeRange { lower: 18, upper: 65 });

        let mut older = t.clone();
        older.records.retain(|r| r.number(3).unwrap() >= 40.0);
        let sel = FilterSelection::for_table(&older);
        assert_eq!(sel.age, AgeRange { lower: 40, upper: 65 });
    }

    #[test]
    fn age_bounds_are_inclusive() {
        let t = table();
        let sel = FilterSelection::for_table(&t);
        let out = sel.apply(&t.schema, &t.records);
        assert_eq!(ages(&out, &t.schema), vec![25.0, 40.0, 18.0, 65.0]);
    }

    #[test]
    fn empty_set_means_no_constraint() {
        let t = table();
        let sel = FilterSelection {
            age: AgeRange { lower: 0, upper: 200 },
            ..FilterSelection::default()
        };
        assert_eq!(sel.apply(&t.schema, &t.records).len(), t.len());
    }

    #[test]
    fn predicates_are_conjunctive() {
        let t = table();
        let sel = FilterSelection {
            sex: set(&["Male"]),
            income: set(&["40,000 To 49,999"]),
            age: AgeRange { lower: 0, upper: 200 },
            ..FilterSelection::default()
        };
        let out = sel.apply(&t.schema, &t.records);
        assert_eq!(ages(&out, &t.schema), vec![25.0, 65.0]);
    }

    #[test]
    fn state_selection_applies_with_state_column() {
        let t = table();
        let sel = FilterSelection {
            state: set(&["New York"]),
            age: AgeRange { lower: 0, upper: 200 },
            ..FilterSelection::default()
        };
        let out = sel.apply(&t.schema, &t.records);
        assert_eq!(ages(&out, &t.schema), vec![18.0, 65.0]);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let t = table();
        let sel = FilterSelection {
            age: AgeRange { lower: 65, upper: 18 },
            ..FilterSelection::default()
        };
        assert!(sel.apply(&t.schema, &t.records).is_empty());
    }

    #[test]
    fn state_attribute_needs_the_capability() {
        let t = table();
        assert_eq!(Attribute::State.column(&t.schema), Some(4));
        assert_eq!(Attribute::Income.column(&t.schema), Some(1));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut s = BTreeSet::new();
        FilterSelection::toggle(&mut s, "Male");
        assert!(s.contains("Male"));
        FilterSelection::toggle(&mut s, "Male");
        assert!(s.is_empty());
    }
}
