//! Fixed code → label tables from the CPS data dictionary.
//!
//! The codes follow the survey's public coding (state codes are the two-digit
//! FIPS numbers without territories) and must not be renumbered.

use super::model::Value;

/// A static mapping from integer survey code to display label.
#[derive(Debug)]
pub struct LookupTable {
    /// Human-readable name of the variable.
    pub name: &'static str,
    /// `(code, label)` pairs in ascending code order.
    entries: &'static [(i64, &'static str)],
}

impl LookupTable {
    /// Label for `code`, or `None` when the code is not in the table.
    pub fn label(&self, code: i64) -> Option<&'static str> {
        self.entries
            .binary_search_by_key(&code, |&(c, _)| c)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Label for a raw cell; non-code cells and unmapped codes yield `None`.
    pub fn recode(&self, value: &Value) -> Option<&'static str> {
        value.as_code().and_then(|code| self.label(code))
    }

    /// Position of `label` in code order, used to sort category axes.
    pub fn rank(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|&(_, l)| l == label)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.rank(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub static SEX: LookupTable = LookupTable {
    name: "Sex",
    entries: &[(1, "Male"), (2, "Female")],
};

pub static INCOME: LookupTable = LookupTable {
    name: "Family income",
    entries: &[
        (1, "Less Than $5,000"),
        (2, "5,000 To 7,499"),
        (3, "7,500 To 9,999"),
        (4, "10,000 To 12,499"),
        (5, "12,500 To 14,999"),
        (6, "15,000 To 19,999"),
        (7, "20,000 To 24,999"),
        (8, "25,000 To 29,999"),
        (9, "30,000 To 34,999"),
        (10, "35,000 To 39,999"),
        (11, "40,000 To 49,999"),
        (12, "50,000 To 59,999"),
        (13, "60,000 To 74,999"),
        (14, "75,000 To 99,999"),
        (15, "100,000 To 149,999"),
        (16, "150,000 or More"),
    ],
};

pub static MARITAL_STATUS: LookupTable = LookupTable {
    name: "Marital status",
    entries: &[
        (-1, "In Universe, Met No Conditions To Assign"),
        (1, "Married, Civilian Spouse Present"),
        (2, "Married, Armed Forces Spouse Present"),
        (3, "Married, Spouse Absent (exc. Separated)"),
        (4, "Widowed"),
        (5, "Divorced"),
        (6, "Separated"),
        (7, "Never married"),
    ],
};

pub static STATE: LookupTable = LookupTable {
    name: "State",
    entries: &[
        (1, "Alabama"),
        (2, "Alaska"),
        (4, "Arizona"),
        (5, "Arkansas"),
        (6, "California"),
        (8, "Colorado"),
        (9, "Connecticut"),
        (10, "Delaware"),
        (11, "District of Columbia"),
        (12, "Florida"),
        (13, "Georgia"),
        (15, "Hawaii"),
        (16, "Idaho"),
        (17, "Illinois"),
        (18, "Indiana"),
        (19, "Iowa"),
        (20, "Kansas"),
        (21, "Kentucky"),
        (22, "Louisiana"),
        (23, "Maine"),
        (24, "Maryland"),
        (25, "Massachusetts"),
        (26, "Michigan"),
        (27, "Minnesota"),
        (28, "Mississippi"),
        (29, "Missouri"),
        (30, "Montana"),
        (31, "Nebraska"),
        (32, "Nevada"),
        (33, "New Hampshire"),
        (34, "New Jersey"),
        (35, "New Mexico"),
        (36, "New York"),
        (37, "North Carolina"),
        (38, "North Dakota"),
        (39, "Ohio"),
        (40, "Oklahoma"),
        (41, "Oregon"),
        (42, "Pennsylvania"),
        (44, "Rhode Island"),
        (45, "South Carolina"),
        (46, "South Dakota"),
        (47, "Tennessee"),
        (48, "Texas"),
        (49, "Utah"),
        (50, "Vermont"),
        (51, "Virginia"),
        (53, "Washington"),
        (54, "West Virginia"),
        (55, "Wisconsin"),
        (56, "Wyoming"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes() {
        assert_eq!(SEX.len(), 2);
        assert_eq!(INCOME.len(), 16);
        assert_eq!(MARITAL_STATUS.len(), 8);
        assert_eq!(STATE.len(), 51);
    }

    #[test]
    fn entries_are_sorted_for_binary_search() {
        for table in [&SEX, &INCOME, &MARITAL_STATUS, &STATE] {
            assert!(
                table.entries.windows(2).all(|w| w[0].0 < w[1].0),
                "{} codes must ascend",
                table.name
            );
        }
    }

    #[test]
    fn known_codes() {
        assert_eq!(INCOME.label(11), Some("40,000 To 49,999"));
        assert_eq!(INCOME.label(1), Some("Less Than $5,000"));
        assert_eq!(INCOME.label(16), Some("150,000 or More"));
        assert_eq!(MARITAL_STATUS.label(7), Some("Never married"));
        assert_eq!(MARITAL_STATUS.label(-1), Some("In Universe, Met No Conditions To Assign"));
        assert_eq!(STATE.label(6), Some("California"));
        assert_eq!(STATE.label(11), Some("District of Columbia"));
        assert_eq!(STATE.label(56), Some("Wyoming"));
    }

    #[test]
    fn gaps_in_state_codes_are_unmapped() {
        for code in [0, 3, 7, 14, 43, 52, 57] {
            assert_eq!(STATE.label(code), None, "code {code}");
        }
        assert_eq!(MARITAL_STATUS.label(0), None);
        assert_eq!(SEX.label(3), None);
    }

    #[test]
    fn recode_accepts_integral_floats_only() {
        assert_eq!(SEX.recode(&Value::Float(2.0)), Some("Female"));
        assert_eq!(SEX.recode(&Value::Float(1.5)), None);
        assert_eq!(SEX.recode(&Value::Null), None);
    }
}
