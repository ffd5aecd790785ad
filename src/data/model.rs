use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single raw cell as read from the input file
// ---------------------------------------------------------------------------

/// A dynamically-typed raw cell mirroring common Pandas dtypes.
/// Kept in `BTreeSet`s downstream, so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` when it is numeric and present.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the value as an integer survey code.
    ///
    /// Integral floats (`6.0`) count as codes, since float-typed code columns
    /// are common once a column has passed through a NaN-aware tool.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// Whether this cell counts as missing (null, empty text or NaN).
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }
}

// ---------------------------------------------------------------------------
// RawTable – the loaded input file
// ---------------------------------------------------------------------------

/// The table exactly as loaded: ordered header plus row-major cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names in file order.
    pub columns: Vec<String>,
    /// One `Vec<Value>` per row, same length as `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        RawTable { columns, rows }
    }

    /// Position of the column named `name`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Cell – a recoded, never-missing cell
// ---------------------------------------------------------------------------

/// A cell of the recoded table. Missing values never survive recoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A display label taken from one of the lookup tables.
    Label(&'static str),
    Number(f64),
    /// Free text from a pass-through categorical column.
    Text(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Categorical view of the cell. Numbers have no label.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Cell::Label(s) => Some(s),
            Cell::Text(s) => Some(s.as_str()),
            Cell::Number(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Label(s) => write!(f, "{s}"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_float_is_a_code() {
        assert_eq!(Value::Float(6.0).as_code(), Some(6));
        assert_eq!(Value::Float(6.5).as_code(), None);
        assert_eq!(Value::Integer(-1).as_code(), Some(-1));
        assert_eq!(Value::Text("6".into()).as_code(), None);
    }

    #[test]
    fn missing_cells() {
        assert!(Value::Null.is_missing());
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(Value::Text(String::new()).is_missing());
        assert!(!Value::Integer(0).is_missing());
        assert!(!Value::Bool(false).is_missing());
    }

    #[test]
    fn values_sort_by_kind_then_content() {
        let mut vals = vec![
            Value::Text("b".into()),
            Value::Integer(3),
            Value::Null,
            Value::Text("a".into()),
            Value::Integer(1),
        ];
        vals.sort();
        assert_eq!(
            vals,
            vec![
                Value::Null,
                Value::Integer(1),
                Value::Integer(3),
                Value::Text("a".into()),
                Value::Text("b".into()),
            ]
        );
    }
}
