//! Records the data table can project columns out of

use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// A displayable field value. Absent fields are `None` at the `Record` level.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    // Mixed kinds order Number < Bool < Text
    fn rank(&self) -> u8 {
        match self {
            CellValue::Number(_) => 0,
            CellValue::Bool(_) => 1,
            CellValue::Text(_) => 2,
        }
    }

    /// Natural ordering on the value's own type
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One row of structured data with named fields
pub trait Record {
    /// Look up a field by name. `None` means absent (or null).
    fn field(&self, name: &str) -> Option<CellValue>;

    /// Display text for a field; absent renders as empty
    fn display(&self, name: &str) -> String {
        self.field(name).map(|v| v.to_string()).unwrap_or_default()
    }
}

/// JSON objects are the demo's record type
pub type Row = Map<String, Value>;

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<CellValue> {
        match self.get(name)? {
            Value::Null => None,
            Value::Bool(b) => Some(CellValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(CellValue::Number),
            Value::String(s) => Some(CellValue::Text(s.clone())),
            other => Some(CellValue::Text(other.to_string())),
        }
    }
}
