//! Typed cell values carried in primed rows.
//!
//! Sets are kept in canonical order (see [`CellValue`]'s `Ord` impl), so equal
//! sets always render to the same JSON array regardless of the order their
//! members were supplied in.

use crate::types::{CollectionShape, ColumnType};
use serde::Serialize;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// One primed row: column name to cell value. Columns render in name order.
pub type Row = BTreeMap<String, CellValue>;

/// Build a [`Row`] from `(column, value)` pairs.
pub fn row<I, K, V>(cells: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<CellValue>,
{
    cells
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A single typed value inside a primed row.
///
/// Values have a total canonical order: first by kind
/// (`Null < Bool < Number < Text < List < Set < Map`), then within the kind
/// by natural order. Numbers compare by exact numeric value, with an integer
/// placed before a float of the same value (`1` before `1.0`). Text compares
/// bytewise and collections compare element by element.
///
/// Negative zero is stored and rendered as `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    #[serde(serialize_with = "serialize_number")]
    Number(Number),
    Text(String),
    List(Vec<CellValue>),
    Set(BTreeSet<CellValue>),
    Map(BTreeMap<String, CellValue>),
}

impl CellValue {
    /// Create a set value. Duplicates collapse and members are stored in canonical order.
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CellValue>,
    {
        CellValue::Set(items.into_iter().map(Into::into).collect())
    }

    /// Create a list value, preserving the given order.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CellValue>,
    {
        CellValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Create a map value with string keys.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        CellValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Create a floating point value. Returns `None` for NaN and infinities.
    pub fn float(value: f64) -> Option<Self> {
        Number::from_f64(value).map(|n| CellValue::Number(canonical_number(n)))
    }

    /// Get the collection shape of this value.
    pub fn shape(&self) -> CollectionShape {
        match self {
            CellValue::List(_) => CollectionShape::List,
            CellValue::Set(_) => CollectionShape::Set,
            CellValue::Map(_) => CollectionShape::Map,
            _ => CollectionShape::Scalar,
        }
    }

    /// Check if a set appears anywhere below the top level of this value.
    pub fn has_nested_set(&self) -> bool {
        fn contains_set(value: &CellValue) -> bool {
            match value {
                CellValue::Set(_) => true,
                other => other.children().any(contains_set),
            }
        }
        self.children().any(contains_set)
    }

    fn children(&self) -> Box<dyn Iterator<Item = &CellValue> + '_> {
        match self {
            CellValue::List(items) => Box::new(items.iter()),
            CellValue::Set(items) => Box::new(items.iter()),
            CellValue::Map(entries) => Box::new(entries.values()),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Convert a wire value back into a cell.
    ///
    /// Arrays become sets when the column is declared with a set-like type,
    /// and lists otherwise. Nested arrays are always lists.
    pub fn from_json(value: Value, declared: Option<ColumnType>) -> Self {
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => CellValue::Number(canonical_number(n)),
            Value::String(s) => CellValue::Text(s),
            Value::Array(items) => {
                let items = items.into_iter().map(|v| CellValue::from_json(v, None));
                if declared.is_some_and(|t| t.is_set()) {
                    CellValue::Set(items.collect())
                } else {
                    CellValue::List(items.collect())
                }
            }
            Value::Object(entries) => CellValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, CellValue::from_json(v, None)))
                    .collect(),
            ),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Number(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::List(_) => 4,
            CellValue::Set(_) => 5,
            CellValue::Map(_) => 6,
        }
    }
}

/// Fold negative zero into zero, leaving every other number untouched.
fn canonical_number(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 && f.is_sign_negative() => {
            Number::from_f64(0.0).unwrap_or(n)
        }
        _ => n,
    }
}

fn serialize_number<S: serde::Serializer>(n: &Number, serializer: S) -> Result<S::Ok, S::Error> {
    canonical_number(n.clone()).serialize(serializer)
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Exact comparison of a finite float against an integer.
fn compare_float_integer(f: f64, i: i128) -> Ordering {
    // 2^127 is exactly representable, so anything at or beyond it is out of i128 range
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if f >= LIMIT {
        return Ordering::Greater;
    }
    if f < -LIMIT {
        return Ordering::Less;
    }
    let whole = f.trunc();
    (whole as i128).cmp(&i).then_with(|| {
        let fract = f - whole;
        if fract > 0.0 {
            Ordering::Greater
        } else if fract < 0.0 {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    })
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (as_integer(a), as_integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => {
            let y = b.as_f64().unwrap_or(f64::NAN);
            compare_float_integer(y, x).reverse().then(Ordering::Less)
        }
        (None, Some(y)) => {
            let x = a.as_f64().unwrap_or(f64::NAN);
            compare_float_integer(x, y).then(Ordering::Greater)
        }
        (None, None) => {
            let x = a.as_f64().unwrap_or(f64::NAN);
            let y = b.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => compare_numbers(a, b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::List(a), CellValue::List(b)) => a.cmp(b),
            (CellValue::Set(a), CellValue::Set(b)) => a.cmp(b),
            (CellValue::Map(a), CellValue::Map(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Number(value.into())
    }
}

impl From<Number> for CellValue {
    fn from(value: Number) -> Self {
        CellValue::Number(canonical_number(value))
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

impl<T: Into<CellValue>> From<Vec<T>> for CellValue {
    fn from(value: Vec<T>) -> Self {
        CellValue::list(value)
    }
}

impl<T: Into<CellValue>> From<BTreeSet<T>> for CellValue {
    fn from(value: BTreeSet<T>) -> Self {
        CellValue::set(value)
    }
}
