//! Store-agnostic query model.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;

/// A scalar or list value a row exposes for filtering and ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
    #[serde(with = "time::serde::rfc3339")]
    Time(OffsetDateTime),
    List(Vec<Value>),
}

impl Value {
    /// Orders two values of the same kind; mixed kinds are incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    /// Apply this direction to an ascending comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Boolean filter expression evaluated against each row.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Matches every row.
    All,
    And(Vec<Expr>),
    Or(Vec<Expr>),
    /// Substring match on a text field.
    Contains {
        field: String,
        needle: String,
        case_insensitive: bool,
    },
    Equals { field: String, value: Value },
    /// List field contains `value`.
    Has { field: String, value: Value },
}

impl Expr {
    pub fn contains_insensitive(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Expr::Contains {
            field: field.into(),
            needle: needle.into(),
            case_insensitive: true,
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Expr::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn has(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Expr::Has {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Conjunction that drops `All` operands and collapses trivial cases.
    pub fn and(operands: Vec<Expr>) -> Self {
        let mut kept: Vec<Expr> = operands
            .into_iter()
            .filter(|expr| *expr != Expr::All)
            .collect();
        match kept.len() {
            0 => Expr::All,
            1 => kept.remove(0),
            _ => Expr::And(kept),
        }
    }

    /// Disjunction; an empty list matches nothing, so callers pass at least one operand.
    pub fn or(operands: Vec<Expr>) -> Self {
        if operands.iter().any(|expr| *expr == Expr::All) {
            return Expr::All;
        }
        Expr::Or(operands)
    }
}

/// Ordering specification, built outermost key first.
///
/// `a.b.c` descending is `Nested("a", Nested("b", Nested("c", Direction(Desc))))`
/// and serializes as `{"a":{"b":{"c":"desc"}}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    Direction(Direction),
    Nested(String, Box<OrderBy>),
}

impl OrderBy {
    /// Build the nested ordering for a dot-separated path, innermost key first.
    pub fn from_path(path: &str, direction: Direction) -> Self {
        path.split('.')
            .rev()
            .fold(OrderBy::Direction(direction), |inner, key| {
                OrderBy::Nested(key.to_string(), Box::new(inner))
            })
    }

    /// Flatten back into the key path and the innermost direction.
    pub fn path(&self) -> (Vec<&str>, Direction) {
        let mut keys = Vec::new();
        let mut node = self;
        loop {
            match node {
                OrderBy::Direction(direction) => return (keys, *direction),
                OrderBy::Nested(key, inner) => {
                    keys.push(key.as_str());
                    node = inner;
                }
            }
        }
    }
}

impl Serialize for OrderBy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OrderBy::Direction(direction) => direction.serialize(serializer),
            OrderBy::Nested(key, inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, inner)?;
                map.end()
            }
        }
    }
}
