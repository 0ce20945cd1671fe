//! Condition expressions used in `WHERE` clauses and `IF` branches.

use serde_json::{Map, Value};

/// A boolean predicate.
///
/// Conditions keep their structure only until they are rendered; after that
/// they are opaque query text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    /// Hand-written predicate text
    Raw(String),
    /// Every operand parenthesized and joined with `&&`
    And(Vec<Cond>),
    /// Every operand parenthesized and joined with `||`
    Or(Vec<Cond>),
    /// Field comparisons joined with a single operator
    Match {
        pairs: Vec<(String, Predicate)>,
        join: Join,
    },
}

/// Operator joining the pairs of a [`Cond::Match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Join {
    #[default]
    And,
    Or,
}

impl Join {
    pub fn as_str(self) -> &'static str {
        match self {
            Join::And => "&&",
            Join::Or => "||",
        }
    }

    /// Parse `&&` / `||`; anything else is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "&&" => Some(Join::And),
            "||" => Some(Join::Or),
            _ => None,
        }
    }
}

/// Right-hand side of a field comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field=value`
    Eq(Value),
    /// `field<op><value>`, e.g. `created>$since` or `tags CONTAINS "urgent"`
    Op { op: String, value: Value },
}

impl Predicate {
    pub fn eq(value: impl Into<Value>) -> Self {
        Predicate::Eq(value.into())
    }

    pub fn op(op: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Op {
            op: op.into(),
            value: value.into(),
        }
    }
}

impl From<Value> for Predicate {
    /// A two-element array whose first element is a string is read as an
    /// `[operator, operand]` pair; anything else is an equality.
    fn from(value: Value) -> Self {
        match value {
            Value::Array(mut items) if items.len() == 2 && items[0].is_string() => {
                let operand = items.pop().unwrap_or(Value::Null);
                match items.pop() {
                    Some(Value::String(op)) => Predicate::Op { op, value: operand },
                    _ => Predicate::Eq(operand),
                }
            }
            other => Predicate::Eq(other),
        }
    }
}

impl Cond {
    pub fn raw(text: impl Into<String>) -> Self {
        Cond::Raw(text.into())
    }

    pub fn and<I, C>(conds: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cond>,
    {
        Cond::And(conds.into_iter().map(Into::into).collect())
    }

    pub fn or<I, C>(conds: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cond>,
    {
        Cond::Or(conds.into_iter().map(Into::into).collect())
    }

    /// Field comparisons joined with `&&`.
    pub fn matching<I, K, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<Predicate>,
    {
        Cond::Match {
            pairs: pairs
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
            join: Join::And,
        }
    }

    /// Build a match from a JSON object, reading `[op, operand]` pairs.
    pub fn from_map(conditions: &Map<String, Value>) -> Self {
        Self::matching(conditions.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    /// Change the join operator of a [`Cond::Match`]. Other variants are
    /// returned unchanged.
    pub fn joined_by(self, join: Join) -> Self {
        match self {
            Cond::Match { pairs, .. } => Cond::Match { pairs, join },
            other => other,
        }
    }
}

impl From<&str> for Cond {
    fn from(text: &str) -> Self {
        Cond::Raw(text.to_string())
    }
}

impl From<String> for Cond {
    fn from(text: String) -> Self {
        Cond::Raw(text)
    }
}

impl From<&String> for Cond {
    fn from(text: &String) -> Self {
        Cond::Raw(text.clone())
    }
}
