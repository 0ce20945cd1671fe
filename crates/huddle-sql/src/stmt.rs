//! SurrealQL statements.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::cond::Cond;
use crate::error::PathError;
use crate::path::{validate_paths, Selectable};
use crate::value::{to_content, Param};

/// A single statement, or a composition of statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Create(Create),
    Select(Select),
    Update(Update),
    Delete(Delete),
    Relate(Relate),
    Let(Let),
    If(IfStmt),
    /// `BEGIN TRANSACTION; ...; COMMIT TRANSACTION`
    Transaction(Vec<Statement>),
    /// Statements separated by `; `
    Multi(Vec<Statement>),
    Wrap(Wrap),
    /// Pre-rendered or hand-written text (escape hatch)
    Raw(String),
}

impl Statement {
    pub fn raw(text: impl Into<String>) -> Self {
        Statement::Raw(text.into())
    }

    pub fn transaction<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Statement>,
    {
        Statement::Transaction(statements.into_iter().map(Into::into).collect())
    }

    pub fn multi<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Statement>,
    {
        Statement::Multi(statements.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// RETURN clause
// ============================================================================

/// What a mutating statement reports back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Return {
    #[default]
    None,
    Before,
    After,
    Diff,
    /// Explicit list of dotted field paths
    Fields(Vec<String>),
}

impl Return {
    pub fn fields(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Return::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// Field list validated against the selectable paths of `T`.
    pub fn checked_fields<T: Selectable>(
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, PathError> {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        validate_paths(&T::schema(), &fields)?;
        Ok(Return::Fields(fields))
    }
}

// ============================================================================
// CREATE
// ============================================================================

/// `CREATE <record> CONTENT <json> [RETURN ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    pub record: String,
    pub content: Value,
    /// Only rendered when requested
    pub ret: Option<Return>,
}

impl Create {
    pub fn new(record: impl Into<String>, content: Value) -> Self {
        Self {
            record: record.into(),
            content,
            ret: None,
        }
    }

    /// Use a serializable record as the content.
    pub fn from_record<T: Serialize + ?Sized>(
        record: impl Into<String>,
        content: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(record, to_content(content)?))
    }

    pub fn returning(mut self, ret: Return) -> Self {
        self.ret = Some(ret);
        self
    }
}

// ============================================================================
// SELECT
// ============================================================================

/// Projection of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Fields {
    #[default]
    All,
    List(Vec<String>),
}

impl From<&str> for Fields {
    fn from(field: &str) -> Self {
        if field == "*" {
            Fields::All
        } else {
            Fields::List(vec![field.to_string()])
        }
    }
}

impl From<&[&str]> for Fields {
    fn from(fields: &[&str]) -> Self {
        Fields::List(fields.iter().map(|f| f.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(fields: [&str; N]) -> Self {
        Fields::List(fields.iter().map(|f| f.to_string()).collect())
    }
}

impl From<Vec<String>> for Fields {
    fn from(fields: Vec<String>) -> Self {
        Fields::List(fields)
    }
}

/// ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub desc: bool,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            desc: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            desc: true,
        }
    }
}

/// `SELECT <fields> FROM <from> [WHERE ...] [SPLIT ...] [GROUP BY ...]
/// [ORDER BY ...] [LIMIT n] [START n] [FETCH ...]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub fields: Fields,
    pub from: String,
    pub where_: Option<Cond>,
    pub split: Vec<String>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub start: Option<u64>,
    pub fetch: Vec<String>,
}

impl Select {
    /// `SELECT * FROM <from>`
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            ..Self::default()
        }
    }

    pub fn fields(mut self, fields: impl Into<Fields>) -> Self {
        self.fields = fields.into();
        self
    }

    /// Projection validated against the selectable paths of `T`.
    pub fn checked_fields<T: Selectable>(
        mut self,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, PathError> {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        validate_paths(&T::schema(), &fields)?;
        self.fields = Fields::List(fields);
        Ok(self)
    }

    pub fn where_(mut self, cond: impl Into<Cond>) -> Self {
        self.where_ = Some(cond.into());
        self
    }

    /// Combine with the existing condition using `&&`.
    pub fn and_where(mut self, cond: impl Into<Cond>) -> Self {
        let cond = cond.into();
        self.where_ = Some(match self.where_.take() {
            Some(existing) => Cond::And(vec![existing, cond]),
            None => cond,
        });
        self
    }

    pub fn split(mut self, field: impl Into<String>) -> Self {
        self.split.push(field.into());
        self
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by.push(field.into());
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn fetch(mut self, field: impl Into<String>) -> Self {
        self.fetch.push(field.into());
        self
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// Operator of a `SET` assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Assign,
    Add,
    Sub,
}

impl SetOp {
    pub fn as_str(self) -> &'static str {
        match self {
            SetOp::Assign => "=",
            SetOp::Add => "+=",
            SetOp::Sub => "-=",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "=" => Some(SetOp::Assign),
            "+=" => Some(SetOp::Add),
            "-=" => Some(SetOp::Sub),
            _ => None,
        }
    }
}

/// One entry of a field-update set.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub op: SetOp,
    pub value: Value,
}

impl Assignment {
    pub fn assign(value: impl Into<Value>) -> Self {
        Self {
            op: SetOp::Assign,
            value: value.into(),
        }
    }

    pub fn add(value: impl Into<Value>) -> Self {
        Self {
            op: SetOp::Add,
            value: value.into(),
        }
    }

    pub fn sub(value: impl Into<Value>) -> Self {
        Self {
            op: SetOp::Sub,
            value: value.into(),
        }
    }
}

impl From<Value> for Assignment {
    /// `["+=", 1]` style pairs become operator assignments; anything else is
    /// a plain replacement.
    fn from(value: Value) -> Self {
        if let Value::Array(items) = &value {
            if let [Value::String(op), operand] = items.as_slice() {
                if let Some(op) = SetOp::parse(op) {
                    return Self {
                        op,
                        value: operand.clone(),
                    };
                }
            }
        }
        Self::assign(value)
    }
}

/// How an UPDATE without a `SET` body applies its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// `MERGE <json>`
    #[default]
    Merge,
    /// `CONTENT <json>`, replacing the record
    Content,
}

/// `UPDATE <record> <SET ...|MERGE ...|CONTENT ...> [WHERE ...] [RETURN ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub record: String,
    pub content: Value,
    pub mode: UpdateMode,
    /// When present the statement uses a `SET` body
    pub set: Option<IndexMap<String, Assignment>>,
    pub where_: Option<Cond>,
    pub ret: Option<Return>,
}

impl Update {
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            content: Value::Object(Default::default()),
            mode: UpdateMode::default(),
            set: None,
            where_: None,
            ret: None,
        }
    }

    pub fn content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    /// `false` switches from `MERGE` to `CONTENT`.
    pub fn merge(mut self, merge: bool) -> Self {
        self.mode = if merge {
            UpdateMode::Merge
        } else {
            UpdateMode::Content
        };
        self
    }

    pub fn set(mut self, field: impl Into<String>, assignment: Assignment) -> Self {
        self.set
            .get_or_insert_with(IndexMap::new)
            .insert(field.into(), assignment);
        self
    }

    pub fn where_(mut self, cond: impl Into<Cond>) -> Self {
        self.where_ = Some(cond.into());
        self
    }

    pub fn returning(mut self, ret: Return) -> Self {
        self.ret = Some(ret);
        self
    }

    /// Content entries as implicit `=` assignments, overlaid by `set`.
    ///
    /// A key present in both keeps the position it has in `content` and the
    /// value from `set`.
    pub fn assignments(&self) -> IndexMap<String, Assignment> {
        let mut merged: IndexMap<String, Assignment> = match &self.content {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), Assignment::assign(v.clone())))
                .collect(),
            _ => IndexMap::new(),
        };
        if let Some(set) = &self.set {
            for (field, assignment) in set {
                merged.insert(field.clone(), assignment.clone());
            }
        }
        merged
    }
}

// ============================================================================
// DELETE / RELATE
// ============================================================================

/// `DELETE <record> [WHERE ...] RETURN <fields|NONE>`; RETURN is always rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub record: String,
    pub where_: Option<Cond>,
    pub ret: Return,
}

impl Delete {
    pub fn new(record: impl Into<String>) -> Self {
        Self {
            record: record.into(),
            where_: None,
            ret: Return::None,
        }
    }

    pub fn where_(mut self, cond: impl Into<Cond>) -> Self {
        self.where_ = Some(cond.into());
        self
    }

    pub fn returning(mut self, ret: Return) -> Self {
        self.ret = ret;
        self
    }
}

/// `RELATE <from>-><edge>-><to> [CONTENT ...] RETURN <fields|NONE>`; RETURN is
/// always rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Relate {
    pub from: String,
    pub edge: String,
    pub to: String,
    pub content: Option<Value>,
    pub ret: Return,
}

impl Relate {
    pub fn new(from: impl Into<String>, edge: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            edge: edge.into(),
            to: to.into(),
            content: None,
            ret: Return::None,
        }
    }

    pub fn content(mut self, content: Value) -> Self {
        self.content = Some(content);
        self
    }

    pub fn returning(mut self, ret: Return) -> Self {
        self.ret = ret;
        self
    }
}

// ============================================================================
// LET / IF / wrap
// ============================================================================

/// `LET $name = <expr>`
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub name: Param,
    pub expr: Box<Statement>,
}

impl Let {
    pub fn new(name: impl Into<Param>, expr: impl Into<Statement>) -> Self {
        Self {
            name: name.into(),
            expr: Box::new(expr.into()),
        }
    }
}

/// `IF <cond> THEN <body> [ELSE IF <cond> THEN <body>]* [ELSE <body>] END`
///
/// The first branch always carries a condition.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub branches: Vec<(Cond, Statement)>,
    pub otherwise: Option<Box<Statement>>,
}

impl IfStmt {
    pub fn new(cond: impl Into<Cond>, then: impl Into<Statement>) -> Self {
        Self {
            branches: vec![(cond.into(), then.into())],
            otherwise: None,
        }
    }

    pub fn else_if(mut self, cond: impl Into<Cond>, then: impl Into<Statement>) -> Self {
        self.branches.push((cond.into(), then.into()));
        self
    }

    pub fn otherwise(mut self, body: impl Into<Statement>) -> Self {
        self.otherwise = Some(Box::new(body.into()));
        self
    }
}

/// `(<expr>) [AS <alias> | <append>]`
#[derive(Debug, Clone, PartialEq)]
pub struct Wrap {
    pub expr: Box<Statement>,
    pub alias: Option<String>,
    /// Arbitrary suffix; ignored when `alias` is set
    pub append: Option<String>,
}

impl Wrap {
    pub fn new(expr: impl Into<Statement>) -> Self {
        Self {
            expr: Box::new(expr.into()),
            alias: None,
            append: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn append(mut self, suffix: impl Into<String>) -> Self {
        self.append = Some(suffix.into());
        self
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! into_statement {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Statement {
                fn from(stmt: $ty) -> Self {
                    Statement::$variant(stmt)
                }
            }
        )*
    };
}

into_statement! {
    Create => Create,
    Select => Select,
    Update => Update,
    Delete => Delete,
    Relate => Relate,
    Let => Let,
    IfStmt => If,
    Wrap => Wrap,
}

impl From<&str> for Statement {
    fn from(text: &str) -> Self {
        Statement::Raw(text.to_string())
    }
}

impl From<String> for Statement {
    fn from(text: String) -> Self {
        Statement::Raw(text)
    }
}

impl From<&String> for Statement {
    fn from(text: &String) -> Self {
        Statement::Raw(text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_assignments_set_wins_in_place() {
        let update = Update::new("channel:general")
            .content(json!({ "name": "general", "topic": "old" }))
            .set("topic", Assignment::assign("new"))
            .set("members", Assignment::add("$user"));

        let merged = update.assignments();
        let keys: Vec<_> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "topic", "members"]);
        assert_eq!(merged["topic"], Assignment::assign("new"));
        assert_eq!(merged["members"].op, SetOp::Add);
    }

    #[test]
    fn test_assignment_from_operator_pair() {
        assert_eq!(Assignment::from(json!(["-=", 2])), Assignment::sub(2));
        assert_eq!(Assignment::from(json!(["x", 2])), Assignment::assign(json!(["x", 2])));
        assert_eq!(Assignment::from(json!("plain")), Assignment::assign("plain"));
    }

    #[test]
    fn test_select_and_where_combines() {
        let select = Select::new("message")
            .and_where("channel=$channel")
            .and_where("deleted=false");
        assert_eq!(
            select.where_,
            Some(Cond::And(vec![
                Cond::raw("channel=$channel"),
                Cond::raw("deleted=false")
            ]))
        );
    }

    #[test]
    fn test_fields_from_star() {
        assert_eq!(Fields::from("*"), Fields::All);
        assert_eq!(Fields::from("name"), Fields::List(vec!["name".into()]));
    }
}
