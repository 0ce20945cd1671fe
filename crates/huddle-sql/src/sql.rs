//! String-producing query builders.
//!
//! Thin wrappers over the statement AST for callers that compose queries as
//! text. Every function returns a statement or expression followed by one
//! trailing space, so results can be concatenated directly. Nested inputs are
//! trimmed before they are embedded.
//!
//! ```
//! use huddle_sql::sql;
//!
//! let query = sql::transaction(&[
//!     sql::create("channel:general", &serde_json::json!({ "name": "general" }), None),
//!     sql::delete("invite:old", &Default::default()),
//! ]);
//! assert!(query.starts_with("BEGIN TRANSACTION; CREATE channel:general"));
//! ```

use serde_json::{Map, Value};

use crate::cond::{Cond, Join};
use crate::render::render;
use crate::stmt::*;
use crate::value::Param;

fn raw_conds<S: AsRef<str>>(exprs: &[S]) -> Vec<Cond> {
    exprs.iter().map(|e| Cond::raw(e.as_ref())).collect()
}

fn raw_stmts<S: AsRef<str>>(statements: &[S]) -> Vec<Statement> {
    statements.iter().map(|s| Statement::raw(s.as_ref())).collect()
}

/// `(a)&&(b)&&...`
pub fn and<S: AsRef<str>>(exprs: &[S]) -> String {
    render(&Cond::And(raw_conds(exprs)))
}

/// `(a)||(b)||...`
pub fn or<S: AsRef<str>>(exprs: &[S]) -> String {
    render(&Cond::Or(raw_conds(exprs)))
}

/// `key=value` for every entry, joined with `join`.
///
/// A value of the form `[operator, operand]` renders as `key<op><operand>`.
pub fn match_fields(conditions: &Map<String, Value>, join: Join) -> String {
    render(&Cond::from_map(conditions).joined_by(join))
}

/// Statements joined with `; `.
pub fn multi<S: AsRef<str>>(statements: &[S]) -> String {
    render(&Statement::Multi(raw_stmts(statements)))
}

/// Options for [`wrap`]. `alias` wins when both are set.
#[derive(Debug, Clone, Default)]
pub struct WrapOptions<'a> {
    pub alias: Option<&'a str>,
    pub append: Option<&'a str>,
}

/// `(expr)`, optionally followed by `AS alias` or a suffix.
pub fn wrap(expr: &str, options: WrapOptions<'_>) -> String {
    let mut wrapped = Wrap::new(expr);
    wrapped.alias = options.alias.map(str::to_string);
    wrapped.append = options.append.map(str::to_string);
    render(&wrapped)
}

/// `CREATE <record> CONTENT <json> [RETURN ...]`
pub fn create(record: &str, content: &Value, ret: Option<Return>) -> String {
    let mut stmt = Create::new(record, content.clone());
    stmt.ret = ret;
    render(&stmt)
}

/// Options for [`delete`].
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions<'a> {
    pub where_: Option<&'a str>,
    /// Defaults to `NONE`
    pub ret: Option<Return>,
}

/// `DELETE <record> [WHERE ...] RETURN <fields|NONE>`
pub fn delete(record: &str, options: &DeleteOptions<'_>) -> String {
    let mut stmt = Delete::new(record);
    stmt.where_ = options.where_.map(Cond::from);
    stmt.ret = options.ret.clone().unwrap_or_default();
    render(&stmt)
}

/// Options for [`relate`].
#[derive(Debug, Clone, Default)]
pub struct RelateOptions {
    pub content: Option<Value>,
    /// Defaults to `NONE`
    pub ret: Option<Return>,
}

/// `RELATE <from>-><edge>-><to> [CONTENT ...] RETURN <fields|NONE>`
pub fn relate(from: &str, edge: &str, to: &str, options: &RelateOptions) -> String {
    let mut stmt = Relate::new(from, edge, to);
    stmt.content = options.content.clone();
    stmt.ret = options.ret.clone().unwrap_or_default();
    render(&stmt)
}

/// Options for [`select`].
#[derive(Debug, Clone, Default)]
pub struct SelectOptions<'a> {
    pub from: &'a str,
    pub where_: Option<&'a str>,
}

/// `SELECT <*|fields> FROM <from> [WHERE ...]`
pub fn select(fields: impl Into<Fields>, options: &SelectOptions<'_>) -> String {
    let mut stmt = Select::new(options.from).fields(fields);
    stmt.where_ = options.where_.map(Cond::from);
    render(&stmt)
}

/// Options for [`update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions<'a> {
    /// `Some(false)` uses `CONTENT` instead of `MERGE`
    pub merge: Option<bool>,
    /// Field-update set; values may be `[op, operand]` pairs
    pub set: Option<&'a Map<String, Value>>,
    pub where_: Option<&'a str>,
    pub ret: Option<Return>,
}

/// `UPDATE <record> <SET ...|MERGE ...|CONTENT ...> [WHERE ...] [RETURN ...]`
pub fn update(record: &str, content: &Value, options: &UpdateOptions<'_>) -> String {
    let mut stmt = Update::new(record)
        .content(content.clone())
        .merge(options.merge.unwrap_or(true));
    if let Some(set) = options.set {
        stmt.set = Some(
            set.iter()
                .map(|(k, v)| (k.clone(), Assignment::from(v.clone())))
                .collect(),
        );
    }
    stmt.where_ = options.where_.map(Cond::from);
    stmt.ret = options.ret.clone();
    render(&stmt)
}

/// `LET $name = expr`
pub fn let_var(name: impl Into<Param>, expr: &str) -> String {
    render(&Let::new(name, expr))
}

/// A branch after the first one of an IF statement. A block without a
/// condition is the final `ELSE`; blocks after it are ignored.
#[derive(Debug, Clone, Copy)]
pub struct IfBlock<'a> {
    pub cond: Option<&'a str>,
    pub body: &'a str,
}

/// `IF <cond> THEN <body> [ELSE IF ...]* [ELSE ...] END`
pub fn if_else(cond: &str, then: &str, rest: &[IfBlock<'_>]) -> String {
    let mut stmt = IfStmt::new(cond, then);
    for block in rest {
        match block.cond {
            Some(cond) => stmt = stmt.else_if(cond, block.body),
            None => {
                stmt = stmt.otherwise(block.body);
                break;
            }
        }
    }
    render(&stmt)
}

/// `BEGIN TRANSACTION; ...; COMMIT TRANSACTION`
pub fn transaction<S: AsRef<str>>(statements: &[S]) -> String {
    render(&Statement::Transaction(raw_stmts(statements)))
}
