//! Value quoting and content encoding.
//!
//! Two rules govern how JSON values end up in query text:
//!
//! - [`quote_value`] renders a discrete value on the right-hand side of a
//!   comparison or assignment. Strings are quoted unless they start with the
//!   variable sigil `$`, in which case they are bound variable references.
//! - [`encode_content`] renders an object literal for `CONTENT` / `MERGE`
//!   bodies. Keys are left unquoted and `$`-prefixed strings are emitted as
//!   variable references at any depth.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Prefix marking a bound variable (`$parent`, `$auth`, ...).
pub const VARIABLE_SIGIL: char = '$';

/// Returns true if `s` is a variable reference rather than a string literal.
pub fn is_variable(s: &str) -> bool {
    s.starts_with(VARIABLE_SIGIL)
}

/// Render a single value for use in a comparison or assignment.
///
/// Plain strings are JSON-escaped inside the quotes, so `a"b` renders as
/// `"a\"b"` rather than `"a"b"`. Strings without quotes, backslashes or
/// control characters come out exactly as `"<v>"`.
///
/// ```
/// use huddle_sql::quote_value;
/// use serde_json::json;
///
/// assert_eq!(quote_value(&json!("general")), "\"general\"");
/// assert_eq!(quote_value(&json!("$parent")), "$parent");
/// assert_eq!(quote_value(&json!(42)), "42");
/// ```
pub fn quote_value(value: &Value) -> String {
    match value {
        Value::String(s) if is_variable(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => encode_content(value),
        // Display on Value yields JSON text: quoted and escaped for strings
        other => other.to_string(),
    }
}

/// Encode a value as a query-language object literal.
///
/// ```
/// use huddle_sql::encode_content;
/// use serde_json::json;
///
/// let content = json!({ "name": "design", "owner": "$auth.id" });
/// assert_eq!(encode_content(&content), "{name:\"design\",owner:$auth.id}");
/// ```
pub fn encode_content(value: &Value) -> String {
    let mut out = String::new();
    write_content(&mut out, value);
    out
}

/// Serialize any value into content suitable for `CONTENT` / `MERGE`.
pub fn to_content<T: Serialize + ?Sized>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

fn write_content(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_key(out, key);
                out.push(':');
                write_content(out, item);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_content(out, item);
            }
            out.push(']');
        }
        Value::String(s) if is_variable(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}

fn write_key(out: &mut String, key: &str) {
    if is_identifier(key) {
        out.push_str(key);
    } else {
        // Keys that are not plain identifiers stay quoted so the literal parses
        out.push_str(&Value::String(key.to_string()).to_string());
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A bound variable name, always carrying the `$` sigil.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param(String);

impl Param {
    /// Create a parameter, adding the `$` prefix when it is missing.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if is_variable(&name) {
            Self(name)
        } else {
            Self(format!("{VARIABLE_SIGIL}{name}"))
        }
    }

    /// The parameter including its sigil.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Param {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
