//! Selectable field paths.
//!
//! A [`Schema`] describes the shape of a record so that field lists used in
//! `SELECT` projections and `RETURN` clauses can be checked before a query is
//! built. Nested records are referenced through `fn() -> Schema`, which lets
//! self-referential records (a message replying to a message) be described
//! without building an infinite value.
//!
//! ```
//! use huddle_sql::path::{selectable_paths, FieldKind, Schema, Selectable};
//!
//! struct User;
//! impl Selectable for User {
//!     fn schema() -> Schema {
//!         Schema::new("user")
//!             .field("id", FieldKind::scalar())
//!             .field("name", FieldKind::scalar())
//!     }
//! }
//!
//! struct Message;
//! impl Selectable for Message {
//!     fn schema() -> Schema {
//!         Schema::new("message")
//!             .field("text", FieldKind::scalar())
//!             .field("author", FieldKind::record::<User>())
//!     }
//! }
//!
//! let paths = selectable_paths(&Message::schema());
//! assert!(paths.contains("author.name"));
//! ```

use std::collections::BTreeSet;

use crate::error::PathError;

/// Terminal field types that are never traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// Strings, numbers, booleans, record ids
    Scalar,
    Date,
    Bytes,
    Function,
}

/// The type of a single field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Leaf(LeafKind),
    /// A nested record, expanded on demand
    Record(fn() -> Schema),
    /// An array; traversed into its element type
    Array(Box<FieldKind>),
}

impl FieldKind {
    pub const fn scalar() -> Self {
        FieldKind::Leaf(LeafKind::Scalar)
    }

    pub const fn date() -> Self {
        FieldKind::Leaf(LeafKind::Date)
    }

    pub const fn bytes() -> Self {
        FieldKind::Leaf(LeafKind::Bytes)
    }

    pub const fn function() -> Self {
        FieldKind::Leaf(LeafKind::Function)
    }

    pub fn record<T: Selectable>() -> Self {
        FieldKind::Record(T::schema)
    }

    /// Array of `T` records.
    pub fn records<T: Selectable>() -> Self {
        FieldKind::Array(Box::new(FieldKind::Record(T::schema)))
    }

    pub fn array(element: FieldKind) -> Self {
        FieldKind::Array(Box::new(element))
    }

    /// The record schema reached through this field, looking through arrays.
    fn target(&self) -> Option<Schema> {
        match self {
            FieldKind::Leaf(_) => None,
            FieldKind::Record(schema) => Some(schema()),
            FieldKind::Array(inner) => inner.target(),
        }
    }

    /// One-level comparison; nested records compare by schema name.
    fn shallow_eq(&self, other: &FieldKind) -> bool {
        match (self, other) {
            (FieldKind::Leaf(a), FieldKind::Leaf(b)) => a == b,
            (FieldKind::Record(a), FieldKind::Record(b)) => a().name == b().name,
            (FieldKind::Array(a), FieldKind::Array(b)) => a.shallow_eq(b),
            _ => false,
        }
    }
}

/// A named field.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

/// Shape of a record type.
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
        });
        self
    }

    fn get(&self, name: &str) -> Option<&FieldKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.kind)
    }

    /// Same field names with the same kinds, ignoring order.
    pub fn structurally_eq(&self, other: &Schema) -> bool {
        self.fields.len() == other.fields.len() && self.is_assignable_to(other)
    }

    /// True if every field of `target` exists here with a matching kind,
    /// i.e. a value of this shape could be used where `target` is expected.
    pub fn is_assignable_to(&self, target: &Schema) -> bool {
        target.fields.iter().all(|field| {
            self.get(&field.name)
                .is_some_and(|kind| kind.shallow_eq(&field.kind))
        })
    }
}

/// Record types that can describe their own shape.
pub trait Selectable {
    fn schema() -> Schema;
}

/// Every legal dotted path into `schema`.
pub fn selectable_paths(schema: &Schema) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    let mut ancestors = vec![schema.clone()];
    collect(schema, "", &mut ancestors, &mut paths);
    paths
}

fn collect(
    schema: &Schema,
    prefix: &str,
    ancestors: &mut Vec<Schema>,
    paths: &mut BTreeSet<String>,
) {
    for field in &schema.fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };
        paths.insert(path.clone());

        let Some(child) = field.kind.target() else {
            continue;
        };
        // Cycle guard: stop at a shape we are already inside of, or one the
        // parent already satisfies.
        if ancestors.iter().any(|a| a.structurally_eq(&child)) || schema.is_assignable_to(&child)
        {
            continue;
        }

        ancestors.push(child.clone());
        collect(&child, &path, ancestors, paths);
        ancestors.pop();
    }
}

/// Check that every path in `fields` is selectable on `schema`.
///
/// `*` is always accepted.
pub fn validate_paths<S: AsRef<str>>(schema: &Schema, fields: &[S]) -> Result<(), PathError> {
    let paths = selectable_paths(schema);
    for field in fields {
        let field = field.as_ref().trim();
        if field.is_empty() {
            return Err(PathError::Empty {
                record: schema.name.clone(),
            });
        }
        if field != "*" && !paths.contains(field) {
            return Err(PathError::Unknown {
                path: field.to_string(),
                record: schema.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Role;
    impl Selectable for Role {
        fn schema() -> Schema {
            Schema::new("role")
                .field("name", FieldKind::scalar())
                .field("color", FieldKind::scalar())
        }
    }

    struct User;
    impl Selectable for User {
        fn schema() -> Schema {
            Schema::new("user")
                .field("id", FieldKind::scalar())
                .field("name", FieldKind::scalar())
                .field("avatar", FieldKind::bytes())
                .field("joined", FieldKind::date())
                .field("tags", FieldKind::array(FieldKind::scalar()))
                .field("roles", FieldKind::records::<Role>())
        }
    }

    struct Message;
    impl Selectable for Message {
        fn schema() -> Schema {
            Schema::new("message")
                .field("id", FieldKind::scalar())
                .field("text", FieldKind::scalar())
                .field("author", FieldKind::record::<User>())
                .field("reply_to", FieldKind::record::<Message>())
        }
    }

    /// Carries a subset of the fields of `Thread`.
    struct Quote;
    impl Selectable for Quote {
        fn schema() -> Schema {
            Schema::new("quote")
                .field("id", FieldKind::scalar())
                .field("text", FieldKind::scalar())
        }
    }

    struct Thread;
    impl Selectable for Thread {
        fn schema() -> Schema {
            Schema::new("thread")
                .field("id", FieldKind::scalar())
                .field("text", FieldKind::scalar())
                .field("quote", FieldKind::record::<Quote>())
        }
    }

    #[test]
    fn test_leaves_are_terminal() {
        let paths = selectable_paths(&User::schema());
        assert!(paths.contains("avatar"));
        assert!(paths.contains("joined"));
        assert!(paths.contains("tags"));
        assert!(!paths.iter().any(|p| p.starts_with("avatar.") || p.starts_with("tags.")));
    }

    #[test]
    fn test_recurses_into_records_and_arrays() {
        let paths = selectable_paths(&Message::schema());
        assert!(paths.contains("author"));
        assert!(paths.contains("author.name"));
        assert!(paths.contains("author.roles"));
        assert!(paths.contains("author.roles.color"));
    }

    #[test]
    fn test_self_reference_is_not_expanded() {
        let paths = selectable_paths(&Message::schema());
        assert!(paths.contains("reply_to"));
        assert!(!paths.iter().any(|p| p.starts_with("reply_to.")));
    }

    #[test]
    fn test_parent_assignable_to_child_is_not_expanded() {
        let paths = selectable_paths(&Thread::schema());
        assert!(paths.contains("quote"));
        assert!(!paths.contains("quote.text"));
    }

    #[test]
    fn test_validate_paths() {
        let schema = Message::schema();
        assert!(validate_paths(&schema, &["id", "author.name", "*"]).is_ok());

        let err = validate_paths(&schema, &["author.email"]).unwrap_err();
        assert_eq!(
            err,
            PathError::Unknown {
                path: "author.email".into(),
                record: "message".into()
            }
        );
        assert!(matches!(
            validate_paths(&schema, &[" "]),
            Err(PathError::Empty { .. })
        ));
    }

    #[test]
    fn test_structural_equality_ignores_order() {
        let a = Schema::new("a")
            .field("x", FieldKind::scalar())
            .field("y", FieldKind::date());
        let b = Schema::new("b")
            .field("y", FieldKind::date())
            .field("x", FieldKind::scalar());
        assert!(a.structurally_eq(&b));
        assert!(!a.structurally_eq(&Schema::new("c").field("x", FieldKind::scalar())));
    }
}
