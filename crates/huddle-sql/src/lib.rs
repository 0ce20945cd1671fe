//! # Huddle SurrealQL builder
//!
//! Builds SurrealQL statements as a typed AST and renders them to query text.
//!
//! - [`stmt`]: statement types (`CREATE`, `SELECT`, `UPDATE`, `DELETE`,
//!   `RELATE`, `LET`, `IF`, transactions)
//! - [`cond`]: `WHERE` / `IF` conditions
//! - [`render`](mod@render): the single render pass
//! - [`sql`]: string-returning helpers for composing queries as text
//! - [`path`]: selectable field paths for projections and `RETURN` lists
//!
//! Rendered statements end with one trailing space so they can be
//! concatenated; [`Statement`]'s `Display` gives the trimmed form.
//!
//! ```
//! use huddle_sql::{render, Cond, Delete, Return};
//!
//! let stmt = Delete::new("message")
//!     .where_(Cond::and(["channel=$channel", "pinned=false"]))
//!     .returning(Return::Before);
//! assert_eq!(
//!     render(&stmt),
//!     "DELETE message WHERE (channel=$channel)&&(pinned=false) RETURN BEFORE "
//! );
//! ```

pub mod cond;
pub mod error;
pub mod path;
pub mod render;
pub mod sql;
pub mod stmt;
pub mod value;

pub use cond::{Cond, Join, Predicate};
pub use error::PathError;
pub use path::{selectable_paths, validate_paths, FieldKind, Schema, Selectable};
pub use render::{render, render_trimmed, Render, RenderContext};
pub use stmt::*;
pub use value::{encode_content, is_variable, quote_value, to_content, Param};
