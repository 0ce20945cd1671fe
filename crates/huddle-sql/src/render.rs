//! Render statement ASTs to query text.
//!
//! Every node renders without trailing whitespace. [`render`] adds the single
//! trailing space that lets callers concatenate statements without trimming.

use std::fmt;

use crate::cond::{Cond, Predicate};
use crate::stmt::*;
use crate::value::{encode_content, quote_value};

/// Accumulates query text for a single render pass.
#[derive(Debug, Default)]
pub struct RenderContext {
    sql: String,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Write a keyword preceded by a single space.
    fn clause(&mut self, keyword: &str) {
        self.sql.push(' ');
        self.sql.push_str(keyword);
        self.sql.push(' ');
    }

    fn list(&mut self, items: &[String], sep: &str) {
        self.write(&items.join(sep));
    }

    fn separated<T: Render>(&mut self, items: &[T], sep: &str) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(sep);
            }
            item.render(self);
        }
    }

    /// Finish rendering and return the text without trailing whitespace.
    pub fn finish(self) -> String {
        let mut sql = self.sql;
        sql.truncate(sql.trim_end().len());
        sql
    }
}

/// Types that can be rendered to query text.
pub trait Render {
    fn render(&self, ctx: &mut RenderContext);
}

/// Render a node, terminated with exactly one trailing space.
pub fn render(node: &impl Render) -> String {
    let mut sql = render_trimmed(node);
    sql.push(' ');
    sql
}

/// Render a node without the trailing separator, for embedding.
pub fn render_trimmed(node: &impl Render) -> String {
    let mut ctx = RenderContext::new();
    node.render(&mut ctx);
    ctx.finish()
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_trimmed(self))
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_trimmed(self))
    }
}

// ============================================================================
// Conditions
// ============================================================================

impl Render for Cond {
    fn render(&self, ctx: &mut RenderContext) {
        match self {
            Cond::Raw(text) => ctx.write(text.trim()),
            Cond::And(conds) => render_grouped(ctx, conds, "&&"),
            Cond::Or(conds) => render_grouped(ctx, conds, "||"),
            Cond::Match { pairs, join } => {
                for (i, (field, predicate)) in pairs.iter().enumerate() {
                    if i > 0 {
                        ctx.write(join.as_str());
                    }
                    ctx.write(field);
                    predicate.render(ctx);
                }
            }
        }
    }
}

fn render_grouped(ctx: &mut RenderContext, conds: &[Cond], op: &str) {
    for (i, cond) in conds.iter().enumerate() {
        if i > 0 {
            ctx.write(op);
        }
        ctx.write("(");
        cond.render(ctx);
        ctx.write(")");
    }
}

impl Render for Predicate {
    fn render(&self, ctx: &mut RenderContext) {
        match self {
            Predicate::Eq(value) => {
                ctx.write("=");
                ctx.write(&quote_value(value));
            }
            Predicate::Op { op, value } => {
                let op = op.trim();
                // Word operators (CONTAINS, INSIDE, ...) need surrounding spaces
                if op.chars().any(|c| c.is_ascii_alphabetic()) {
                    ctx.clause(op);
                } else {
                    ctx.write(op);
                }
                ctx.write(&quote_value(value));
            }
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

impl Render for Statement {
    fn render(&self, ctx: &mut RenderContext) {
        match self {
            Statement::Create(stmt) => stmt.render(ctx),
            Statement::Select(stmt) => stmt.render(ctx),
            Statement::Update(stmt) => stmt.render(ctx),
            Statement::Delete(stmt) => stmt.render(ctx),
            Statement::Relate(stmt) => stmt.render(ctx),
            Statement::Let(stmt) => stmt.render(ctx),
            Statement::If(stmt) => stmt.render(ctx),
            Statement::Wrap(stmt) => stmt.render(ctx),
            Statement::Transaction(stmts) => {
                ctx.write("BEGIN TRANSACTION; ");
                for stmt in stmts {
                    stmt.render(ctx);
                    ctx.write("; ");
                }
                ctx.write("COMMIT TRANSACTION");
            }
            Statement::Multi(stmts) => ctx.separated(stmts, "; "),
            Statement::Raw(text) => ctx.write(text.trim()),
        }
    }
}

impl Render for Return {
    fn render(&self, ctx: &mut RenderContext) {
        match self {
            Return::None => ctx.write("NONE"),
            Return::Before => ctx.write("BEFORE"),
            Return::After => ctx.write("AFTER"),
            Return::Diff => ctx.write("DIFF"),
            Return::Fields(fields) => ctx.list(fields, ","),
        }
    }
}

fn render_return(ctx: &mut RenderContext, ret: &Return) {
    ctx.clause("RETURN");
    ret.render(ctx);
}

fn render_where(ctx: &mut RenderContext, cond: &Option<Cond>) {
    if let Some(cond) = cond {
        ctx.clause("WHERE");
        cond.render(ctx);
    }
}

impl Render for Create {
    fn render(&self, ctx: &mut RenderContext) {
        ctx.write("CREATE ");
        ctx.write(&self.record);
        ctx.clause("CONTENT");
        ctx.write(&encode_content(&self.content));
        if let Some(ret) = &self.ret {
            render_return(ctx, ret);
        }
    }
}

impl Render for Select {
    fn render(&self, ctx: &mut RenderContext) {
        ctx.write("SELECT ");
        match &self.fields {
            Fields::All => ctx.write("*"),
            Fields::List(fields) => ctx.list(fields, ","),
        }
        ctx.clause("FROM");
        ctx.write(&self.from);
        render_where(ctx, &self.where_);
        if !self.split.is_empty() {
            ctx.clause("SPLIT");
            ctx.list(&self.split, ",");
        }
        if !self.group_by.is_empty() {
            ctx.clause("GROUP BY");
            ctx.list(&self.group_by, ",");
        }
        if !self.order_by.is_empty() {
            ctx.clause("ORDER BY");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ctx.write(",");
                }
                ctx.write(&order.field);
                ctx.write(if order.desc { " DESC" } else { " ASC" });
            }
        }
        if let Some(limit) = self.limit {
            ctx.clause("LIMIT");
            ctx.write(&limit.to_string());
        }
        if let Some(start) = self.start {
            ctx.clause("START");
            ctx.write(&start.to_string());
        }
        if !self.fetch.is_empty() {
            ctx.clause("FETCH");
            ctx.list(&self.fetch, ",");
        }
    }
}

impl Render for Update {
    fn render(&self, ctx: &mut RenderContext) {
        ctx.write("UPDATE ");
        ctx.write(&self.record);
        if self.set.is_some() {
            ctx.clause("SET");
            for (i, (field, assignment)) in self.assignments().iter().enumerate() {
                if i > 0 {
                    ctx.write(", ");
                }
                ctx.write(field);
                ctx.write(assignment.op.as_str());
                ctx.write(&quote_value(&assignment.value));
            }
        } else {
            ctx.clause(match self.mode {
                UpdateMode::Merge => "MERGE",
                UpdateMode::Content => "CONTENT",
            });
            ctx.write(&encode_content(&self.content));
        }
        render_where(ctx, &self.where_);
        if let Some(ret) = &self.ret {
            render_return(ctx, ret);
        }
    }
}

impl Render for Delete {
    fn render(&self, ctx: &mut RenderContext) {
        ctx.write("DELETE ");
        ctx.write(&self.record);
        render_where(ctx, &self.where_);
        render_return(ctx, &self.ret);
    }
}

impl Render for Relate {
    fn render(&self, ctx: &mut RenderContext) {
        ctx.write("RELATE ");
        ctx.write(&self.from);
        ctx.write("->");
        ctx.write(&self.edge);
        ctx.write("->");
        ctx.write(&self.to);
        if let Some(content) = &self.content {
            ctx.clause("CONTENT");
            ctx.write(&encode_content(content));
        }
        render_return(ctx, &self.ret);
    }
}

impl Render for Let {
    fn render(&self, ctx: &mut RenderContext) {
        ctx.write("LET ");
        ctx.write(self.name.as_str());
        ctx.write(" = ");
        self.expr.render(ctx);
    }
}

impl Render for IfStmt {
    fn render(&self, ctx: &mut RenderContext) {
        for (i, (cond, body)) in self.branches.iter().enumerate() {
            ctx.write(if i == 0 { "IF " } else { " ELSE IF " });
            cond.render(ctx);
            ctx.clause("THEN");
            body.render(ctx);
        }
        if let Some(body) = &self.otherwise {
            ctx.clause("ELSE");
            body.render(ctx);
        }
        ctx.write(" END");
    }
}

impl Render for Wrap {
    fn render(&self, ctx: &mut RenderContext) {
        ctx.write("(");
        self.expr.render(ctx);
        ctx.write(")");
        if let Some(alias) = &self.alias {
            ctx.clause("AS");
            ctx.write(alias);
        } else if let Some(suffix) = &self.append {
            ctx.write(" ");
            ctx.write(suffix.trim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_adds_single_trailing_space() {
        let stmt = Statement::raw("SELECT * FROM user   ");
        assert_eq!(render(&stmt), "SELECT * FROM user ");
    }

    #[test]
    fn test_display_is_trimmed() {
        let stmt: Statement = Delete::new("person:1").into();
        assert_eq!(stmt.to_string(), "DELETE person:1 RETURN NONE");
    }

    #[test]
    fn test_word_operator_is_padded() {
        let cond = Cond::matching([("tags", Predicate::op("CONTAINS", "urgent"))]);
        assert_eq!(render_trimmed(&cond), "tags CONTAINS \"urgent\"");
    }

    #[test]
    fn test_symbolic_operator_is_glued() {
        let cond = Cond::matching([("created", Predicate::op(">=", "$since"))]);
        assert_eq!(render_trimmed(&cond), "created>=$since");
    }

    #[test]
    fn test_nested_statement_is_trimmed() {
        let inner = Statement::raw("SELECT * FROM channel ");
        let stmt = Let::new("channels", inner);
        assert_eq!(render(&stmt), "LET $channels = SELECT * FROM channel ");
    }

    #[test]
    fn test_select_with_all_clauses() {
        let select = Select::new("message")
            .fields(["id", "text", "author.name"])
            .where_(Cond::matching([("channel", json!("$channel"))]))
            .split("reactions")
            .group_by("author")
            .order_by(OrderBy::desc("created"))
            .limit(50)
            .start(100)
            .fetch("author");
        assert_eq!(
            render(&select),
            "SELECT id,text,author.name FROM message WHERE channel=$channel SPLIT reactions \
             GROUP BY author ORDER BY created DESC LIMIT 50 START 100 FETCH author "
        );
    }
}
