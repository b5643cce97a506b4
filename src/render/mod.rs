//! Styled SQL emitters.
//!
//! Every emitter takes the node and the indentation depth of the line it
//! starts on, and returns an owned `String`. The statement tree is already
//! resolved, so nothing here can fail.

mod expr;
mod from;
mod mutation;
mod select;

use crate::ast::{Expr, ResTarget, Statement};
use crate::config::StyleConfig;

/// Renders statements with one style configuration.
pub struct Renderer<'a> {
    conf: &'a StyleConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(conf: &'a StyleConfig) -> Self {
        Self { conf }
    }

    /// Render one statement at depth 0.
    pub fn statement(&self, stmt: &Statement) -> String {
        match stmt {
            Statement::Select(query) => self.query(query, 0),
            Statement::Insert(insert) => self.insert(insert),
            Statement::Update(update) => self.update(update),
            Statement::Delete(delete) => self.delete(delete),
        }
    }

    fn indent(&self, depth: usize) -> String {
        self.conf.indent_by(depth)
    }

    /// A line break followed by `depth` indentation units.
    fn newline(&self, depth: usize) -> String {
        format!("\n{}", self.indent(depth))
    }

    fn where_clause(&self, predicate: Option<&Expr>, depth: usize) -> String {
        match predicate {
            Some(expr) => format!("{}WHERE {}", self.newline(depth), self.expr(expr, depth)),
            None => String::new(),
        }
    }

    fn returning(&self, targets: &[ResTarget], depth: usize) -> String {
        if targets.is_empty() {
            return String::new();
        }
        let items: Vec<String> = targets.iter().map(|t| self.res_target(t, depth)).collect();
        format!("{}RETURNING {}", self.newline(depth), items.join(", "))
    }

    fn res_target(&self, target: &ResTarget, depth: usize) -> String {
        let value = self.expr(&target.val, depth);
        match &target.name {
            Some(name) => format!("{value} AS {name}"),
            None => value,
        }
    }

    fn expr_list(&self, exprs: &[Expr], depth: usize) -> String {
        exprs
            .iter()
            .map(|e| self.expr(e, depth))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
