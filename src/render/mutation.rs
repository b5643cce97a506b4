use super::Renderer;
use super::from::range_var;
use crate::ast::{
    Assignment, ConflictAction, ConflictTarget, DeleteStmt, Expr, InsertSource, InsertStmt,
    OnConflict, UpdateStmt,
};

impl Renderer<'_> {
    pub(crate) fn insert(&self, insert: &InsertStmt) -> String {
        let mut out = format!("INSERT INTO {}", insert.table);
        if let Some(alias) = &insert.alias {
            out.push_str(" AS ");
            out.push_str(alias);
        }
        if insert.columns.is_empty() {
            out.push('\n');
        } else {
            let columns: Vec<String> = insert
                .columns
                .iter()
                .map(|c| format!("{}{}", self.newline(1), c))
                .collect();
            out.push('(');
            out.push_str(&columns.join(","));
            out.push_str("\n) ");
        }

        match &insert.source {
            InsertSource::Values(rows) => {
                out.push_str("VALUES ");
                out.push_str(&self.value_rows(rows, 0));
            }
            InsertSource::Query(query) => out.push_str(&self.query(query, 0)),
            InsertSource::DefaultValues => out.push_str("DEFAULT VALUES"),
        }

        if let Some(conflict) = &insert.on_conflict {
            out.push_str(&self.on_conflict(conflict));
        }
        out.push_str(&self.returning(&insert.returning, 0));
        out
    }

    pub(crate) fn update(&self, update: &UpdateStmt) -> String {
        let mut out = format!("UPDATE {}\nSET", range_var(&update.relation));
        out.push_str(&self.assignments(&update.assignments));
        out.push_str(&self.where_clause(update.where_clause.as_ref(), 0));
        out.push_str(&self.returning(&update.returning, 0));
        out
    }

    pub(crate) fn delete(&self, delete: &DeleteStmt) -> String {
        let mut out = format!("DELETE FROM {}", range_var(&delete.relation));
        out.push_str(&self.where_clause(delete.where_clause.as_ref(), 0));
        out.push_str(&self.returning(&delete.returning, 0));
        out
    }

    /// `(\n  a,\n  b\n)` tuples joined by `, `.
    pub(crate) fn value_rows(&self, rows: &[Vec<Expr>], depth: usize) -> String {
        rows.iter()
            .map(|row| {
                let values: Vec<String> = row
                    .iter()
                    .map(|v| format!("{}{}", self.newline(depth + 1), self.expr(v, depth + 1)))
                    .collect();
                format!("({}{})", values.join(","), self.newline(depth))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn on_conflict(&self, conflict: &OnConflict) -> String {
        let mut out = String::from("\nON CONFLICT");
        match &conflict.target {
            Some(ConflictTarget::Columns(columns)) => {
                out.push('(');
                out.push_str(&columns.join(", "));
                out.push(')');
            }
            Some(ConflictTarget::Constraint(name)) => {
                out.push_str(" ON CONSTRAINT ");
                out.push_str(name);
            }
            None => {}
        }
        match &conflict.action {
            ConflictAction::Nothing => out.push_str("\nDO NOTHING"),
            ConflictAction::Update {
                assignments,
                where_clause,
            } => {
                out.push_str("\nDO UPDATE SET");
                out.push_str(&self.assignments(assignments));
                out.push_str(&self.where_clause(where_clause.as_ref(), 0));
            }
        }
        out
    }

    fn assignments(&self, assignments: &[Assignment]) -> String {
        assignments
            .iter()
            .map(|a| format!("{}{} = {}", self.newline(1), a.target, self.expr(&a.value, 1)))
            .collect::<Vec<_>>()
            .join(",")
    }
}
