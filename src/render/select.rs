use super::Renderer;
use crate::ast::{Distinct, LockingClause, Query, SelectBody, SelectStmt, SortBy, WithClause};

impl Renderer<'_> {
    /// A query whose first line sits at `depth`. The result starts with that
    /// line's indentation.
    pub(crate) fn query(&self, query: &Query, depth: usize) -> String {
        let body = self.select_body(&query.body, depth);
        if body.is_empty() {
            return body;
        }

        let mut out = String::new();
        if let Some(with) = &query.with {
            out.push_str(&self.with_clause(with, depth));
            out.push('\n');
        }
        out.push_str(&body);

        if !query.order_by.is_empty() {
            out.push_str(&self.newline(depth));
            out.push_str("ORDER BY ");
            let separator = format!(",{}", self.newline(depth + 1));
            out.push_str(&self.sort_list(&query.order_by, depth, &separator));
        }
        if let Some(limit) = &query.limit {
            out.push_str(&self.newline(depth));
            out.push_str("LIMIT ");
            out.push_str(&self.expr(limit, depth));
        }
        if let Some(offset) = &query.offset {
            out.push_str(&self.newline(depth));
            out.push_str("OFFSET ");
            out.push_str(&self.expr(offset, depth));
        }
        for lock in &query.locking {
            out.push_str(&self.newline(depth));
            out.push_str(&locking_clause(lock));
        }
        out
    }

    fn with_clause(&self, with: &WithClause, depth: usize) -> String {
        let mut out = self.indent(depth);
        out.push_str("WITH ");
        if with.recursive {
            out.push_str("RECURSIVE ");
        }
        let ctes: Vec<String> = with
            .ctes
            .iter()
            .map(|cte| {
                let materialized = cte
                    .materialized
                    .as_ref()
                    .map(|m| format!("{m} "))
                    .unwrap_or_default();
                format!(
                    "{} AS {}(\n{}{})",
                    cte.name,
                    materialized,
                    self.query(&cte.query, depth + 1),
                    self.newline(depth)
                )
            })
            .collect();
        out.push_str(&ctes.join(", "));
        out
    }

    fn select_body(&self, body: &SelectBody, depth: usize) -> String {
        match body {
            SelectBody::Select(select) => self.select_stmt(select, depth),
            SelectBody::SetOp(set_op) => {
                let left = self.select_body(&set_op.left, depth);
                let right = self.select_body(&set_op.right, depth);
                format!(
                    "{}{}{}\n{}",
                    left,
                    self.newline(depth),
                    set_op.op.keyword(set_op.all),
                    right
                )
            }
            SelectBody::Values(rows) => {
                format!("{}VALUES {}", self.indent(depth), self.value_rows(rows, depth))
            }
            SelectBody::Query(query) => format!(
                "{}(\n{}{})",
                self.indent(depth),
                self.query(query, depth + 1),
                self.newline(depth)
            ),
        }
    }

    fn select_stmt(&self, select: &SelectStmt, depth: usize) -> String {
        if select.targets.is_empty() {
            return String::new();
        }

        let mut out = self.indent(depth);
        out.push_str("SELECT");
        match &select.distinct {
            Some(Distinct::Plain) => out.push_str(" DISTINCT"),
            Some(Distinct::On(exprs)) => {
                out.push_str(" DISTINCT ON (");
                out.push_str(&self.expr_list(exprs, depth));
                out.push(')');
            }
            None => {}
        }

        let targets: Vec<String> = select
            .targets
            .iter()
            .map(|t| format!("{}{}", self.newline(depth + 1), self.res_target(t, depth + 1)))
            .collect();
        out.push_str(&targets.join(","));

        if !select.from.is_empty() {
            let items: Vec<String> = select.from.iter().map(|f| self.from_item(f, depth)).collect();
            out.push_str(&self.newline(depth));
            out.push_str("FROM ");
            out.push_str(&items.join(", "));
        }

        out.push_str(&self.where_clause(select.where_clause.as_ref(), depth));

        if !select.group_by.is_empty() {
            out.push_str(&self.newline(depth));
            out.push_str("GROUP BY ");
            out.push_str(&self.expr_list(&select.group_by, depth));
        }
        if let Some(having) = &select.having {
            out.push_str(&self.newline(depth));
            out.push_str("HAVING ");
            out.push_str(&self.expr(having, depth));
        }
        out
    }

    /// Sort items joined by `separator`.
    pub(crate) fn sort_list(&self, items: &[SortBy], depth: usize, separator: &str) -> String {
        items
            .iter()
            .map(|item| {
                let mut out = self.expr(&item.node, depth);
                out.push_str(item.dir.suffix());
                if let Some(nulls) = item.nulls {
                    out.push_str(nulls.suffix());
                }
                out
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}

fn locking_clause(lock: &LockingClause) -> String {
    let mut out = lock.strength.keyword().to_string();
    if let Some(table) = &lock.of {
        out.push_str(" OF ");
        out.push_str(table);
    }
    if let Some(wait) = lock.wait {
        out.push(' ');
        out.push_str(wait.keyword());
    }
    out
}
