use super::Renderer;
use crate::ast::{FromItem, JoinExpr, JoinQual, RangeVar};
use crate::config::{JoinLineBreak, JoinStartIndent};

impl Renderer<'_> {
    /// One FROM item. Multi-line items continue at `depth`.
    pub(crate) fn from_item(&self, item: &FromItem, depth: usize) -> String {
        match item {
            FromItem::Table(table) => range_var(table),
            FromItem::Function(func) => {
                let mut out = String::new();
                if func.lateral {
                    out.push_str("LATERAL ");
                }
                out.push_str(&self.func_call(&func.call, depth));
                push_alias(&mut out, func.alias.as_deref());
                out
            }
            FromItem::Subquery(sub) => {
                let mut out = String::new();
                if sub.lateral {
                    out.push_str("LATERAL ");
                }
                out.push_str("(\n");
                out.push_str(&self.query(&sub.query, depth + 1));
                out.push_str(&self.newline(depth));
                out.push(')');
                push_alias(&mut out, sub.alias.as_deref());
                out
            }
            FromItem::Join(join) => self.join_expr(join, depth),
            FromItem::Verbatim(text) => text.clone(),
        }
    }

    fn join_expr(&self, join: &JoinExpr, depth: usize) -> String {
        let start = match self.conf.join.start_indent_type {
            JoinStartIndent::None => 0,
            JoinStartIndent::OneSpace => 1,
        };
        let join_depth = depth + start;

        let mut out = self.from_item(&join.left, depth);
        out.push_str(&self.newline(join_depth));
        if join.natural {
            out.push_str("NATURAL ");
        }
        out.push_str(join.kind.keyword());
        out.push(' ');
        out.push_str(&self.from_item(&join.right, join_depth));

        match &join.qual {
            JoinQual::Using(columns) => {
                out.push_str(" USING(");
                out.push_str(&columns.join(", "));
                out.push(')');
            }
            JoinQual::On(predicate) => match self.conf.join.line_break_type {
                JoinLineBreak::OnClause => {
                    out.push_str(&self.newline(join_depth + 1));
                    out.push_str("ON ");
                    out.push_str(&self.expr(predicate, join_depth + 1));
                }
                JoinLineBreak::Off => {
                    out.push_str(" ON ");
                    out.push_str(&self.expr(predicate, join_depth));
                }
            },
            JoinQual::None => {}
        }
        out
    }
}

pub(super) fn range_var(table: &RangeVar) -> String {
    let mut out = match &table.schema {
        Some(schema) => format!("{}.{}", schema, table.relname),
        None => table.relname.clone(),
    };
    push_alias(&mut out, table.alias.as_deref());
    out
}

fn push_alias(out: &mut String, alias: Option<&str>) {
    if let Some(alias) = alias {
        out.push(' ');
        out.push_str(alias);
    }
}
