use super::Renderer;
use crate::ast::{
    AExpr, BoolExpr, CaseExpr, ColumnRef, Const, Expr, FuncArg, FuncCall, SubLink, WindowDef,
};
use crate::keywords::{self, AExprKind, BoolOp};

impl Renderer<'_> {
    /// An expression starting on a line indented `depth` times.
    pub(crate) fn expr(&self, expr: &Expr, depth: usize) -> String {
        match expr {
            Expr::ColumnRef(column) => column_ref(column),
            Expr::Keyword(word) => word.to_uppercase(),
            Expr::Const(value) => constant(value),
            Expr::Param(n) => format!("${n}"),
            Expr::FuncCall(call) => self.func_call(call, depth),
            Expr::AExpr(a) => self.a_expr(a, depth),
            Expr::Bool(b) => self.bool_expr(b, depth),
            Expr::NullTest(test) => {
                format!("{} {}", self.expr(&test.arg, depth), test.kind.keyword())
            }
            Expr::BooleanTest(test) => {
                format!("{} {}", self.expr(&test.arg, depth), test.kind.keyword())
            }
            Expr::TypeCast(cast) => format!(
                "{}::{}{}",
                self.expr(&cast.arg, depth),
                cast.type_name,
                "[]".repeat(cast.array_bounds)
            ),
            Expr::Case(case) => self.case_expr(case, depth),
            Expr::Coalesce(args) => format!("COALESCE({})", self.expr_list(args, depth)),
            Expr::SubLink(link) => self.sub_link(link, depth),
            Expr::InList(list) => format!(
                "{} {}IN ({})",
                self.expr(&list.arg, depth),
                not(list.negated),
                self.expr_list(&list.list, depth)
            ),
            Expr::Between(between) => format!(
                "{} {}BETWEEN {} AND {}",
                self.expr(&between.arg, depth),
                not(between.negated),
                self.expr(&between.low, depth),
                self.expr(&between.high, depth)
            ),
            Expr::Array(elems) => format!("ARRAY[{}]", self.expr_list(elems, depth)),
            Expr::Unary(unary) => {
                let arg = self.expr(&unary.arg, depth);
                // `--` would start a comment.
                if arg.starts_with(['-', '+']) {
                    format!("{} {}", unary.op, arg)
                } else {
                    format!("{}{}", unary.op, arg)
                }
            }
            Expr::Nested(inner) => format!("({})", self.expr(inner, depth)),
            Expr::Verbatim(text) => text.clone(),
        }
    }

    fn a_expr(&self, a: &AExpr, depth: usize) -> String {
        let op = if a.op == "<>" { "!=" } else { a.op.as_str() };
        let lhs = self.expr(&a.lhs, depth);
        let rhs = self.expr(&a.rhs, depth);
        let mut out = match a.kind {
            AExprKind::Op => format!("{lhs} {op} {rhs}"),
            AExprKind::Any => format!("{lhs} {op} ANY({rhs})"),
            AExprKind::All => format!("{lhs} {op} ALL({rhs})"),
        };
        if let Some(escape) = &a.escape {
            out.push_str(" ESCAPE ");
            out.push_str(&self.expr(escape, depth));
        }
        out
    }

    /// First operand stays on the current line, the rest go one level deeper
    /// behind their keyword. Nested groups are parenthesized two levels deeper.
    fn bool_expr(&self, b: &BoolExpr, depth: usize) -> String {
        if b.op == BoolOp::Not {
            let operand = match b.args.first() {
                Some(arg) => self.bool_operand(arg, depth),
                None => String::new(),
            };
            return format!("NOT {operand}");
        }

        let mut out = String::new();
        for (i, arg) in b.args.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.newline(depth + 1));
                out.push_str(b.op.keyword());
                out.push(' ');
            }
            let line_depth = if i == 0 { depth } else { depth + 1 };
            out.push_str(&self.bool_operand(arg, line_depth));
        }
        out
    }

    fn bool_operand(&self, arg: &Expr, depth: usize) -> String {
        match arg {
            Expr::Bool(inner) if inner.op != BoolOp::Not => format!(
                "(\n{}{}{})",
                self.indent(depth + 1),
                self.bool_expr(inner, depth + 1),
                self.newline(depth)
            ),
            other => self.expr(other, depth),
        }
    }

    pub(crate) fn func_call(&self, call: &FuncCall, depth: usize) -> String {
        let mut out = self.func_name(&call.name);
        out.push('(');
        if call.distinct {
            out.push_str("DISTINCT ");
        }
        if call.star {
            out.push('*');
        } else {
            let args: Vec<String> = call.args.iter().map(|a| self.func_arg(a, depth)).collect();
            out.push_str(&args.join(", "));
        }
        if !call.agg_order.is_empty() {
            out.push_str(" ORDER BY ");
            out.push_str(&self.sort_list(&call.agg_order, depth, ", "));
        }
        out.push(')');

        if !call.within_group.is_empty() {
            out.push_str(" WITHIN GROUP (ORDER BY ");
            out.push_str(&self.sort_list(&call.within_group, depth, ", "));
            out.push(')');
        }
        if let Some(filter) = &call.filter {
            out.push_str(" FILTER (WHERE ");
            out.push_str(&self.expr(filter, depth));
            out.push(')');
        }
        if let Some(window) = &call.over {
            out.push_str(&self.window(window, depth));
        }
        out
    }

    fn func_name(&self, name: &[String]) -> String {
        let Some((last, qualifiers)) = name.split_last() else {
            return String::new();
        };
        let function = keywords::function_name(last, self.conf.func.name_type_case)
            .map(str::to_string)
            .unwrap_or_else(|| last.clone());
        if qualifiers.is_empty() {
            function
        } else {
            format!("{}.{}", qualifiers.join("."), function)
        }
    }

    fn func_arg(&self, arg: &FuncArg, depth: usize) -> String {
        match arg {
            FuncArg::Positional(value) => self.expr(value, depth),
            FuncArg::Named {
                name,
                operator,
                value,
            } => format!("{} {} {}", name, operator, self.expr(value, depth)),
        }
    }

    fn window(&self, window: &WindowDef, depth: usize) -> String {
        let mut parts = Vec::new();
        if !window.partition_by.is_empty() {
            parts.push(format!(
                "PARTITION BY {}",
                self.expr_list(&window.partition_by, depth)
            ));
        }
        if !window.order_by.is_empty() {
            parts.push(format!(
                "ORDER BY {}",
                self.sort_list(&window.order_by, depth, ", ")
            ));
        }
        if let Some(frame) = &window.frame {
            parts.push(frame.clone());
        }
        format!(" OVER({})", parts.join(" "))
    }

    fn case_expr(&self, case: &CaseExpr, depth: usize) -> String {
        let mut out = String::from("CASE");
        if let Some(arg) = &case.arg {
            out.push(' ');
            out.push_str(&self.expr(arg, depth));
        }
        for when in &case.whens {
            out.push_str(" WHEN ");
            out.push_str(&self.expr(&when.cond, depth));
            out.push_str(" THEN ");
            out.push_str(&self.expr(&when.result, depth));
        }
        if let Some(default) = &case.default {
            out.push_str(" ELSE ");
            out.push_str(&self.expr(default, depth));
        }
        out.push_str(" END");
        out
    }

    fn sub_link(&self, link: &SubLink, depth: usize) -> String {
        let mut out = String::new();
        if let Some(test) = &link.testexpr {
            out.push_str(&self.expr(test, depth));
            out.push(' ');
            if let Some(op) = &link.oper {
                out.push_str(op);
                out.push(' ');
            }
        }
        out.push_str(not(link.negated));
        out.push_str(link.kind.opener());
        out.push('\n');
        out.push_str(&self.query(&link.subselect, depth + 1));
        out.push_str(&self.newline(depth));
        out.push(')');
        out
    }
}

fn not(negated: bool) -> &'static str {
    if negated { "NOT " } else { "" }
}

fn column_ref(column: &ColumnRef) -> String {
    match (column.fields.is_empty(), column.wildcard) {
        (true, _) => "*".to_string(),
        (false, true) => format!("{}.*", column.fields.join(".")),
        (false, false) => column.fields.join("."),
    }
}

fn constant(value: &Const) -> String {
    match value {
        Const::Number(n) => n.clone(),
        Const::String(s) => format!("'{}'", s.replace('\'', "''")),
        Const::Bool(b) => b.to_string(),
        Const::Null => "NULL".to_string(),
    }
}
