//! Lowering from the parser's AST into [`crate::ast`].
//!
//! Keyword choices are resolved here, so the emitters never fail. Nodes with
//! no styled emitter keep the parser's own SQL text; clauses that would end up
//! in the wrong place that way are rejected as unsupported.

use sqlparser::ast as sql;
use sqlparser::ast::{
    BinaryOperator, DataType, FunctionArg, FunctionArgExpr, FunctionArgumentClause,
    FunctionArguments, SetExpr, TableFactor, UnaryOperator, Value,
};

use crate::ast::*;
use crate::error::{FmtResult, FormatError};
use crate::keywords::{
    AExprKind, BoolOp, BoolTestKind, JoinKind, LockStrength, NullTestKind, NullsOrder, SetOpKind,
    SortDir, SubLinkKind, WaitPolicy,
};

/// Lower one parsed statement.
pub fn lower_statement(stmt: &sql::Statement) -> FmtResult<Statement> {
    match stmt {
        sql::Statement::Query(query) => Ok(Statement::Select(Box::new(lower_query(query)?))),
        sql::Statement::Insert(insert) => Ok(Statement::Insert(Box::new(lower_insert(insert)?))),
        sql::Statement::Update(update) => {
            if update.from.is_some() {
                return Err(FormatError::unsupported("UPDATE ... FROM"));
            }
            if update.or.is_some() {
                return Err(FormatError::unsupported("UPDATE OR"));
            }
            if update.limit.is_some() {
                return Err(FormatError::unsupported("UPDATE ... LIMIT"));
            }
            Ok(Statement::Update(Box::new(UpdateStmt {
                relation: lower_target_relation(&update.table)?,
                assignments: lower_assignments(&update.assignments)?,
                where_clause: lower_opt_predicate(update.selection.as_ref())?,
                returning: lower_returning(update.returning.as_deref())?,
            })))
        }
        sql::Statement::Delete(delete) => {
            if delete.using.is_some() {
                return Err(FormatError::unsupported("DELETE ... USING"));
            }
            if !delete.tables.is_empty() {
                return Err(FormatError::unsupported("multi-table DELETE"));
            }
            if !delete.order_by.is_empty() {
                return Err(FormatError::unsupported("DELETE ... ORDER BY"));
            }
            if delete.limit.is_some() {
                return Err(FormatError::unsupported("DELETE ... LIMIT"));
            }
            let tables = match &delete.from {
                sql::FromTable::WithFromKeyword(tables) => tables,
                sql::FromTable::WithoutKeyword(tables) => tables,
            };
            let [table] = tables.as_slice() else {
                return Err(FormatError::unsupported("multi-table DELETE"));
            };
            Ok(Statement::Delete(Box::new(DeleteStmt {
                relation: lower_target_relation(table)?,
                where_clause: lower_opt_predicate(delete.selection.as_ref())?,
                returning: lower_returning(delete.returning.as_deref())?,
            })))
        }
        other => Err(FormatError::unsupported(format!(
            "statement: {}",
            statement_label(other)
        ))),
    }
}

/// Leading keywords of a statement, for error messages.
fn statement_label(stmt: &sql::Statement) -> String {
    stmt.to_string()
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

fn lower_query(query: &sql::Query) -> FmtResult<Query> {
    if query.fetch.is_some() {
        return Err(FormatError::unsupported("FETCH clause"));
    }
    if query.for_clause.is_some()
        || query.settings.is_some()
        || query.format_clause.is_some()
        || !query.pipe_operators.is_empty()
    {
        return Err(FormatError::unsupported("query clause outside PostgreSQL"));
    }

    let with = match &query.with {
        Some(with) => Some(WithClause {
            recursive: with.recursive,
            ctes: with
                .cte_tables
                .iter()
                .map(|cte| {
                    Ok(CommonTableExpr {
                        name: alias_text(&cte.alias),
                        materialized: cte.materialized.as_ref().map(|m| m.to_string()),
                        query: Box::new(lower_query(&cte.query)?),
                    })
                })
                .collect::<FmtResult<Vec<_>>>()?,
        }),
        None => None,
    };

    let order_by = match &query.order_by {
        None => Vec::new(),
        Some(order_by) => match &order_by.kind {
            sql::OrderByKind::Expressions(exprs) => lower_sort_list(exprs)?,
            sql::OrderByKind::All(_) => return Err(FormatError::unsupported("ORDER BY ALL")),
        },
    };

    let (limit, offset) = match &query.limit_clause {
        None => (None, None),
        Some(sql::LimitClause::LimitOffset { limit_by, .. }) if !limit_by.is_empty() => {
            return Err(FormatError::unsupported("LIMIT BY"));
        }
        Some(sql::LimitClause::LimitOffset { limit, offset, .. }) => (
            limit.as_ref().map(lower_expr).transpose()?,
            offset.as_ref().map(|o| lower_expr(&o.value)).transpose()?,
        ),
        Some(_) => return Err(FormatError::unsupported("LIMIT offset, count")),
    };

    let locking = query
        .locks
        .iter()
        .map(|lock| {
            Ok(LockingClause {
                strength: LockStrength::try_from(&lock.lock_type)?,
                of: lock.of.as_ref().map(|name| name.to_string()),
                wait: lock.nonblock.as_ref().map(WaitPolicy::try_from).transpose()?,
            })
        })
        .collect::<FmtResult<Vec<_>>>()?;

    Ok(Query {
        with,
        body: lower_set_expr(&query.body)?,
        order_by,
        limit,
        offset,
        locking,
    })
}

fn lower_set_expr(body: &SetExpr) -> FmtResult<SelectBody> {
    match body {
        SetExpr::Select(select) => Ok(SelectBody::Select(Box::new(lower_select(select)?))),
        SetExpr::Query(query) => Ok(SelectBody::Query(Box::new(lower_query(query)?))),
        SetExpr::SetOperation {
            op,
            set_quantifier,
            left,
            right,
        } => Ok(SelectBody::SetOp(Box::new(SetOperation {
            op: SetOpKind::try_from(op)?,
            all: SetOpKind::quantifier(set_quantifier)?,
            left: lower_set_expr(left)?,
            right: lower_set_expr(right)?,
        }))),
        SetExpr::Values(values) => Ok(SelectBody::Values(lower_rows(&values.rows)?)),
        other => Err(FormatError::unsupported(format!("query body: {other}"))),
    }
}

fn lower_select(select: &sql::Select) -> FmtResult<SelectStmt> {
    if select.into.is_some() {
        return Err(FormatError::unsupported("SELECT ... INTO"));
    }
    if !select.named_window.is_empty() {
        return Err(FormatError::unsupported("WINDOW clause"));
    }
    if let Some(clause) = select_extension(select) {
        return Err(FormatError::unsupported(clause));
    }

    let distinct = match &select.distinct {
        None => None,
        Some(sql::Distinct::Distinct) => Some(Distinct::Plain),
        Some(sql::Distinct::On(exprs)) => Some(Distinct::On(lower_exprs(exprs)?)),
        #[allow(unreachable_patterns)]
        Some(_) => return Err(FormatError::unsupported("DISTINCT variant")),
    };

    let group_by = match &select.group_by {
        sql::GroupByExpr::Expressions(exprs, modifiers) => {
            if !modifiers.is_empty() {
                return Err(FormatError::unsupported("GROUP BY modifiers"));
            }
            lower_exprs(exprs)?
        }
        sql::GroupByExpr::All(_) => return Err(FormatError::unsupported("GROUP BY ALL")),
    };

    Ok(SelectStmt {
        distinct,
        targets: select
            .projection
            .iter()
            .map(lower_target)
            .collect::<FmtResult<Vec<_>>>()?,
        from: select
            .from
            .iter()
            .map(lower_table_with_joins)
            .collect::<FmtResult<Vec<_>>>()?,
        where_clause: lower_opt_predicate(select.selection.as_ref())?,
        group_by,
        having: lower_opt_predicate(select.having.as_ref())?,
    })
}

/// First non-PostgreSQL clause the parser attached to a SELECT.
fn select_extension(select: &sql::Select) -> Option<&'static str> {
    if select.top.is_some() {
        Some("TOP")
    } else if select.exclude.is_some() {
        Some("SELECT * EXCLUDE")
    } else if !select.lateral_views.is_empty() {
        Some("LATERAL VIEW")
    } else if select.prewhere.is_some() {
        Some("PREWHERE")
    } else if !select.cluster_by.is_empty() {
        Some("CLUSTER BY")
    } else if !select.distribute_by.is_empty() {
        Some("DISTRIBUTE BY")
    } else if !select.sort_by.is_empty() {
        Some("SORT BY")
    } else if select.qualify.is_some() {
        Some("QUALIFY")
    } else if select.value_table_mode.is_some() {
        Some("SELECT AS VALUE")
    } else if select.connect_by.is_some() {
        Some("CONNECT BY")
    } else if !matches!(select.flavor, sql::SelectFlavor::Standard) {
        Some("FROM-first SELECT")
    } else {
        None
    }
}

fn lower_target(item: &sql::SelectItem) -> FmtResult<ResTarget> {
    let target = match item {
        sql::SelectItem::UnnamedExpr(expr) => ResTarget {
            val: lower_expr(expr)?,
            name: None,
        },
        sql::SelectItem::ExprWithAlias { expr, alias, .. } => ResTarget {
            val: lower_expr(expr)?,
            name: Some(ident_text(alias)),
        },
        sql::SelectItem::Wildcard(_) => ResTarget {
            val: Expr::ColumnRef(ColumnRef::star()),
            name: None,
        },
        other => {
            // `t.*`; the parser prints the qualifier the way it was written.
            let text = other.to_string();
            let val = match text.strip_suffix(".*") {
                Some(qualifier) => Expr::ColumnRef(ColumnRef {
                    fields: vec![qualifier.to_string()],
                    wildcard: true,
                }),
                None => Expr::Verbatim(text),
            };
            ResTarget { val, name: None }
        }
    };
    Ok(target)
}

fn lower_returning(items: Option<&[sql::SelectItem]>) -> FmtResult<Vec<ResTarget>> {
    items
        .unwrap_or_default()
        .iter()
        .map(lower_target)
        .collect()
}

fn lower_sort_list(items: &[sql::OrderByExpr]) -> FmtResult<Vec<SortBy>> {
    items
        .iter()
        .map(|item| {
            Ok(SortBy {
                node: lower_expr(&item.expr)?,
                dir: SortDir::from_asc(item.options.asc),
                nulls: NullsOrder::from_nulls_first(item.options.nulls_first),
            })
        })
        .collect()
}

fn lower_rows(rows: &[Vec<sql::Expr>]) -> FmtResult<Vec<Vec<Expr>>> {
    rows.iter().map(|row| lower_exprs(row)).collect::<FmtResult<Vec<_>>>()
}

fn lower_table_with_joins(twj: &sql::TableWithJoins) -> FmtResult<FromItem> {
    let mut item = lower_table_factor(&twj.relation)?;
    for join in &twj.joins {
        let (kind, constraint) = JoinKind::from_operator(&join.join_operator)?;
        let (natural, qual) = match constraint {
            Some(sql::JoinConstraint::On(expr)) => (false, JoinQual::On(lower_predicate(expr)?)),
            Some(sql::JoinConstraint::Using(columns)) => (
                false,
                JoinQual::Using(columns.iter().map(|c| c.to_string()).collect()),
            ),
            Some(sql::JoinConstraint::Natural) => (true, JoinQual::None),
            Some(sql::JoinConstraint::None) | None => (false, JoinQual::None),
        };
        item = FromItem::Join(Box::new(JoinExpr {
            kind,
            natural,
            left: item,
            right: lower_table_factor(&join.relation)?,
            qual,
        }));
    }
    Ok(item)
}

/// A table reference with nothing beyond name, alias and arguments.
fn is_plain_table(factor: &TableFactor) -> bool {
    match factor {
        TableFactor::Table {
            with_hints,
            version,
            with_ordinality,
            partitions,
            json_path,
            sample,
            index_hints,
            ..
        } => {
            with_hints.is_empty()
                && version.is_none()
                && !with_ordinality
                && partitions.is_empty()
                && json_path.is_none()
                && sample.is_none()
                && index_hints.is_empty()
        }
        _ => false,
    }
}

fn lower_table_factor(factor: &TableFactor) -> FmtResult<FromItem> {
    let item = match factor {
        TableFactor::Table { .. } if !is_plain_table(factor) => {
            FromItem::Verbatim(factor.to_string())
        }
        TableFactor::Table {
            name,
            alias,
            args: None,
            ..
        } => FromItem::Table(range_var(name, alias.as_ref())),
        TableFactor::Table {
            name,
            alias,
            args: Some(args),
            ..
        } => match lower_function_args(&args.args)? {
            Some((args, star)) => FromItem::Function(RangeFunction {
                lateral: false,
                call: FuncCall {
                    star,
                    args,
                    ..FuncCall::named(object_name_parts(name))
                },
                alias: alias.as_ref().map(alias_text),
            }),
            None => FromItem::Verbatim(factor.to_string()),
        },
        TableFactor::Function {
            lateral,
            name,
            args,
            alias,
            ..
        } => match lower_function_args(args)? {
            Some((args, star)) => FromItem::Function(RangeFunction {
                lateral: *lateral,
                call: FuncCall {
                    star,
                    args,
                    ..FuncCall::named(object_name_parts(name))
                },
                alias: alias.as_ref().map(alias_text),
            }),
            None => FromItem::Verbatim(factor.to_string()),
        },
        TableFactor::Derived {
            lateral,
            subquery,
            alias,
            ..
        } => FromItem::Subquery(RangeSubselect {
            lateral: *lateral,
            query: Box::new(lower_query(subquery)?),
            alias: alias.as_ref().map(alias_text),
        }),
        other => FromItem::Verbatim(other.to_string()),
    };
    Ok(item)
}

/// The single plain table a mutation targets.
fn lower_target_relation(twj: &sql::TableWithJoins) -> FmtResult<RangeVar> {
    if !twj.joins.is_empty() {
        return Err(FormatError::unsupported("joined mutation target"));
    }
    match &twj.relation {
        TableFactor::Table {
            name,
            alias,
            args: None,
            ..
        } if is_plain_table(&twj.relation) => Ok(range_var(name, alias.as_ref())),
        other => Err(FormatError::unsupported(format!("mutation target: {other}"))),
    }
}

fn range_var(name: &sql::ObjectName, alias: Option<&sql::TableAlias>) -> RangeVar {
    let mut parts = object_name_parts(name);
    let relname = parts.pop().unwrap_or_default();
    RangeVar {
        schema: (!parts.is_empty()).then(|| parts.join(".")),
        relname,
        alias: alias.map(alias_text),
    }
}

fn alias_text(alias: &sql::TableAlias) -> String {
    let name = ident_text(&alias.name);
    if alias.columns.is_empty() {
        return name;
    }
    let columns: Vec<String> = alias.columns.iter().map(|c| c.to_string()).collect();
    format!("{}({})", name, columns.join(", "))
}

fn lower_insert(insert: &sql::Insert) -> FmtResult<InsertStmt> {
    if insert.or.is_some()
        || insert.ignore
        || insert.overwrite
        || insert.replace_into
        || insert.priority.is_some()
        || insert.partitioned.is_some()
        || insert.insert_alias.is_some()
        || insert.settings.is_some()
        || insert.format_clause.is_some()
        || !insert.assignments.is_empty()
        || !insert.after_columns.is_empty()
    {
        return Err(FormatError::unsupported("INSERT clause outside PostgreSQL"));
    }

    let source = match &insert.source {
        None => InsertSource::DefaultValues,
        Some(query) => match query.body.as_ref() {
            SetExpr::Values(values)
                if query.with.is_none()
                    && query.order_by.is_none()
                    && query.limit_clause.is_none() =>
            {
                InsertSource::Values(lower_rows(&values.rows)?)
            }
            _ => InsertSource::Query(Box::new(lower_query(query)?)),
        },
    };

    let on_conflict = match &insert.on {
        None => None,
        Some(sql::OnInsert::OnConflict(conflict)) => Some(lower_on_conflict(conflict)?),
        Some(_) => return Err(FormatError::unsupported("INSERT ... ON DUPLICATE KEY")),
    };

    Ok(InsertStmt {
        table: insert.table.to_string(),
        alias: insert.table_alias.as_ref().map(ident_text),
        columns: insert.columns.iter().map(|c| c.to_string()).collect(),
        source,
        on_conflict,
        returning: lower_returning(insert.returning.as_deref())?,
    })
}

fn lower_on_conflict(conflict: &sql::OnConflict) -> FmtResult<OnConflict> {
    let target = match &conflict.conflict_target {
        None => None,
        Some(sql::ConflictTarget::Columns(columns)) => Some(ConflictTarget::Columns(
            columns.iter().map(|c| c.to_string()).collect(),
        )),
        Some(sql::ConflictTarget::OnConstraint(name)) => {
            Some(ConflictTarget::Constraint(name.to_string()))
        }
    };
    let action = match &conflict.action {
        sql::OnConflictAction::DoNothing => ConflictAction::Nothing,
        sql::OnConflictAction::DoUpdate(update) => ConflictAction::Update {
            assignments: lower_assignments(&update.assignments)?,
            where_clause: lower_opt_predicate(update.selection.as_ref())?,
        },
    };
    Ok(OnConflict { target, action })
}

fn lower_assignments(assignments: &[sql::Assignment]) -> FmtResult<Vec<Assignment>> {
    assignments
        .iter()
        .map(|a| {
            Ok(Assignment {
                target: a.target.to_string(),
                value: lower_expr(&a.value)?,
            })
        })
        .collect()
}

/// A whole predicate (WHERE, HAVING, ON). Outer parentheses are dropped.
fn lower_predicate(expr: &sql::Expr) -> FmtResult<Expr> {
    lower_expr(strip_nested(expr))
}

fn lower_opt_predicate(expr: Option<&sql::Expr>) -> FmtResult<Option<Expr>> {
    expr.map(lower_predicate).transpose()
}

fn lower_exprs(exprs: &[sql::Expr]) -> FmtResult<Vec<Expr>> {
    exprs.iter().map(lower_expr).collect()
}

fn boxed(expr: &sql::Expr) -> FmtResult<Box<Expr>> {
    Ok(Box::new(lower_expr(expr)?))
}

pub(crate) fn lower_expr(expr: &sql::Expr) -> FmtResult<Expr> {
    let lowered = match expr {
        sql::Expr::Identifier(ident) => {
            if ident.quote_style.is_none() && crate::keywords::is_context_keyword(&ident.value) {
                Expr::Keyword(ident.value.to_uppercase())
            } else {
                Expr::ColumnRef(ColumnRef {
                    fields: vec![ident_text(ident)],
                    wildcard: false,
                })
            }
        }
        sql::Expr::CompoundIdentifier(idents) => {
            let mut fields: Vec<String> = idents.iter().map(ident_text).collect();
            if let (Some(first), Some(ident)) = (fields.first_mut(), idents.first())
                && idents.len() > 1
                && ident.quote_style.is_none()
                && ident.value.eq_ignore_ascii_case("excluded")
            {
                *first = "EXCLUDED".to_string();
            }
            Expr::ColumnRef(ColumnRef {
                fields,
                wildcard: false,
            })
        }
        sql::Expr::Wildcard(_) => Expr::ColumnRef(ColumnRef::star()),
        sql::Expr::QualifiedWildcard(name, _) => Expr::ColumnRef(ColumnRef {
            fields: object_name_parts(name),
            wildcard: true,
        }),
        sql::Expr::Value(value) => lower_value(&value.value),
        sql::Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => lower_bool_chain(BoolOp::And, op, expr)?,
            BinaryOperator::Or => lower_bool_chain(BoolOp::Or, op, expr)?,
            other => operator(other.to_string(), left, right, None)?,
        },
        sql::Expr::UnaryOp { op, expr: inner } => match op {
            UnaryOperator::Not => Expr::Bool(BoolExpr {
                op: BoolOp::Not,
                args: vec![lower_expr(strip_nested(inner))?],
            }),
            UnaryOperator::Minus | UnaryOperator::Plus => Expr::Unary(Box::new(UnaryExpr {
                op: op.to_string(),
                arg: lower_expr(inner)?,
            })),
            _ => Expr::Verbatim(expr.to_string()),
        },
        sql::Expr::Nested(inner) => Expr::Nested(boxed(inner)?),
        sql::Expr::IsNull(inner) => null_test(inner, NullTestKind::IsNull)?,
        sql::Expr::IsNotNull(inner) => null_test(inner, NullTestKind::IsNotNull)?,
        sql::Expr::IsTrue(inner) => bool_test(inner, BoolTestKind::IsTrue)?,
        sql::Expr::IsNotTrue(inner) => bool_test(inner, BoolTestKind::IsNotTrue)?,
        sql::Expr::IsFalse(inner) => bool_test(inner, BoolTestKind::IsFalse)?,
        sql::Expr::IsNotFalse(inner) => bool_test(inner, BoolTestKind::IsNotFalse)?,
        sql::Expr::IsUnknown(inner) => bool_test(inner, BoolTestKind::IsUnknown)?,
        sql::Expr::IsNotUnknown(inner) => bool_test(inner, BoolTestKind::IsNotUnknown)?,
        sql::Expr::InList {
            expr: inner,
            list,
            negated,
            ..
        } => Expr::InList(Box::new(InList {
            arg: lower_expr(inner)?,
            list: lower_exprs(list)?,
            negated: *negated,
        })),
        sql::Expr::InSubquery {
            expr: inner,
            subquery,
            negated,
            ..
        } => Expr::SubLink(Box::new(SubLink {
            kind: SubLinkKind::In,
            testexpr: Some(lower_expr(inner)?),
            oper: None,
            negated: *negated,
            subselect: lower_query(subquery)?,
        })),
        sql::Expr::Between {
            expr: inner,
            negated,
            low,
            high,
            ..
        } => Expr::Between(Box::new(Between {
            arg: lower_expr(inner)?,
            low: lower_expr(low)?,
            high: lower_expr(high)?,
            negated: *negated,
        })),
        sql::Expr::AnyOp {
            left,
            compare_op,
            right,
            ..
        } => quantified(left, compare_op, right, AExprKind::Any)?,
        sql::Expr::AllOp {
            left,
            compare_op,
            right,
            ..
        } => quantified(left, compare_op, right, AExprKind::All)?,
        sql::Expr::Cast {
            kind: sql::CastKind::Cast | sql::CastKind::DoubleColon,
            expr: inner,
            data_type,
            format: None,
        } => {
            let (type_name, array_bounds) = type_name(data_type);
            Expr::TypeCast(Box::new(TypeCast {
                arg: lower_expr(inner)?,
                type_name,
                array_bounds,
            }))
        }
        sql::Expr::Case {
            operand,
            conditions,
            else_result,
            ..
        } => Expr::Case(Box::new(CaseExpr {
            arg: operand.as_deref().map(lower_expr).transpose()?,
            whens: conditions
                .iter()
                .map(|when| {
                    Ok(CaseWhen {
                        cond: lower_expr(&when.condition)?,
                        result: lower_expr(&when.result)?,
                    })
                })
                .collect::<FmtResult<Vec<_>>>()?,
            default: else_result.as_deref().map(lower_expr).transpose()?,
        })),
        sql::Expr::Exists {
            subquery, negated, ..
        } => Expr::SubLink(Box::new(SubLink {
            kind: SubLinkKind::Exists,
            testexpr: None,
            oper: None,
            negated: *negated,
            subselect: lower_query(subquery)?,
        })),
        sql::Expr::Subquery(subquery) => Expr::SubLink(Box::new(SubLink {
            kind: SubLinkKind::Expr,
            testexpr: None,
            oper: None,
            negated: false,
            subselect: lower_query(subquery)?,
        })),
        sql::Expr::Like {
            negated,
            any: false,
            expr: inner,
            pattern,
            escape_char,
        } => operator(not_op(*negated, "LIKE"), inner, pattern, escape_char.as_ref())?,
        sql::Expr::ILike {
            negated,
            any: false,
            expr: inner,
            pattern,
            escape_char,
        } => operator(not_op(*negated, "ILIKE"), inner, pattern, escape_char.as_ref())?,
        sql::Expr::SimilarTo {
            negated,
            expr: inner,
            pattern,
            escape_char,
        } => operator(
            not_op(*negated, "SIMILAR TO"),
            inner,
            pattern,
            escape_char.as_ref(),
        )?,
        sql::Expr::IsDistinctFrom(left, right) => {
            operator("IS DISTINCT FROM".to_string(), left, right, None)?
        }
        sql::Expr::IsNotDistinctFrom(left, right) => {
            operator("IS NOT DISTINCT FROM".to_string(), left, right, None)?
        }
        sql::Expr::Array(array) if array.named => Expr::Array(lower_exprs(&array.elem)?),
        sql::Expr::Function(function) => lower_function(function)?,
        other => Expr::Verbatim(other.to_string()),
    };
    Ok(lowered)
}

/// `lhs op rhs [ESCAPE c]` for symbol and keyword operators alike.
fn operator(
    op: String,
    lhs: &sql::Expr,
    rhs: &sql::Expr,
    escape: Option<&Value>,
) -> FmtResult<Expr> {
    Ok(Expr::AExpr(Box::new(AExpr {
        kind: AExprKind::Op,
        op,
        lhs: lower_expr(lhs)?,
        rhs: lower_expr(rhs)?,
        escape: escape.map(lower_value),
    })))
}

fn not_op(negated: bool, keyword: &str) -> String {
    if negated {
        format!("NOT {keyword}")
    } else {
        keyword.to_string()
    }
}

fn null_test(arg: &sql::Expr, kind: NullTestKind) -> FmtResult<Expr> {
    Ok(Expr::NullTest(Box::new(NullTest {
        arg: lower_expr(arg)?,
        kind,
    })))
}

fn bool_test(arg: &sql::Expr, kind: BoolTestKind) -> FmtResult<Expr> {
    Ok(Expr::BooleanTest(Box::new(BooleanTest {
        arg: lower_expr(arg)?,
        kind,
    })))
}

/// `x op ANY(...)` / `x op ALL(...)`.
fn quantified(
    left: &sql::Expr,
    compare_op: &BinaryOperator,
    right: &sql::Expr,
    kind: AExprKind,
) -> FmtResult<Expr> {
    if let sql::Expr::Subquery(subquery) = strip_nested(right) {
        let link = if kind == AExprKind::All {
            SubLinkKind::All
        } else {
            SubLinkKind::Any
        };
        return Ok(Expr::SubLink(Box::new(SubLink {
            kind: link,
            testexpr: Some(lower_expr(left)?),
            oper: Some(compare_op.to_string()),
            negated: false,
            subselect: lower_query(subquery)?,
        })));
    }
    Ok(Expr::AExpr(Box::new(AExpr {
        kind,
        op: compare_op.to_string(),
        lhs: lower_expr(left)?,
        rhs: lower_expr(strip_nested(right))?,
        escape: None,
    })))
}

/// Flatten `a AND b AND (c AND d)` into one operand list.
fn lower_bool_chain(op: BoolOp, parser_op: &BinaryOperator, expr: &sql::Expr) -> FmtResult<Expr> {
    let mut args = Vec::new();
    collect_bool_operands(parser_op, expr, &mut args)?;
    Ok(Expr::Bool(BoolExpr { op, args }))
}

fn collect_bool_operands(
    parser_op: &BinaryOperator,
    expr: &sql::Expr,
    out: &mut Vec<Expr>,
) -> FmtResult<()> {
    match strip_nested(expr) {
        sql::Expr::BinaryOp { left, op, right } if op == parser_op => {
            collect_bool_operands(parser_op, left, out)?;
            collect_bool_operands(parser_op, right, out)
        }
        operand => {
            out.push(lower_expr(operand)?);
            Ok(())
        }
    }
}

fn strip_nested(mut expr: &sql::Expr) -> &sql::Expr {
    while let sql::Expr::Nested(inner) = expr {
        expr = inner.as_ref();
    }
    expr
}

fn lower_value(value: &Value) -> Expr {
    match value {
        Value::Number(n, _) => Expr::Const(Const::Number(n.to_string())),
        Value::SingleQuotedString(s) => Expr::Const(Const::String(s.clone())),
        Value::Boolean(b) => Expr::Const(Const::Bool(*b)),
        Value::Null => Expr::Const(Const::Null),
        Value::Placeholder(p) => match p.strip_prefix('$').and_then(|n| n.parse().ok()) {
            Some(n) => Expr::Param(n),
            None => Expr::Verbatim(p.clone()),
        },
        other => Expr::Verbatim(other.to_string()),
    }
}

/// Type name and number of `[]` suffixes.
fn type_name(data_type: &DataType) -> (String, usize) {
    match data_type {
        DataType::Array(sql::ArrayElemTypeDef::SquareBracket(inner, _)) => {
            let (name, bounds) = type_name(inner);
            (name, bounds + 1)
        }
        DataType::Custom(name, modifiers) if modifiers.is_empty() => (name.to_string(), 0),
        other => (other.to_string().to_lowercase(), 0),
    }
}

impl FuncCall {
    fn named(name: Vec<String>) -> Self {
        Self {
            name,
            args: Vec::new(),
            distinct: false,
            star: false,
            agg_order: Vec::new(),
            within_group: Vec::new(),
            filter: None,
            over: None,
        }
    }
}

fn lower_function(function: &sql::Function) -> FmtResult<Expr> {
    let name = object_name_parts(&function.name);
    let simple_name = match name.as_slice() {
        [only] => Some(only.as_str()),
        _ => None,
    };

    let list = match &function.args {
        FunctionArguments::None => {
            if let Some(word) = simple_name
                && crate::keywords::is_context_keyword(word)
            {
                return Ok(Expr::Keyword(word.to_uppercase()));
            }
            return Ok(Expr::Verbatim(function.to_string()));
        }
        FunctionArguments::Subquery(query) => {
            if simple_name.is_some_and(|n| n.eq_ignore_ascii_case("array")) {
                return Ok(Expr::SubLink(Box::new(SubLink {
                    kind: SubLinkKind::Array,
                    testexpr: None,
                    oper: None,
                    negated: false,
                    subselect: lower_query(query)?,
                })));
            }
            return Ok(Expr::Verbatim(function.to_string()));
        }
        FunctionArguments::List(list) => list,
    };

    if function.uses_odbc_syntax
        || function.null_treatment.is_some()
        || !matches!(function.parameters, FunctionArguments::None)
    {
        return Ok(Expr::Verbatim(function.to_string()));
    }

    let mut agg_order = Vec::new();
    for clause in &list.clauses {
        match clause {
            FunctionArgumentClause::OrderBy(items) => agg_order.extend(lower_sort_list(items)?),
            _ => return Ok(Expr::Verbatim(function.to_string())),
        }
    }

    let Some((args, star)) = lower_function_args(&list.args)? else {
        return Ok(Expr::Verbatim(function.to_string()));
    };
    let distinct = matches!(
        list.duplicate_treatment,
        Some(sql::DuplicateTreatment::Distinct)
    );
    let over = match &function.over {
        None => None,
        Some(sql::WindowType::NamedWindow(_)) => {
            return Err(FormatError::unsupported("OVER a named window"));
        }
        Some(sql::WindowType::WindowSpec(spec)) if spec.window_name.is_some() => {
            return Err(FormatError::unsupported("OVER a named window"));
        }
        Some(sql::WindowType::WindowSpec(spec)) => Some(WindowDef {
            partition_by: lower_exprs(&spec.partition_by)?,
            order_by: lower_sort_list(&spec.order_by)?,
            frame: spec.window_frame.as_ref().map(frame_text),
        }),
    };

    let plain = !distinct
        && !star
        && agg_order.is_empty()
        && function.within_group.is_empty()
        && function.filter.is_none()
        && over.is_none();
    if plain
        && simple_name.is_some_and(|n| n.eq_ignore_ascii_case("coalesce"))
        && args.iter().all(|a| matches!(a, FuncArg::Positional(_)))
    {
        let values = args
            .into_iter()
            .filter_map(|a| match a {
                FuncArg::Positional(value) => Some(value),
                FuncArg::Named { .. } => None,
            })
            .collect();
        return Ok(Expr::Coalesce(values));
    }

    Ok(Expr::FuncCall(Box::new(FuncCall {
        args,
        distinct,
        star,
        agg_order,
        within_group: lower_sort_list(&function.within_group)?,
        filter: function.filter.as_deref().map(lower_predicate).transpose()?,
        over,
        ..FuncCall::named(name)
    })))
}

fn frame_text(frame: &sql::WindowFrame) -> String {
    match &frame.end_bound {
        Some(end) => format!("{} BETWEEN {} AND {}", frame.units, frame.start_bound, end),
        None => format!("{} {}", frame.units, frame.start_bound),
    }
}

/// Arguments plus the star flag; `None` when some argument has no styled form.
fn lower_function_args(args: &[FunctionArg]) -> FmtResult<Option<(Vec<FuncArg>, bool)>> {
    if let [FunctionArg::Unnamed(FunctionArgExpr::Wildcard)] = args {
        return Ok(Some((Vec::new(), true)));
    }
    let mut lowered = Vec::with_capacity(args.len());
    for arg in args {
        let arg = match arg {
            FunctionArg::Unnamed(value) => match lower_arg_expr(value)? {
                Some(value) => FuncArg::Positional(value),
                None => return Ok(None),
            },
            FunctionArg::Named {
                name,
                arg,
                operator,
            } => match lower_arg_expr(arg)? {
                Some(value) => FuncArg::Named {
                    name: ident_text(name),
                    operator: operator.to_string(),
                    value,
                },
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
        lowered.push(arg);
    }
    Ok(Some((lowered, false)))
}

fn lower_arg_expr(arg: &FunctionArgExpr) -> FmtResult<Option<Expr>> {
    let expr = match arg {
        FunctionArgExpr::Expr(expr) => lower_expr(expr)?,
        FunctionArgExpr::QualifiedWildcard(name) => Expr::ColumnRef(ColumnRef {
            fields: object_name_parts(name),
            wildcard: true,
        }),
        _ => return Ok(None),
    };
    Ok(Some(expr))
}

/// An identifier as written; quoted identifiers keep their quotes.
fn ident_text(ident: &sql::Ident) -> String {
    if ident.quote_style.is_some() {
        ident.to_string()
    } else {
        ident.value.clone()
    }
}

fn object_name_parts(name: &sql::ObjectName) -> Vec<String> {
    name.0.iter().map(|part| part.to_string()).collect()
}
