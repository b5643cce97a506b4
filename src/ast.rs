//! The statement tree the emitters walk.
//!
//! Built by [`crate::lower`] from the parser's AST. Every enum here is closed:
//! keyword choices are already resolved, and anything without a styled
//! emitter is carried as `Verbatim` text.

use crate::keywords::{
    AExprKind, BoolOp, BoolTestKind, JoinKind, LockStrength, NullTestKind, NullsOrder, SetOpKind,
    SortDir, SubLinkKind, WaitPolicy,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(Box<Query>),
    Insert(Box<InsertStmt>),
    Update(Box<UpdateStmt>),
    Delete(Box<DeleteStmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub with: Option<WithClause>,
    pub body: SelectBody,
    pub order_by: Vec<SortBy>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub locking: Vec<LockingClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub recursive: bool,
    pub ctes: Vec<CommonTableExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpr {
    /// Name with its optional column list, e.g. `t(a, b)`.
    pub name: String,
    /// `MATERIALIZED` / `NOT MATERIALIZED`.
    pub materialized: Option<String>,
    pub query: Box<Query>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectBody {
    Select(Box<SelectStmt>),
    SetOp(Box<SetOperation>),
    Values(Vec<Vec<Expr>>),
    /// A parenthesized query.
    Query(Box<Query>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    pub op: SetOpKind,
    pub all: bool,
    pub left: SelectBody,
    pub right: SelectBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub distinct: Option<Distinct>,
    pub targets: Vec<ResTarget>,
    pub from: Vec<FromItem>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Distinct {
    Plain,
    On(Vec<Expr>),
}

/// A target list entry, or a RETURNING entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResTarget {
    pub val: Expr,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortBy {
    pub node: Expr,
    pub dir: SortDir,
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LockingClause {
    pub strength: LockStrength,
    pub of: Option<String>,
    pub wait: Option<WaitPolicy>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    Table(RangeVar),
    Function(RangeFunction),
    Subquery(RangeSubselect),
    Join(Box<JoinExpr>),
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeVar {
    pub schema: Option<String>,
    pub relname: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeFunction {
    pub lateral: bool,
    pub call: FuncCall,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSubselect {
    pub lateral: bool,
    pub query: Box<Query>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinExpr {
    pub kind: JoinKind,
    pub natural: bool,
    pub left: FromItem,
    pub right: FromItem,
    pub qual: JoinQual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinQual {
    On(Expr),
    Using(Vec<String>),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table: String,
    /// `INSERT INTO t AS alias`.
    pub alias: Option<String>,
    pub columns: Vec<String>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,
    pub returning: Vec<ResTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Query(Box<Query>),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnConflict {
    pub target: Option<ConflictTarget>,
    pub action: ConflictAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictTarget {
    Columns(Vec<String>),
    Constraint(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    Nothing,
    Update {
        assignments: Vec<Assignment>,
        where_clause: Option<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub relation: RangeVar,
    pub assignments: Vec<Assignment>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<ResTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub relation: RangeVar,
    pub where_clause: Option<Expr>,
    pub returning: Vec<ResTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    ColumnRef(ColumnRef),
    /// `CURRENT_TIMESTAMP` and friends.
    Keyword(String),
    Const(Const),
    /// `$n`, 1-based.
    Param(u32),
    FuncCall(Box<FuncCall>),
    AExpr(Box<AExpr>),
    Bool(BoolExpr),
    NullTest(Box<NullTest>),
    BooleanTest(Box<BooleanTest>),
    TypeCast(Box<TypeCast>),
    Case(Box<CaseExpr>),
    Coalesce(Vec<Expr>),
    SubLink(Box<SubLink>),
    InList(Box<InList>),
    Between(Box<Between>),
    /// `ARRAY[...]`.
    Array(Vec<Expr>),
    Unary(Box<UnaryExpr>),
    Nested(Box<Expr>),
    /// Printed by the parser, unchanged.
    Verbatim(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub fields: Vec<String>,
    /// Trailing `*`.
    pub wildcard: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Const {
    /// Integer or float, as written.
    Number(String),
    /// Unescaped string contents.
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncCall {
    /// Schema qualifiers followed by the function name.
    pub name: Vec<String>,
    pub args: Vec<FuncArg>,
    pub distinct: bool,
    pub star: bool,
    pub agg_order: Vec<SortBy>,
    pub within_group: Vec<SortBy>,
    pub filter: Option<Expr>,
    pub over: Option<WindowDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FuncArg {
    Positional(Expr),
    Named {
        name: String,
        operator: String,
        value: Expr,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowDef {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<SortBy>,
    /// `ROWS` / `RANGE` / `GROUPS` frame, as the parser prints it.
    pub frame: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AExpr {
    pub kind: AExprKind,
    /// Symbol or keyword operator, e.g. `=`, `NOT ILIKE`, `IS DISTINCT FROM`.
    pub op: String,
    pub lhs: Expr,
    pub rhs: Expr,
    /// `ESCAPE` character of the LIKE family.
    pub escape: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolExpr {
    pub op: BoolOp,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullTest {
    pub arg: Expr,
    pub kind: NullTestKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanTest {
    pub arg: Expr,
    pub kind: BoolTestKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeCast {
    pub arg: Expr,
    pub type_name: String,
    /// Number of `[]` suffixes.
    pub array_bounds: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub arg: Option<Expr>,
    pub whens: Vec<CaseWhen>,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseWhen {
    pub cond: Expr,
    pub result: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubLink {
    pub kind: SubLinkKind,
    /// Left-hand side of `IN` / `ANY` / `ALL`.
    pub testexpr: Option<Expr>,
    /// Comparison operator of `ANY` / `ALL`.
    pub oper: Option<String>,
    pub negated: bool,
    pub subselect: Query,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InList {
    pub arg: Expr,
    pub list: Vec<Expr>,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    pub arg: Expr,
    pub low: Expr,
    pub high: Expr,
    pub negated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: String,
    pub arg: Expr,
}

impl ColumnRef {
    pub fn star() -> Self {
        Self {
            fields: Vec::new(),
            wildcard: true,
        }
    }
}
