//! Keyword tables.
//!
//! Every enum the emitters print maps to its SQL keyword here. Conversions
//! from the parser's enums also live here: a parser value without an entry is
//! a [`FormatError::UnknownEnum`].

use std::fmt::Debug;

use sqlparser::ast::{
    JoinConstraint, JoinOperator, LockType, NonBlock, SetOperator, SetQuantifier,
};

use crate::config::FuncNameCase;
use crate::error::{FmtResult, FormatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Not,
}

impl BoolOp {
    pub fn keyword(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
            BoolOp::Not => "NOT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Plain,
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    Cross,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Plain => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::RightOuter => "RIGHT OUTER JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }

    /// Split a parser join operator into its kind and constraint.
    pub fn from_operator(op: &JoinOperator) -> FmtResult<(Self, Option<&JoinConstraint>)> {
        let pair = match op {
            JoinOperator::Join(c) => (JoinKind::Plain, Some(c)),
            JoinOperator::Inner(c) => (JoinKind::Inner, Some(c)),
            JoinOperator::Left(c) => (JoinKind::Left, Some(c)),
            JoinOperator::LeftOuter(c) => (JoinKind::LeftOuter, Some(c)),
            JoinOperator::Right(c) => (JoinKind::Right, Some(c)),
            JoinOperator::RightOuter(c) => (JoinKind::RightOuter, Some(c)),
            JoinOperator::FullOuter(c) => (JoinKind::Full, Some(c)),
            // PostgreSQL's CROSS JOIN takes no constraint.
            JoinOperator::CrossJoin(_) => (JoinKind::Cross, None),
            other => return Err(FormatError::unknown_enum("join type", variant_name(other))),
        };
        Ok(pair)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

impl SetOpKind {
    pub fn keyword(self, all: bool) -> &'static str {
        match (self, all) {
            (SetOpKind::Union, false) => "UNION",
            (SetOpKind::Union, true) => "UNION ALL",
            (SetOpKind::Intersect, false) => "INTERSECT",
            (SetOpKind::Intersect, true) => "INTERSECT ALL",
            (SetOpKind::Except, false) => "EXCEPT",
            (SetOpKind::Except, true) => "EXCEPT ALL",
        }
    }

    /// `ALL` or not.
    pub fn quantifier(q: &SetQuantifier) -> FmtResult<bool> {
        match q {
            SetQuantifier::All => Ok(true),
            SetQuantifier::Distinct | SetQuantifier::None => Ok(false),
            other => Err(FormatError::unknown_enum("set quantifier", variant_name(other))),
        }
    }
}

impl TryFrom<&SetOperator> for SetOpKind {
    type Error = FormatError;

    fn try_from(op: &SetOperator) -> FmtResult<Self> {
        match op {
            SetOperator::Union => Ok(SetOpKind::Union),
            SetOperator::Intersect => Ok(SetOpKind::Intersect),
            SetOperator::Except => Ok(SetOpKind::Except),
            #[allow(unreachable_patterns)]
            other => Err(FormatError::unknown_enum("set operation", variant_name(other))),
        }
    }
}

/// Kind of a subquery used as an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubLinkKind {
    Exists,
    All,
    Any,
    Array,
    Expr,
    In,
}

impl SubLinkKind {
    /// Keyword plus opening parenthesis.
    pub fn opener(self) -> &'static str {
        match self {
            SubLinkKind::Exists => "EXISTS(",
            SubLinkKind::All => "ALL(",
            SubLinkKind::Any => "ANY(",
            SubLinkKind::Array => "ARRAY(",
            SubLinkKind::Expr => "(",
            SubLinkKind::In => "IN (",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullTestKind {
    IsNull,
    IsNotNull,
}

impl NullTestKind {
    pub fn keyword(self) -> &'static str {
        match self {
            NullTestKind::IsNull => "IS NULL",
            NullTestKind::IsNotNull => "IS NOT NULL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolTestKind {
    IsTrue,
    IsNotTrue,
    IsFalse,
    IsNotFalse,
    IsUnknown,
    IsNotUnknown,
}

impl BoolTestKind {
    pub fn keyword(self) -> &'static str {
        match self {
            BoolTestKind::IsTrue => "IS TRUE",
            BoolTestKind::IsNotTrue => "IS NOT TRUE",
            BoolTestKind::IsFalse => "IS FALSE",
            BoolTestKind::IsNotFalse => "IS NOT FALSE",
            BoolTestKind::IsUnknown => "IS UNKNOWN",
            BoolTestKind::IsNotUnknown => "IS NOT UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Default,
    Asc,
    Desc,
}

impl SortDir {
    pub fn from_asc(asc: Option<bool>) -> Self {
        match asc {
            None => SortDir::Default,
            Some(true) => SortDir::Asc,
            Some(false) => SortDir::Desc,
        }
    }

    /// Suffix including its leading space; empty for the default direction.
    pub fn suffix(self) -> &'static str {
        match self {
            SortDir::Default => "",
            SortDir::Asc => " ASC",
            SortDir::Desc => " DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

impl NullsOrder {
    pub fn from_nulls_first(nulls_first: Option<bool>) -> Option<Self> {
        nulls_first.map(|first| if first { NullsOrder::First } else { NullsOrder::Last })
    }

    pub fn suffix(self) -> &'static str {
        match self {
            NullsOrder::First => " NULLS FIRST",
            NullsOrder::Last => " NULLS LAST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStrength {
    Update,
    Share,
}

impl LockStrength {
    pub fn keyword(self) -> &'static str {
        match self {
            LockStrength::Update => "FOR UPDATE",
            LockStrength::Share => "FOR SHARE",
        }
    }
}

impl TryFrom<&LockType> for LockStrength {
    type Error = FormatError;

    fn try_from(lock: &LockType) -> FmtResult<Self> {
        match lock {
            LockType::Update => Ok(LockStrength::Update),
            LockType::Share => Ok(LockStrength::Share),
            #[allow(unreachable_patterns)]
            other => Err(FormatError::unknown_enum("lock strength", variant_name(other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    NoWait,
    SkipLocked,
}

impl WaitPolicy {
    pub fn keyword(self) -> &'static str {
        match self {
            WaitPolicy::NoWait => "NOWAIT",
            WaitPolicy::SkipLocked => "SKIP LOCKED",
        }
    }
}

impl TryFrom<&NonBlock> for WaitPolicy {
    type Error = FormatError;

    fn try_from(policy: &NonBlock) -> FmtResult<Self> {
        match policy {
            NonBlock::Nowait => Ok(WaitPolicy::NoWait),
            NonBlock::SkipLocked => Ok(WaitPolicy::SkipLocked),
            #[allow(unreachable_patterns)]
            other => Err(FormatError::unknown_enum("wait policy", variant_name(other))),
        }
    }
}

/// Plain operator or a quantified comparison against an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AExprKind {
    Op,
    Any,
    All,
}

/// Functions whose names are re-cased, as (lower, upper).
const KNOWN_FUNCTIONS: &[(&str, &str)] = &[
    ("now", "NOW"),
    ("count", "COUNT"),
    ("min", "MIN"),
    ("max", "MAX"),
    ("sum", "SUM"),
    ("avg", "AVG"),
    ("gen_random_uuid", "GEN_RANDOM_UUID"),
    ("current_setting", "CURRENT_SETTING"),
    ("set_config", "SET_CONFIG"),
    ("array_agg", "ARRAY_AGG"),
    ("json_agg", "JSON_AGG"),
    ("jsonb_agg", "JSONB_AGG"),
    ("json_build_object", "JSON_BUILD_OBJECT"),
    ("jsonb_build_object", "JSONB_BUILD_OBJECT"),
    ("array_length", "ARRAY_LENGTH"),
    ("cardinality", "CARDINALITY"),
    ("date", "DATE"),
    ("date_trunc", "DATE_TRUNC"),
    ("string_agg", "STRING_AGG"),
    ("lower", "LOWER"),
    ("upper", "UPPER"),
    ("length", "LENGTH"),
    ("to_char", "TO_CHAR"),
    ("to_timestamp", "TO_TIMESTAMP"),
    ("unnest", "UNNEST"),
    ("row_number", "ROW_NUMBER"),
    ("rank", "RANK"),
    ("dense_rank", "DENSE_RANK"),
    ("greatest", "GREATEST"),
    ("least", "LEAST"),
    ("nullif", "NULLIF"),
    ("concat", "CONCAT"),
    ("abs", "ABS"),
    ("round", "ROUND"),
];

/// Canonical spelling of a whitelisted function name, `None` otherwise.
pub fn function_name(name: &str, case: FuncNameCase) -> Option<&'static str> {
    KNOWN_FUNCTIONS
        .iter()
        .find(|(lower, _)| lower.eq_ignore_ascii_case(name))
        .map(|&(lower, upper)| match case {
            FuncNameCase::Lower => lower,
            FuncNameCase::Upper => upper,
        })
}

/// SQL-standard value functions written without parentheses.
const CONTEXT_KEYWORDS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "CURRENT_USER",
    "SESSION_USER",
    "USER",
    "CURRENT_ROLE",
    "CURRENT_CATALOG",
    "CURRENT_SCHEMA",
];

pub fn is_context_keyword(word: &str) -> bool {
    CONTEXT_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(word))
}

/// Variant name out of a parser enum's `Debug` output.
fn variant_name<T: Debug>(value: &T) -> String {
    let debug = format!("{value:?}");
    debug
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default()
        .to_string()
}
