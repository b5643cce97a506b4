//! # pgsqlfmt — canonical PostgreSQL formatting
//!
//! Parses SQL with the PostgreSQL grammar and prints it back in one fixed
//! layout: keywords upper-cased, one target per line, joins and boolean
//! chains indented by nesting depth.
//!
//! ## Quick Example
//!
//! ```
//! let sql = pgsqlfmt::format("select user_name from users", None).unwrap();
//! assert_eq!(sql, "\nSELECT\n  user_name\nFROM users\n");
//! ```
//!
//! ## Style options
//!
//! | Option                    | Values                    | Default      |
//! |---------------------------|---------------------------|--------------|
//! | `indent-type`             | `TAB`, `TWO_SPACES`       | `TWO_SPACES` |
//! | `func.name-type-case`     | `LOWERCASE`, `UPPERCASE`  | `LOWERCASE`  |
//! | `join.start-indent-type`  | `NONE`, `ONE_SPACE`       | `ONE_SPACE`  |
//! | `join.line-break-type`    | `ON_CLAUSE`, `OFF`        | `ON_CLAUSE`  |
//!
//! Named parameters (`:user_id`) are accepted and kept as written.

pub mod ast;
pub mod config;
pub mod error;
pub mod keywords;
pub mod lower;
pub mod normalize;
pub mod parser;
pub mod render;
pub mod rewrite;

use tracing::{debug, trace};

pub mod prelude {
    pub use crate::config::{
        FuncNameCase, IndentType, JoinLineBreak, JoinStartIndent, StyleConfig,
    };
    pub use crate::error::*;
    pub use crate::rewrite::{Rewrite, rewrite_file, rewrite_source};
    pub use crate::{format, format_with};
}

use crate::config::StyleConfig;
use crate::error::FmtResult;
use crate::render::Renderer;

/// Format SQL text. `None` selects the default style.
///
/// The result starts with a newline, puts each statement on its own lines and
/// ends with a newline. Any parse, lowering or rendering error aborts the
/// whole call.
pub fn format(sql: &str, config: Option<&StyleConfig>) -> FmtResult<String> {
    match config {
        Some(config) => format_with(sql, config),
        None => format_with(sql, &StyleConfig::default()),
    }
}

/// Format SQL text with an explicit style.
pub fn format_with(sql: &str, config: &StyleConfig) -> FmtResult<String> {
    let protected = normalize::normalize(sql);
    trace!(sql = %protected, "normalized");

    let statements = parser::parse(&protected)?
        .iter()
        .map(lower::lower_statement)
        .collect::<FmtResult<Vec<_>>>()?;
    debug!(statements = statements.len(), "formatting sql");

    let renderer = Renderer::new(config);
    let mut out = String::new();
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push('\n');
        out.push_str(&renderer.statement(stmt));
    }
    out.push('\n');

    Ok(normalize::restore(&out))
}
