//! Rewrite SQL string constants in Rust source.
//!
//! Finds `const NAME: &str = "...";` items (free or associated) whose text
//! starts with `SELECT`, `INSERT`, `UPDATE` or `DELETE`, formats the SQL and
//! splices it back as a raw string literal.

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::LineColumn;
use serde::Serialize;
use syn::visit::Visit;
use syn::{Expr, ExprLit, ImplItemConst, ItemConst, Lit, LitStr};

use crate::config::StyleConfig;
use crate::error::{FmtResult, FormatError};

const SQL_PREFIXES: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE"];

/// A constant whose literal was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenConst {
    pub name: String,
    /// 1-indexed line of the literal in the original source.
    pub line: usize,
}

/// Result of rewriting one source text.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub source: String,
    pub rewritten: Vec<RewrittenConst>,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        !self.rewritten.is_empty()
    }
}

/// A SQL literal found in the source.
struct SqlConst {
    name: String,
    value: String,
    start: LineColumn,
    end: LineColumn,
}

#[derive(Default)]
struct SqlConstVisitor {
    found: Vec<SqlConst>,
}

impl SqlConstVisitor {
    fn check(&mut self, name: &syn::Ident, expr: &Expr) {
        if let Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) = expr
        {
            self.check_literal(name, lit);
        }
    }

    fn check_literal(&mut self, name: &syn::Ident, lit: &LitStr) {
        let value = lit.value();
        if !looks_like_sql(&value) {
            return;
        }
        let span = lit.span();
        self.found.push(SqlConst {
            name: name.to_string(),
            value,
            start: span.start(),
            end: span.end(),
        });
    }
}

impl<'ast> Visit<'ast> for SqlConstVisitor {
    fn visit_item_const(&mut self, node: &'ast ItemConst) {
        self.check(&node.ident, &node.expr);
        syn::visit::visit_item_const(self, node);
    }

    fn visit_impl_item_const(&mut self, node: &'ast ImplItemConst) {
        self.check(&node.ident, &node.expr);
        syn::visit::visit_impl_item_const(self, node);
    }
}

fn looks_like_sql(text: &str) -> bool {
    let Some(first) = text.split_whitespace().next() else {
        return false;
    };
    SQL_PREFIXES.iter().any(|p| first.eq_ignore_ascii_case(p))
}

/// Format every SQL constant in `source`.
pub fn rewrite_source(source: &str, config: &StyleConfig) -> FmtResult<Rewrite> {
    let file = syn::parse_file(source).map_err(|e| FormatError::Rust(e.to_string()))?;
    let mut visitor = SqlConstVisitor::default();
    visitor.visit_file(&file);

    let index = LineIndex::new(source);
    let mut edits = Vec::new();
    for found in visitor.found {
        let formatted = crate::format_with(found.value.trim(), config)?;
        if formatted == found.value {
            continue;
        }
        let start = index.offset(found.start)?;
        let end = index.offset(found.end)?;
        tracing::debug!(name = %found.name, line = found.start.line, "formatting sql constant");
        edits.push((start, end, raw_string_literal(&formatted), RewrittenConst {
            name: found.name,
            line: found.start.line,
        }));
    }

    let mut out = source.to_string();
    for (start, end, literal, _) in edits.iter().rev() {
        out.replace_range(*start..*end, literal);
    }
    Ok(Rewrite {
        source: out,
        rewritten: edits.into_iter().map(|(_, _, _, info)| info).collect(),
    })
}

/// Rewrite one file's source. Generated `*_gen.rs` files are skipped.
///
/// The file itself is not written.
pub fn rewrite_file(path: &Path, config: &StyleConfig) -> FmtResult<Option<Rewrite>> {
    if is_generated(path) {
        return Ok(None);
    }
    let source = fs::read_to_string(path)?;
    let rewrite = rewrite_source(&source, config)
        .map_err(|e| match e {
            FormatError::Rust(msg) => FormatError::Rust(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
    Ok(Some(rewrite))
}

fn is_generated(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_gen.rs"))
}

/// Collect `.rs` files under `path`, skipping build and VCS directories.
pub fn rust_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        collect_rust_files(path, &mut files);
    }
    files.sort();
    files
}

fn collect_rust_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name == "target" || name == ".git" || name == "node_modules" || name == "vendor" {
                continue;
            }
            collect_rust_files(&path, files);
        } else if path.extension().is_some_and(|e| e == "rs") {
            files.push(path);
        }
    }
}

/// `r#"..."#` with enough hashes that `content` cannot close it early.
fn raw_string_literal(content: &str) -> String {
    let mut hashes = 1;
    while content.contains(&format!("\"{}", "#".repeat(hashes))) {
        hashes += 1;
    }
    let fence = "#".repeat(hashes);
    format!("r{fence}\"{content}\"{fence}")
}

/// Maps proc-macro2 line/column pairs to byte offsets.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            source,
            line_starts,
        }
    }

    /// Lines are 1-indexed, columns count chars from 0.
    fn offset(&self, at: LineColumn) -> FmtResult<usize> {
        let start = at
            .line
            .checked_sub(1)
            .and_then(|i| self.line_starts.get(i))
            .copied()
            .ok_or_else(|| FormatError::Rust(format!("span line {} out of range", at.line)))?;
        let line = &self.source[start..];
        let within = line
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()))
            .nth(at.column)
            .ok_or_else(|| FormatError::Rust(format!("span column {} out of range", at.column)))?;
        Ok(start + within)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_looks_like_sql() {
        assert!(looks_like_sql("  select 1"));
        assert!(looks_like_sql("DELETE FROM users"));
        assert!(!looks_like_sql("selection"));
        assert!(!looks_like_sql(""));
    }

    #[test]
    fn test_raw_string_fence() {
        assert_eq!(raw_string_literal("a"), "r#\"a\"#");
        assert_eq!(raw_string_literal("say \"#hi\""), "r##\"say \"#hi\"\"##");
    }

    #[test]
    fn test_line_index() {
        let source = "ab\ncé d\n";
        let index = LineIndex::new(source);
        let at = |line, column| LineColumn { line, column };
        assert_eq!(index.offset(at(1, 0)).unwrap(), 0);
        assert_eq!(index.offset(at(2, 0)).unwrap(), 3);
        assert_eq!(index.offset(at(2, 2)).unwrap(), 6);
        assert!(index.offset(at(9, 0)).is_err());
    }

    #[test]
    fn test_generated_files_skipped() {
        assert!(is_generated(Path::new("src/queries_gen.rs")));
        assert!(!is_generated(Path::new("src/queries.rs")));
    }
}
