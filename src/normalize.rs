//! Placeholder normalizer.
//!
//! The parser has no grammar for `:name` named parameters, so they are turned
//! into plain identifiers before parsing and turned back afterwards. `::`
//! casts are shielded while that happens.
//!
//! There is no escaping: input that already contains `castpre_` or `ttpre_`
//! will not survive unchanged.

const CAST_MARKER: &str = "castpre_";
const NAMED_PARAM_MARKER: &str = "ttpre_";

/// Rewrite `:name` to `ttpre_name`, leaving `::` alone.
pub fn normalize(sql: &str) -> String {
    sql.replace("::", CAST_MARKER)
        .replace(':', NAMED_PARAM_MARKER)
        .replace(CAST_MARKER, "::")
}

/// Undo [`normalize`] on formatted output.
pub fn restore(formatted: &str) -> String {
    formatted.replace(NAMED_PARAM_MARKER, ":")
}
