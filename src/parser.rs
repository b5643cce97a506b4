//! SQL parsing with the PostgreSQL dialect.

use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::FmtResult;

/// Parse SQL text into the parser's statement list.
pub fn parse(sql: &str) -> FmtResult<Vec<Statement>> {
    let statements = Parser::parse_sql(&PostgreSqlDialect {}, sql)?;
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn test_parse_multiple() {
        let stmts = parse("select 1; select 2").unwrap();
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn test_parse_error() {
        let err = parse("selec user_name from users").unwrap_err();
        assert!(matches!(err, FormatError::Parse(_)));
    }
}
