use std::fs;

use pgsqlfmt::prelude::*;
use pgsqlfmt::rewrite::{RewrittenConst, rust_files};
use pretty_assertions::assert_eq;

const SOURCE: &str = r#"pub const GET_USER: &str = "select user_name from users where user_uuid = $1";
pub const GREETING: &str = "hello";

struct Queries;

impl Queries {
    const DELETE_USER: &str = "delete from users where user_uuid = :user_uuid";
}

fn main() {
    let _ = "select not_a_const";
}
"#;

#[test]
fn test_rewrite_consts() {
    let rewrite = rewrite_source(SOURCE, &StyleConfig::default()).unwrap();

    assert_eq!(
        rewrite.rewritten,
        vec![
            RewrittenConst {
                name: "GET_USER".into(),
                line: 1,
            },
            RewrittenConst {
                name: "DELETE_USER".into(),
                line: 7,
            },
        ]
    );
    assert!(rewrite.source.starts_with(
        "pub const GET_USER: &str = r#\"\nSELECT\n  user_name\nFROM users\nWHERE user_uuid = $1\n\"#;\n"
    ));
    assert!(rewrite.source.contains(
        "const DELETE_USER: &str = r#\"\nDELETE FROM users\nWHERE user_uuid = :user_uuid\n\"#;"
    ));
    assert!(rewrite.source.contains("pub const GREETING: &str = \"hello\";"));
    assert!(rewrite.source.contains("let _ = \"select not_a_const\";"));
}

#[test]
fn test_rewrite_is_stable() {
    let conf = StyleConfig::default();
    let first = rewrite_source(SOURCE, &conf).unwrap();
    let second = rewrite_source(&first.source, &conf).unwrap();
    assert!(!second.changed());
    assert_eq!(second.source, first.source);
}

#[test]
fn test_rewrite_bad_sql_fails() {
    let source = "const BROKEN: &str = \"select * from users where\";\n";
    assert!(rewrite_source(source, &StyleConfig::default()).is_err());
}

#[test]
fn test_rewrite_bad_rust_fails() {
    let err = rewrite_source("fn main( {", &StyleConfig::default()).unwrap_err();
    assert!(matches!(err, FormatError::Rust(_)));
}

#[test]
fn test_rewrite_files() {
    let dir = std::env::temp_dir().join(format!("pgsqlfmt-rewrite-{}", std::process::id()));
    let target = dir.join("target");
    fs::create_dir_all(&target).unwrap();
    fs::write(dir.join("queries.rs"), SOURCE).unwrap();
    fs::write(dir.join("queries_gen.rs"), SOURCE).unwrap();
    fs::write(target.join("built.rs"), SOURCE).unwrap();

    let files = rust_files(&dir);
    assert_eq!(files, vec![dir.join("queries.rs"), dir.join("queries_gen.rs")]);

    let conf = StyleConfig::default();
    let rewrite = rewrite_file(&dir.join("queries.rs"), &conf).unwrap().unwrap();
    assert!(rewrite.changed());
    assert!(rewrite_file(&dir.join("queries_gen.rs"), &conf).unwrap().is_none());

    fs::remove_dir_all(&dir).unwrap();
}
