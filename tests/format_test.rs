use pgsqlfmt::prelude::*;
use pretty_assertions::assert_eq;

fn fmt(sql: &str) -> String {
    format(sql, None).expect("failed to format")
}

fn fmt_with(sql: &str, conf: &StyleConfig) -> String {
    format_with(sql, conf).expect("failed to format")
}

#[test]
fn test_single_column() {
    assert_eq!(
        fmt("SELECT user_name FROM users"),
        "\nSELECT\n  user_name\nFROM users\n"
    );
}

#[test]
fn test_multiple_columns() {
    assert_eq!(
        fmt("select user_uuid, user_name, user_age from users"),
        "\nSELECT\n  user_uuid,\n  user_name,\n  user_age\nFROM users\n"
    );
}

#[test]
fn test_aliases() {
    assert_eq!(
        fmt("select u.user_name un from users u"),
        "\nSELECT\n  u.user_name AS un\nFROM users u\n"
    );
    assert_eq!(
        fmt("select u.user_name as un from users as u"),
        "\nSELECT\n  u.user_name AS un\nFROM users u\n"
    );
}

#[test]
fn test_where_and_chain() {
    assert_eq!(
        fmt("select user_uuid from users where user_uuid = $1 and user_email = $2"),
        "\nSELECT\n  user_uuid\nFROM users\nWHERE user_uuid = $1\n  AND user_email = $2\n"
    );
}

#[test]
fn test_where_nested_group() {
    let conf = StyleConfig::default().with_indent_type(IndentType::Tab);
    assert_eq!(
        fmt_with(
            "select user_uuid from users where user_uuid = $1 and (user_email = $2 or user_age = $3)",
            &conf
        ),
        "\nSELECT\n\tuser_uuid\nFROM users\nWHERE user_uuid = $1\n\tAND (\n\t\tuser_email = $2\n\t\t\tOR user_age = $3\n\t)\n"
    );
}

#[test]
fn test_not_group() {
    assert_eq!(
        fmt("select 1 from t where not (a = 1 or b = 2)"),
        "\nSELECT\n  1\nFROM t\nWHERE NOT (\n  a = 1\n    OR b = 2\n)\n"
    );
}

#[test]
fn test_named_params() {
    let out = fmt(
        "select user_uuid, user_name from users where user_uuid = :user_uuid and user_email = :user_email",
    );
    assert_eq!(
        out,
        "\nSELECT\n  user_uuid,\n  user_name\nFROM users\nWHERE user_uuid = :user_uuid\n  AND user_email = :user_email\n"
    );
    assert!(!out.contains("ttpre_"));
}

#[test]
fn test_constants() {
    assert_eq!(
        fmt("select 42, 3.14, 'it''s', true, false, null"),
        "\nSELECT\n  42,\n  3.14,\n  'it''s',\n  true,\n  false,\n  NULL\n"
    );
}

#[test]
fn test_distinct_group_having() {
    assert_eq!(
        fmt("select distinct user_age, count(*) from users group by user_age having count(*) > 1"),
        "\nSELECT DISTINCT\n  user_age,\n  count(*)\nFROM users\nGROUP BY user_age\nHAVING count(*) > 1\n"
    );
}

#[test]
fn test_order_limit_offset() {
    assert_eq!(
        fmt("select user_uuid from users order by created_at desc, user_name limit 10 offset 20"),
        "\nSELECT\n  user_uuid\nFROM users\nORDER BY created_at DESC,\n  user_name\nLIMIT 10\nOFFSET 20\n"
    );
}

#[test]
fn test_for_update_skip_locked() {
    assert_eq!(
        fmt("select user_uuid from users where user_uuid = $1 for update skip locked"),
        "\nSELECT\n  user_uuid\nFROM users\nWHERE user_uuid = $1\nFOR UPDATE SKIP LOCKED\n"
    );
}

#[test]
fn test_union_all() {
    assert_eq!(
        fmt("select a from x union all select a from y"),
        "\nSELECT\n  a\nFROM x\nUNION ALL\nSELECT\n  a\nFROM y\n"
    );
}

#[test]
fn test_subquery_in_from() {
    assert_eq!(
        fmt("select t.a from (select a from x) t"),
        "\nSELECT\n  t.a\nFROM (\n  SELECT\n    a\n  FROM x\n) t\n"
    );
}

#[test]
fn test_exists_sublink() {
    assert_eq!(
        fmt("select user_uuid from users u where exists (select 1 from posts p where p.user_uuid = u.user_uuid)"),
        "\nSELECT\n  user_uuid\nFROM users u\nWHERE EXISTS(\n  SELECT\n    1\n  FROM posts p\n  WHERE p.user_uuid = u.user_uuid\n)\n"
    );
}

#[test]
fn test_in_list_and_between() {
    assert_eq!(
        fmt("select 1 from t where a in (1, 2) and b not between 1 and 5"),
        "\nSELECT\n  1\nFROM t\nWHERE a IN (1, 2)\n  AND b NOT BETWEEN 1 AND 5\n"
    );
}

#[test]
fn test_null_test_and_not_equal() {
    assert_eq!(
        fmt("select 1 from t where deleted_at is null and a <> 1"),
        "\nSELECT\n  1\nFROM t\nWHERE deleted_at IS NULL\n  AND a != 1\n"
    );
}

#[test]
fn test_function_case() {
    let sql = "select array_agg(user_uuid), now() from users";
    assert_eq!(
        fmt(sql),
        "\nSELECT\n  array_agg(user_uuid),\n  now()\nFROM users\n"
    );

    let upper = StyleConfig::default().with_func_name_case(FuncNameCase::Upper);
    assert_eq!(
        fmt_with(sql, &upper),
        "\nSELECT\n  ARRAY_AGG(user_uuid),\n  NOW()\nFROM users\n"
    );

    // Unknown functions are left as written.
    assert_eq!(
        fmt_with("select My_Func(a) from t", &upper),
        "\nSELECT\n  My_Func(a)\nFROM t\n"
    );
}

#[test]
fn test_count_distinct_and_star() {
    assert_eq!(
        fmt("select count(distinct user_uuid), count(*) from users"),
        "\nSELECT\n  count(DISTINCT user_uuid),\n  count(*)\nFROM users\n"
    );
}

#[test]
fn test_window_call() {
    assert_eq!(
        fmt("select row_number() over (partition by user_age order by created_at desc) from users"),
        "\nSELECT\n  row_number() OVER(PARTITION BY user_age ORDER BY created_at DESC)\nFROM users\n"
    );
    assert_eq!(
        fmt("select row_number() over () from users"),
        "\nSELECT\n  row_number() OVER()\nFROM users\n"
    );
}

#[test]
fn test_window_frame() {
    assert_eq!(
        fmt("select sum(amount) over (order by created_at rows between unbounded preceding and current row) from payments"),
        "\nSELECT\n  sum(amount) OVER(ORDER BY created_at ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)\nFROM payments\n"
    );
}

#[test]
fn test_any_subquery() {
    assert_eq!(
        fmt("select 1 from t where a = any(select b from u)"),
        "\nSELECT\n  1\nFROM t\nWHERE a = ANY(\n  SELECT\n    b\n  FROM u\n)\n"
    );
}

#[test]
fn test_like_family() {
    let upper = StyleConfig::default().with_func_name_case(FuncNameCase::Upper);
    assert_eq!(
        fmt_with("select 1 from users where lower(name) like lower($1)", &upper),
        "\nSELECT\n  1\nFROM users\nWHERE LOWER(name) LIKE LOWER($1)\n"
    );
    assert_eq!(
        fmt("select 1 from t where a not ilike $1 escape '!' and b similar to 'x%' and c is distinct from d"),
        "\nSELECT\n  1\nFROM t\nWHERE a NOT ILIKE $1 ESCAPE '!'\n  AND b SIMILAR TO 'x%'\n  AND c IS DISTINCT FROM d\n"
    );
}

#[test]
fn test_array_literal() {
    let upper = StyleConfig::default().with_func_name_case(FuncNameCase::Upper);
    assert_eq!(
        fmt_with("select array[now(), $1]", &upper),
        "\nSELECT\n  ARRAY[NOW(), $1]\n"
    );
}

#[test]
fn test_empty_target_list() {
    assert_eq!(fmt("select from users"), "\n\n");
}

#[test]
fn test_case_and_coalesce() {
    assert_eq!(
        fmt("select case when user_age >= 20 then 'adult' else 'child' end as kind, coalesce(nickname, user_name) from users"),
        "\nSELECT\n  CASE WHEN user_age >= 20 THEN 'adult' ELSE 'child' END AS kind,\n  COALESCE(nickname, user_name)\nFROM users\n"
    );
}

#[test]
fn test_type_casts() {
    assert_eq!(
        fmt("select created_at::date from users where user_uuid = any($1::uuid[])"),
        "\nSELECT\n  created_at::date\nFROM users\nWHERE user_uuid = ANY($1::uuid[])\n"
    );
    assert_eq!(fmt("select :id::bigint"), "\nSELECT\n  :id::bigint\n");
}

#[test]
fn test_context_keyword() {
    assert_eq!(fmt("select current_timestamp"), "\nSELECT\n  CURRENT_TIMESTAMP\n");
}

const JOIN_SQL: &str = "select u.user_uuid, p.title from users u inner join posts p on u.user_uuid = p.user_uuid where u.user_uuid = $1";

#[test]
fn test_join_default_style() {
    assert_eq!(
        fmt(JOIN_SQL),
        "\nSELECT\n  u.user_uuid,\n  p.title\nFROM users u\n  INNER JOIN posts p\n    ON u.user_uuid = p.user_uuid\nWHERE u.user_uuid = $1\n"
    );
}

#[test]
fn test_join_inline_style() {
    let conf = StyleConfig::default()
        .with_join_start_indent(JoinStartIndent::None)
        .with_join_line_break(JoinLineBreak::Off);
    assert_eq!(
        fmt_with(JOIN_SQL, &conf),
        "\nSELECT\n  u.user_uuid,\n  p.title\nFROM users u\nINNER JOIN posts p ON u.user_uuid = p.user_uuid\nWHERE u.user_uuid = $1\n"
    );
}

#[test]
fn test_join_flush_with_on_clause_break() {
    let conf = StyleConfig::default().with_join_start_indent(JoinStartIndent::None);
    assert_eq!(
        fmt_with(JOIN_SQL, &conf),
        "\nSELECT\n  u.user_uuid,\n  p.title\nFROM users u\nINNER JOIN posts p\n  ON u.user_uuid = p.user_uuid\nWHERE u.user_uuid = $1\n"
    );
}

#[test]
fn test_join_indented_inline_on() {
    let conf = StyleConfig::default().with_join_line_break(JoinLineBreak::Off);
    assert_eq!(
        fmt_with(JOIN_SQL, &conf),
        "\nSELECT\n  u.user_uuid,\n  p.title\nFROM users u\n  INNER JOIN posts p ON u.user_uuid = p.user_uuid\nWHERE u.user_uuid = $1\n"
    );
}

#[test]
fn test_join_on_and_chain() {
    assert_eq!(
        fmt("select * from a join b on a.id = b.id and b.kind = $1"),
        "\nSELECT\n  *\nFROM a\n  JOIN b\n    ON a.id = b.id\n      AND b.kind = $1\n"
    );
}

#[test]
fn test_join_order_and_using() {
    let out = fmt("select * from a left join b using (id) join c on c.id = b.id");
    assert_eq!(
        out,
        "\nSELECT\n  *\nFROM a\n  LEFT JOIN b USING(id)\n  JOIN c\n    ON c.id = b.id\n"
    );
}

#[test]
fn test_insert_values() {
    assert_eq!(
        fmt("insert into users (user_uuid, user_name) values ($1, $2)"),
        "\nINSERT INTO users(\n  user_uuid,\n  user_name\n) VALUES (\n  $1,\n  $2\n)\n"
    );
}

#[test]
fn test_insert_with_function() {
    assert_eq!(
        fmt("insert into users (user_uuid, created_at) values ($1, NOW())"),
        "\nINSERT INTO users(\n  user_uuid,\n  created_at\n) VALUES (\n  $1,\n  now()\n)\n"
    );
}

#[test]
fn test_insert_multiple_rows() {
    assert_eq!(
        fmt("insert into t (a) values (1), (2)"),
        "\nINSERT INTO t(\n  a\n) VALUES (\n  1\n), (\n  2\n)\n"
    );
}

#[test]
fn test_insert_select() {
    assert_eq!(
        fmt("insert into deleted_users (user_uuid, user_name) select user_uuid, user_name from users where user_uuid = $1"),
        "\nINSERT INTO deleted_users(\n  user_uuid,\n  user_name\n) SELECT\n  user_uuid,\n  user_name\nFROM users\nWHERE user_uuid = $1\n"
    );
}

#[test]
fn test_insert_on_conflict() {
    assert_eq!(
        fmt("insert into users (user_uuid, user_name) values ($1, $2) on conflict (user_uuid) do update set user_name = excluded.user_name"),
        "\nINSERT INTO users(\n  user_uuid,\n  user_name\n) VALUES (\n  $1,\n  $2\n)\nON CONFLICT(user_uuid)\nDO UPDATE SET\n  user_name = EXCLUDED.user_name\n"
    );
    assert_eq!(
        fmt("insert into users (user_uuid) values ($1) on conflict do nothing"),
        "\nINSERT INTO users(\n  user_uuid\n) VALUES (\n  $1\n)\nON CONFLICT\nDO NOTHING\n"
    );
}

#[test]
fn test_insert_on_conflict_constraint() {
    assert_eq!(
        fmt("insert into users (user_uuid) values ($1) on conflict on constraint users_pkey do nothing"),
        "\nINSERT INTO users(\n  user_uuid\n) VALUES (\n  $1\n)\nON CONFLICT ON CONSTRAINT users_pkey\nDO NOTHING\n"
    );
}

#[test]
fn test_insert_keeps_alias() {
    assert_eq!(
        fmt("insert into users as u (a) values (1) on conflict (a) do update set a = u.a + 1 returning u.a"),
        "\nINSERT INTO users AS u(\n  a\n) VALUES (\n  1\n)\nON CONFLICT(a)\nDO UPDATE SET\n  a = u.a + 1\nRETURNING u.a\n"
    );
}

#[test]
fn test_insert_without_columns() {
    assert_eq!(
        fmt("insert into users values ($1, $2)"),
        "\nINSERT INTO users\nVALUES (\n  $1,\n  $2\n)\n"
    );
}

#[test]
fn test_update() {
    assert_eq!(
        fmt("update users set user_name = $1, updated_at = now() where user_uuid = $2"),
        "\nUPDATE users\nSET\n  user_name = $1,\n  updated_at = now()\nWHERE user_uuid = $2\n"
    );
}

#[test]
fn test_delete_returning() {
    assert_eq!(
        fmt("delete from users where user_uuid = $1 returning user_uuid"),
        "\nDELETE FROM users\nWHERE user_uuid = $1\nRETURNING user_uuid\n"
    );
}

#[test]
fn test_multiple_statements() {
    assert_eq!(fmt("select 1; select 2"), "\nSELECT\n  1;\nSELECT\n  2\n");
}

#[test]
fn test_idempotent() {
    let queries = [
        JOIN_SQL,
        "select user_uuid from users where user_uuid = $1 and (user_email = $2 or user_age = $3)",
        "select user_uuid from users u where exists (select 1 from posts p where p.user_uuid = u.user_uuid)",
        "select t.a from (select a from x) t order by t.a desc limit 5",
        "select a from x union select a from y",
        "insert into users (user_uuid, user_name) values ($1, $2) on conflict (user_uuid) do update set user_name = excluded.user_name",
        "update users set user_name = :name where user_uuid = :id",
        "select 1; select 2",
        "select count(*) filter (where a > 1) from t",
        "with recent as (select * from posts where created_at > now()) select * from recent",
        "insert into users as u (a) values (1) on conflict (a) do update set a = u.a + 1",
        "select 1 from users where lower(name) like lower($1) escape '!'",
    ];
    for sql in queries {
        let once = fmt(sql);
        assert_eq!(fmt(&once), once, "not idempotent: {sql}");
    }
}

#[test]
fn test_style_independence() {
    let tab = StyleConfig::default().with_indent_type(IndentType::Tab);
    let sql = "select user_uuid from users u join posts p on p.user_uuid = u.user_uuid where a = 1 and (b = 2 or c = 3)";
    assert_eq!(fmt_with(sql, &tab).replace('\t', "  "), fmt(sql));
}

#[test]
fn test_parse_error() {
    let err = format("selec user_name from users", None).unwrap_err();
    assert!(matches!(err, FormatError::Parse(_)));
}

#[test]
fn test_unsupported_statement() {
    let err = format("create table users (id int)", None).unwrap_err();
    assert!(matches!(err, FormatError::Unsupported(_)));

    let err = format("update users set a = b.a from b where b.id = users.id", None).unwrap_err();
    assert!(matches!(err, FormatError::Unsupported(_)));
}

#[test]
fn test_clauses_without_styled_form_are_rejected() {
    for sql in [
        "delete from t where a = 1 order by a limit 1",
        "update t set a = 1 where b = 2 limit 1",
        "select a from t where x = 1 qualify row_number() over () = 1",
    ] {
        let err = format(sql, None).unwrap_err();
        assert!(matches!(err, FormatError::Unsupported(_)), "{sql}: {err}");
    }
}
