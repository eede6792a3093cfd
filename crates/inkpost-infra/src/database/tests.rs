use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction, Value};

use inkpost_core::domain::{Post, PostDraft};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{BaseRepository, PostRepository, PostSearch};
use inkpost_shared::ContentBlock;
use inkpost_shared::dto::SortDirection;

use crate::database::entity::{post, user};
use crate::database::postgres_repo::PostgresPostRepository;

fn post_model(id: i32, user_id: i32, views: i32) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        user_id,
        title: format!("Post {id}"),
        body: post::Body(vec![ContentBlock::Paragraph {
            text: "Opening line".to_owned(),
        }]),
        tags: "rust,web".to_owned(),
        description: "Opening line".to_owned(),
        views,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(5, 1, 3)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(5).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.id, 5);
    assert_eq!(post.views, 3);
    assert_eq!(post.body.len(), 1);
}

fn user_model(id: i32) -> user::Model {
    user::Model {
        id,
        full_name: "Grace Hopper".to_owned(),
        email: "grace@example.com".to_owned(),
        created_at: Utc::now().into(),
    }
}

fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", total.into())])
}

fn logged_sql(db: sea_orm::DatabaseConnection) -> Vec<(String, Vec<Value>)> {
    db.into_transaction_log()
        .iter()
        .flat_map(Transaction::statements)
        .map(|stmt| {
            let values = stmt.values.clone().map(|v| v.0).unwrap_or_default();
            (stmt.sql.clone(), values)
        })
        .collect()
}

#[tokio::test]
async fn test_find_with_author_joins_user() {
    let author = user_model(1);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![(post_model(5, 1, 4), author)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let found = repo.find_with_author(5).await.unwrap().unwrap();

    assert_eq!(found.post.id, 5);
    assert_eq!(found.author.map(|u| u.email).as_deref(), Some("grace@example.com"));
}

#[tokio::test]
async fn test_insert_returns_stored_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(9, 2, 0)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let draft = PostDraft::new(
        2,
        "Post 9".to_owned(),
        vec![ContentBlock::Paragraph {
            text: "Opening line".to_owned(),
        }],
        "rust,web".to_owned(),
    );

    let post = repo.insert(draft).await.unwrap();

    assert_eq!(post.id, 9);
    assert_eq!(post.user_id, 2);
    assert_eq!(post.views, 0);
    assert_eq!(post.description, "Opening line");
}

#[tokio::test]
async fn test_increment_views_reports_rows_affected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert_eq!(repo.increment_views(5).await.unwrap(), 1);
    assert_eq!(repo.increment_views(404).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, i32>::delete(&repo, 404).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_list_by_views_counts_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(2, 1, 30), post_model(1, 1, 7)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let page = repo.list_by_views().await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].views, 30);
}

#[tokio::test]
async fn test_increment_views_is_a_single_update_expression() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    repo.increment_views(5).await.unwrap();

    assert_eq!(
        repo.db.into_transaction_log(),
        [Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"UPDATE "posts" SET "views" = "views" + $1 WHERE "posts"."id" = $2"#,
            [1i32.into(), 5i32.into()]
        )]
    );
}

#[tokio::test]
async fn test_search_filters_orders_and_paginates_in_sql() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(3)]])
        .append_query_results([vec![(post_model(2, 1, 30), Some(user_model(1)))]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let criteria = PostSearch {
        title: Some("Rust_1".to_owned()),
        tag: Some("web".to_owned()),
        views: Some(SortDirection::Desc),
        limit: 1,
        offset: 2,
        ..Default::default()
    };

    let page = repo.search(&criteria).await.unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items[0].post.id, 2);
    assert_eq!(page.items[0].author.as_ref().map(|u| u.id), Some(1));

    let log = logged_sql(repo.db);
    assert_eq!(log.len(), 2);

    let (count_sql, count_values) = &log[0];
    assert!(count_sql.contains("COUNT(*)"), "{count_sql}");
    assert!(count_sql.contains(r#"LOWER("posts"."title") LIKE $1 ESCAPE"#), "{count_sql}");
    assert!(count_sql.contains(r#"LOWER("posts"."tags") LIKE $2 ESCAPE"#), "{count_sql}");
    assert!(count_values.contains(&Value::from("%rust\\_1%")));
    assert!(count_values.contains(&Value::from("%web%")));

    let (select_sql, select_values) = &log[1];
    assert!(select_sql.contains(r#"LEFT JOIN "users""#), "{select_sql}");
    assert!(
        select_sql.contains(r#"ORDER BY "posts"."views" DESC, "posts"."id" ASC LIMIT $3 OFFSET $4"#),
        "{select_sql}"
    );
    assert_eq!(select_values[2..], [Value::from(1u64), Value::from(2u64)]);
}

#[tokio::test]
async fn test_search_without_view_order_is_newest_first() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(0)]])
        .append_query_results([Vec::<(post::Model, Option<user::Model>)>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let criteria = PostSearch {
        limit: 10,
        ..Default::default()
    };

    repo.search(&criteria).await.unwrap();

    let log = logged_sql(repo.db);
    assert!(
        log[1]
            .0
            .contains(r#"ORDER BY "posts"."created_at" DESC, "posts"."id" DESC"#),
        "{}",
        log[1].0
    );
}

#[tokio::test]
async fn test_search_body_matches_block_text_only() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(0)]])
        .append_query_results([Vec::<(post::Model, Option<user::Model>)>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let criteria = PostSearch {
        body: Some("Tokio".to_owned()),
        limit: 10,
        ..Default::default()
    };

    repo.search(&criteria).await.unwrap();

    let (count_sql, values) = &logged_sql(repo.db)[0];
    assert!(
        count_sql.contains(
            r#"EXISTS (SELECT 1 FROM jsonb_path_query("posts"."body", $1::jsonpath) AS fragment(value) WHERE LOWER(fragment.value #>> '{}') LIKE $2 ESCAPE"#
        ),
        "{count_sql}"
    );
    assert!(!count_sql.contains("AS text"), "{count_sql}");
    assert!(matches!(&values[0], Value::String(Some(path)) if path.contains(r#"@.key == "text""#)));
    assert_eq!(values[1], Value::from("%tokio%"));
}
