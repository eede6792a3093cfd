//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, Unchanged,
};

use inkpost_core::domain::{Post, PostDraft, PostId, PostWithAuthor};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{Page, PostRepository, PostSearch};
use inkpost_shared::dto::SortDirection;

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::Entity as UserEntity;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

        let mut model = post::ActiveModel::from(draft);
        model.views = Set(0);
        model.created_at = Set(now);
        model.updated_at = Set(now);

        let saved = model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(saved.into())
    }

    async fn find_with_author(&self, id: PostId) -> Result<Option<PostWithAuthor>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(|(post, user)| PostWithAuthor {
            post: post.into(),
            author: user.map(Into::into),
        }))
    }

    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_views(&self) -> Result<Page<Post>, RepoError> {
        let rows = PostEntity::find()
            .order_by_desc(post::Column::Views)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let total = rows.len() as u64;
        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn search(&self, criteria: &PostSearch) -> Result<Page<PostWithAuthor>, RepoError> {
        let mut condition = Condition::all();
        if let Some(body) = &criteria.body {
            condition = condition.add(body_contains_ci(body));
        }
        if let Some(title) = &criteria.title {
            condition = condition.add(contains_ci(post_col(post::Column::Title), title));
        }
        if let Some(tag) = &criteria.tag {
            condition = condition.add(contains_ci(post_col(post::Column::Tags), tag));
        }

        let select = PostEntity::find().filter(condition);

        let total = select.clone().count(&self.db).await.map_err(map_db_err)?;

        let rows = order_for_search(select, criteria.views)
            .find_also_related(UserEntity)
            .limit(criteria.limit)
            .offset(criteria.offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(|(post, user)| PostWithAuthor {
                    post: post.into(),
                    author: user.map(Into::into),
                })
                .collect(),
            total,
        })
    }

    async fn increment_views(&self, id: PostId) -> Result<u64, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    async fn replace(&self, id: PostId, draft: PostDraft) -> Result<Post, RepoError> {
        let mut model = post::ActiveModel::from(draft);
        model.id = Unchanged(id);
        model.updated_at = Set(Utc::now().into());

        let updated = model.update(&self.db).await.map_err(map_db_err)?;
        Ok(updated.into())
    }
}

fn order_for_search(
    select: Select<PostEntity>,
    views: Option<SortDirection>,
) -> Select<PostEntity> {
    match views {
        Some(SortDirection::Asc) => select
            .order_by_asc(post::Column::Views)
            .order_by_asc(post::Column::Id),
        Some(SortDirection::Desc) => select
            .order_by_desc(post::Column::Views)
            .order_by_asc(post::Column::Id),
        None => select
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id),
    }
}

/// Every string reachable from the reader-visible fields of each block's
/// `data`. Must stay in line with `ContentBlock::text_fragments`.
const BODY_TEXT_PATH: &str = r#"$[*].data.keyvalue() ? (@.key == "text" || @.key == "items" || @.key == "caption" || @.key == "code").value.** ? (@.type() == "string")"#;

fn post_col(column: post::Column) -> SimpleExpr {
    Expr::col((PostEntity, column)).into()
}

/// True when any text fragment of the body contains `needle`, ignoring case.
fn body_contains_ci(needle: &str) -> SimpleExpr {
    let fragment_matches = contains_ci(Expr::cust("fragment.value #>> '{}'"), needle);
    Expr::cust_with_exprs(
        "EXISTS (SELECT 1 FROM jsonb_path_query($1, $2::jsonpath) AS fragment(value) WHERE $3)",
        [
            post_col(post::Column::Body),
            Expr::val(BODY_TEXT_PATH).into(),
            fragment_matches,
        ],
    )
}

/// `lower(expr) LIKE '%needle%'` with LIKE metacharacters in `needle` escaped.
fn contains_ci(expr: impl Into<SimpleExpr>, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(expr)).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
