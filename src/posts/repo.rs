use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Post record in the database. Content is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Flat row for listings: a post joined with the minimal author view.
/// The projection deliberately selects neither email nor password_hash.
#[derive(Debug, Clone, FromRow)]
pub struct PostAuthorRow {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_name: String,
    pub author_bio: Option<String>,
}

// Listings are newest-first; ties on created_at break by descending id so
// near-simultaneous posts order deterministically.
const LIST_COLUMNS: &str = r#"
    p.id, p.content, p.author_id, p.created_at, p.updated_at,
    u.name AS author_name, u.bio AS author_bio
"#;

impl Post {
    pub async fn create(db: &PgPool, content: &str, author_id: Uuid) -> sqlx::Result<Post> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (content, author_id)
            VALUES ($1, $2)
            RETURNING id, content, author_id, created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(author_id)
        .fetch_one(db)
        .await
    }

    pub async fn list_feed(
        db: &PgPool,
        limit: i64,
        before: Option<OffsetDateTime>,
    ) -> sqlx::Result<Vec<PostAuthorRow>> {
        sqlx::query_as::<_, PostAuthorRow>(&format!(
            r#"
            SELECT {LIST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE ($2::timestamptz IS NULL OR p.created_at < $2)
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $1
            "#,
        ))
        .bind(limit)
        .bind(before)
        .fetch_all(db)
        .await
    }

    pub async fn list_by_author(db: &PgPool, author_id: Uuid) -> sqlx::Result<Vec<PostAuthorRow>> {
        sqlx::query_as::<_, PostAuthorRow>(&format!(
            r#"
            SELECT {LIST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        ))
        .bind(author_id)
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, content, author_id, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Post>> {
        sqlx::query_as::<_, Post>(
            r#"
            DELETE FROM posts
            WHERE id = $1
            RETURNING id, content, author_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
