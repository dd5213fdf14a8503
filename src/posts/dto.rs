use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::PostAuthorRow;

/// Request body for creating a post.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

/// Minimal author view embedded in listed posts. Never carries email or
/// any credential material.
#[derive(Debug, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
}

/// A post as returned by the list endpoints.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub author: AuthorView,
}

impl From<PostAuthorRow> for PostResponse {
    fn from(r: PostAuthorRow) -> Self {
        Self {
            id: r.id,
            content: r.content,
            created_at: r.created_at,
            updated_at: r.updated_at,
            author: AuthorView {
                id: r.author_id,
                name: r.author_name,
                bio: r.author_bio,
            },
        }
    }
}

/// Feed pagination: newest-first, optionally only posts strictly older
/// than `before`.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub before: Option<OffsetDateTime>,
}

fn default_limit() -> i64 {
    50
}

impl FeedQuery {
    /// Clamp the client-supplied limit so a hostile or buggy value never
    /// reaches the database as a negative or unbounded LIMIT.
    pub fn clamped_limit(&self) -> i64 {
        self.limit.clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn post_response_nests_author_view() {
        let row = PostAuthorRow {
            id: Uuid::new_v4(),
            content: "hello".into(),
            author_id: Uuid::new_v4(),
            created_at: datetime!(2024-05-01 12:00 UTC),
            updated_at: datetime!(2024-05-01 12:00 UTC),
            author_name: "Ada".into(),
            author_bio: None,
        };
        let author_id = row.author_id;
        let json = serde_json::to_value(PostResponse::from(row)).unwrap();
        assert_eq!(json["author"]["id"], serde_json::json!(author_id));
        assert_eq!(json["author"]["name"], "Ada");
        assert!(json["author"].get("email").is_none());
        assert!(json["author"].get("password_hash").is_none());
    }

    #[test]
    fn feed_query_defaults() {
        let q: FeedQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, 50);
        assert!(q.before.is_none());
    }

    #[test]
    fn feed_limit_is_clamped() {
        let q = |limit| FeedQuery { limit, before: None };
        assert_eq!(q(-1).clamped_limit(), 1);
        assert_eq!(q(0).clamped_limit(), 1);
        assert_eq!(q(50).clamped_limit(), 50);
        assert_eq!(q(100_000).clamped_limit(), 100);
    }
}
