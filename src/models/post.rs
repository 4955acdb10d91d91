use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::warn;

use crate::models::user::gravatar_url;
use crate::utils::app_error::AppError;
use crate::utils::pagination::Page;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub body: String,
    pub timestamp: OffsetDateTime,
    pub user_id: i64,
}

/// A post as listed on the pages, with what is displayed of its author
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
    pub id: i64,
    pub body: String,
    pub timestamp: OffsetDateTime,
    pub author_username: String,
    pub author_email: String,
}

impl PostWithAuthor {
    pub fn author_avatar(&self, size: u32) -> String {
        gravatar_url(&self.author_email, size)
    }
}

const POST_WITH_AUTHOR_SELECT: &str = "SELECT posts.id, posts.body, posts.timestamp, users.username AS author_username, users.email AS author_email FROM posts JOIN users ON users.id = posts.user_id";

impl Post {
    pub async fn create(pool: &PgPool, author_id: i64, body: &str) -> Result<Post, AppError> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (body, user_id) VALUES ($1, $2) RETURNING id, body, timestamp, user_id",
        )
        .bind(body)
        .bind(author_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            warn!("Error inserting post with author {author_id} : {e}");
            AppError::internal_server_error()
        })
    }

    pub async fn by_author(
        pool: &PgPool,
        user_id: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Page<PostWithAuthor>, AppError> {
        let rows = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "{POST_WITH_AUTHOR_SELECT} WHERE posts.user_id = $1 ORDER BY posts.timestamp DESC, posts.id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(Page::<PostWithAuthor>::limit(per_page))
        .bind(Page::<PostWithAuthor>::offset(page, per_page))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            warn!("Error getting posts of user {user_id} : {e}");
            AppError::internal_server_error()
        })?;

        Ok(Page::from_rows(rows, page, per_page))
    }

    pub async fn all(
        pool: &PgPool,
        page: i64,
        per_page: i64,
    ) -> Result<Page<PostWithAuthor>, AppError> {
        let rows = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "{POST_WITH_AUTHOR_SELECT} ORDER BY posts.timestamp DESC, posts.id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(Page::<PostWithAuthor>::limit(per_page))
        .bind(Page::<PostWithAuthor>::offset(page, per_page))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            warn!("Error getting posts : {e}");
            AppError::internal_server_error()
        })?;

        Ok(Page::from_rows(rows, page, per_page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;

    #[sqlx::test(migrations = "./migrations")]
    async fn listings_are_newest_first(pool: PgPool) {
        let john = User::create(&pool, "john", "john@example.com", "cat")
            .await
            .unwrap()
            .unwrap();
        let susan = User::create(&pool, "susan", "susan@example.com", "cat")
            .await
            .unwrap()
            .unwrap();

        let first = Post::create(&pool, john.id, "first").await.unwrap();
        let second = Post::create(&pool, susan.id, "second").await.unwrap();
        let third = Post::create(&pool, john.id, "third").await.unwrap();
        assert_eq!(first.user_id, john.id);

        let all = Post::all(&pool, 1, 2).await.unwrap();
        assert_eq!(
            all.items.iter().map(|post| post.id).collect::<Vec<_>>(),
            vec![third.id, second.id]
        );
        assert!(all.has_next);

        let by_john = Post::by_author(&pool, john.id, 1, 10).await.unwrap();
        assert_eq!(
            by_john.items.iter().map(|post| post.id).collect::<Vec<_>>(),
            vec![third.id, first.id]
        );
        assert!(by_john
            .items
            .iter()
            .all(|post| post.author_username == "john"));
        assert!(!by_john.has_next);
    }
}
