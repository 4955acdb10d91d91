use chrono::Duration;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::warn;

use crate::models::post::PostWithAuthor;
use crate::utils::app_error::AppError;
use crate::utils::jwt::{create_reset_password_jwt, decode_reset_password_jwt};
use crate::utils::pagination::Page;
use crate::utils::register::{hash_password, verify_password};

const USER_COLUMNS: &str = "id, username, email, password_hash, about_me, last_seen";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// argon2 PHC string
    pub password_hash: String,
    pub about_me: Option<String>,
    pub last_seen: OffsetDateTime,
}

/// Gravatar identicon for an email address
pub fn gravatar_url(email: &str, size: u32) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{digest:x}?d=identicon&s={size}")
}

fn database_error(context: &str, e: sqlx::Error) -> AppError {
    warn!("Error {context} : {e}");
    AppError::internal_server_error()
}

/// Unique column a write collided with, when another request took the value first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueViolation {
    Username,
    Email,
}

impl UniqueViolation {
    fn from_error(e: &sqlx::Error) -> Option<Self> {
        let db_error = e.as_database_error()?;
        if db_error.code().as_deref() != Some("23505") {
            return None;
        }
        match db_error.constraint() {
            Some("users_username_key") => Some(Self::Username),
            Some("users_email_key") => Some(Self::Email),
            _ => None,
        }
    }

    /// Form field the collision is reported on
    pub fn field(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Username => "Please use a different username.",
            Self::Email => "Please use a different email address.",
        }
    }
}

impl User {
    /// `Ok(Err(_))` when the username or the email address is already used
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Result<User, UniqueViolation>, AppError> {
        let password_hash = hash_password(password)?;
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await;

        match result {
            Ok(user) => Ok(Ok(user)),
            Err(e) => match UniqueViolation::from_error(&e) {
                Some(violation) => Ok(Err(violation)),
                None => Err(database_error(&format!("creating user @{username}"), e)),
            },
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| database_error(&format!("getting user {id}"), e))
    }

    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| database_error(&format!("getting user @{username}"), e))
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| database_error(&format!("getting user with email `{email}`"), e))
    }

    pub async fn username_taken(pool: &PgPool, username: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await
            .map_err(|e| database_error("checking if username already exists", e))
    }

    pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
            .map_err(|e| database_error("checking if email address already exists", e))
    }

    /// Load the user of a session and record the visit
    pub async fn touch_last_seen(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_seen = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| database_error(&format!("updating last seen of user {id}"), e))
    }

    pub async fn set_password(&self, pool: &PgPool, password: &str) -> Result<(), AppError> {
        let password_hash = hash_password(password)?;
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(self.id)
            .execute(pool)
            .await
            .map_err(|e| database_error(&format!("setting password of @{}", self.username), e))?;
        Ok(())
    }

    pub fn check_password(&self, password: &str) -> bool {
        verify_password(&self.password_hash, password)
    }

    pub fn avatar(&self, size: u32) -> String {
        gravatar_url(&self.email, size)
    }

    /// `Ok(Err(_))` when the new username belongs to someone else
    pub async fn update_profile(
        &self,
        pool: &PgPool,
        username: &str,
        about_me: Option<&str>,
    ) -> Result<Result<(), UniqueViolation>, AppError> {
        let result = sqlx::query("UPDATE users SET username = $1, about_me = $2 WHERE id = $3")
            .bind(username)
            .bind(about_me)
            .bind(self.id)
            .execute(pool)
            .await;

        match result {
            Ok(_) => Ok(Ok(())),
            Err(e) => match UniqueViolation::from_error(&e) {
                Some(violation) => Ok(Err(violation)),
                None => Err(database_error(
                    &format!("updating profile of @{}", self.username),
                    e,
                )),
            },
        }
    }

    /// Does nothing when already following `user` or when `user` is `self`
    pub async fn follow(&self, pool: &PgPool, user: &User) -> Result<(), AppError> {
        if self.id == user.id {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO followers (follower_id, followed_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(self.id)
        .bind(user.id)
        .execute(pool)
        .await
        .map_err(|e| {
            database_error(
                &format!("making @{} follow @{}", self.username, user.username),
                e,
            )
        })?;
        Ok(())
    }

    pub async fn unfollow(&self, pool: &PgPool, user: &User) -> Result<(), AppError> {
        sqlx::query("DELETE FROM followers WHERE follower_id = $1 AND followed_id = $2")
            .bind(self.id)
            .bind(user.id)
            .execute(pool)
            .await
            .map_err(|e| {
                database_error(
                    &format!("making @{} unfollow @{}", self.username, user.username),
                    e,
                )
            })?;
        Ok(())
    }

    pub async fn is_following(&self, pool: &PgPool, user: &User) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM followers WHERE follower_id = $1 AND followed_id = $2)",
        )
        .bind(self.id)
        .bind(user.id)
        .fetch_one(pool)
        .await
        .map_err(|e| database_error("checking follow relation", e))
    }

    pub async fn followers_count(&self, pool: &PgPool) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM followers WHERE followed_id = $1")
            .bind(self.id)
            .fetch_one(pool)
            .await
            .map_err(|e| database_error(&format!("counting followers of @{}", self.username), e))
    }

    pub async fn followed_count(&self, pool: &PgPool) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM followers WHERE follower_id = $1")
            .bind(self.id)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                database_error(&format!("counting users followed by @{}", self.username), e)
            })
    }

    /// Own posts and posts of the followed users, newest first
    pub async fn followed_posts(
        &self,
        pool: &PgPool,
        page: i64,
        per_page: i64,
    ) -> Result<Page<PostWithAuthor>, AppError> {
        let rows = sqlx::query_as::<_, PostWithAuthor>(include_str!(
            "../queries/followed_posts.sql"
        ))
        .bind(self.id)
        .bind(Page::<PostWithAuthor>::limit(per_page))
        .bind(Page::<PostWithAuthor>::offset(page, per_page))
        .fetch_all(pool)
        .await
        .map_err(|e| database_error(&format!("getting feed of @{}", self.username), e))?;

        Ok(Page::from_rows(rows, page, per_page))
    }

    pub fn get_reset_password_token(
        &self,
        secret: &[u8],
        expires_in: Duration,
    ) -> Result<String, AppError> {
        create_reset_password_jwt(self.id, secret, expires_in)
    }

    /// The user a reset token was issued for, if the token is still valid
    pub async fn verify_reset_password_token(
        pool: &PgPool,
        token: &str,
        secret: &[u8],
    ) -> Result<Option<User>, AppError> {
        match decode_reset_password_jwt(token, secret) {
            Some(id) => User::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }
}
