use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Html,
};
use axum_extra::extract::CookieJar;

use crate::{
    extractors::auth_extractor::LoggedUser,
    models::{post::Post, user::User},
    utils::{app_error::AppError, flash, pagination::PaginationParams},
    views::{self, user::Profile},
    AppState,
};

pub async fn user_route(
    State(app_state): State<Arc<AppState>>,
    LoggedUser(current_user): LoggedUser,
    Path(username): Path<String>,
    Query(pagination_params): Query<PaginationParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let Some(user) = User::find_by_username(&app_state.pool, &username).await? else {
        return Err(AppError::not_found_error());
    };

    let posts = Post::by_author(
        &app_state.pool,
        user.id,
        pagination_params.page(),
        app_state.config.posts_per_page,
    )
    .await?;
    let followers_count = user.followers_count(&app_state.pool).await?;
    let followed_count = user.followed_count(&app_state.pool).await?;
    let is_following = if user.id == current_user.id {
        None
    } else {
        Some(current_user.is_following(&app_state.pool, &user).await?)
    };

    let (jar, flashes) = flash::take(jar);
    let profile = Profile {
        user: &user,
        followers_count,
        followed_count,
        is_following,
        posts: &posts,
    };
    Ok((
        jar,
        Html(views::user::profile_page(&current_user, &flashes, &profile)),
    ))
}
