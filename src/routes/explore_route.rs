use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};
use axum_extra::extract::CookieJar;

use crate::{
    extractors::auth_extractor::LoggedUser,
    models::post::Post,
    utils::{app_error::AppError, flash, pagination::PaginationParams},
    views, AppState,
};

pub async fn explore_route(
    State(app_state): State<Arc<AppState>>,
    LoggedUser(user): LoggedUser,
    Query(pagination_params): Query<PaginationParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let posts = Post::all(
        &app_state.pool,
        pagination_params.page(),
        app_state.config.posts_per_page,
    )
    .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((jar, Html(views::index::explore_page(&user, &flashes, &posts))))
}
