use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use tracing::info;

use crate::{
    extractors::auth_extractor::LoggedUser,
    models::post::Post,
    structs::new_post::NewPost,
    utils::{app_error::AppError, flash, pagination::PaginationParams, post::check_new_post_data},
    views, AppState,
};

pub async fn index_route(
    State(app_state): State<Arc<AppState>>,
    LoggedUser(user): LoggedUser,
    Query(pagination_params): Query<PaginationParams>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let posts = user
        .followed_posts(
            &app_state.pool,
            pagination_params.page(),
            app_state.config.posts_per_page,
        )
        .await?;

    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        Html(views::index::index_page(&user, &flashes, "", None, &posts)),
    ))
}

pub async fn publish_post_route(
    State(app_state): State<Arc<AppState>>,
    LoggedUser(user): LoggedUser,
    Query(pagination_params): Query<PaginationParams>,
    jar: CookieJar,
    Form(new_post): Form<NewPost>,
) -> Result<Response, AppError> {
    let body = new_post.post.trim();

    if let Err(error) = check_new_post_data(user.id, body) {
        let posts = user
            .followed_posts(
                &app_state.pool,
                pagination_params.page(),
                app_state.config.posts_per_page,
            )
            .await?;
        let (jar, flashes) = flash::take(jar);
        return Ok((
            jar,
            Html(views::index::index_page(
                &user,
                &flashes,
                &new_post.post,
                Some(&error),
                &posts,
            )),
        )
            .into_response());
    }

    let post = Post::create(&app_state.pool, user.id, body).await?;
    info!(
        "@{} published post {} ({} characters) as user {} at {}",
        user.username,
        post.id,
        post.body.chars().count(),
        post.user_id,
        views::format_timestamp(post.timestamp)
    );

    let jar = flash::push(jar, "Your post is now live!");
    Ok((jar, Redirect::to("/index")).into_response())
}
