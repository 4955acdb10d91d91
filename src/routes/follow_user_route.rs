use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

use crate::{
    extractors::auth_extractor::LoggedUser,
    models::user::User,
    utils::{app_error::AppError, flash},
    views::user_url,
    AppState,
};

pub async fn follow_user_route(
    State(app_state): State<Arc<AppState>>,
    LoggedUser(auth_user): LoggedUser,
    Path(username): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let Some(user) = User::find_by_username(&app_state.pool, &username).await? else {
        warn!("@{} tried to follow unknown user @{username}", auth_user.username);
        let jar = flash::push(jar, format!("User {username} not found."));
        return Ok((jar, Redirect::to("/index")));
    };

    if user.id == auth_user.id {
        let jar = flash::push(jar, "You cannot follow yourself!");
        return Ok((jar, Redirect::to(&user_url(&username))));
    }

    auth_user.follow(&app_state.pool, &user).await?;
    info!("@{} follows @{}", auth_user.username, user.username);

    let jar = flash::push(jar, format!("You are following {username}!"));
    Ok((jar, Redirect::to(&user_url(&username))))
}

pub async fn unfollow_user_route(
    State(app_state): State<Arc<AppState>>,
    LoggedUser(auth_user): LoggedUser,
    Path(username): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let Some(user) = User::find_by_username(&app_state.pool, &username).await? else {
        warn!("@{} tried to unfollow unknown user @{username}", auth_user.username);
        let jar = flash::push(jar, format!("User {username} not found."));
        return Ok((jar, Redirect::to("/index")));
    };

    if user.id == auth_user.id {
        let jar = flash::push(jar, "You cannot unfollow yourself!");
        return Ok((jar, Redirect::to(&user_url(&username))));
    }

    auth_user.unfollow(&app_state.pool, &user).await?;
    info!("@{} unfollowed @{}", auth_user.username, user.username);

    let jar = flash::push(jar, format!("You have unfollowed {username}."));
    Ok((jar, Redirect::to(&user_url(&username))))
}
