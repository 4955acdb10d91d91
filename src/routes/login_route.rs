use std::sync::Arc;

use crate::extractors::auth_extractor::AuthUser;
use crate::models::user::User;
use crate::structs::login_user::{LoginUser, NextParams};
use crate::utils::app_error::AppError;
use crate::utils::flash;
use crate::utils::form::{self, FormErrors};
use crate::utils::redirect::next_or_index;
use crate::utils::session::{login_cookie, logout_cookie};
use crate::views;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

fn render_login_page(
    jar: CookieJar,
    login_user: &LoginUser,
    errors: &FormErrors,
    next: Option<&str>,
) -> Response {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(views::auth::login_page(&flashes, login_user, errors, next)),
    )
        .into_response()
}

pub async fn login_page_route(
    AuthUser(auth_user): AuthUser,
    Query(next_params): Query<NextParams>,
    jar: CookieJar,
) -> Response {
    if auth_user.is_some() {
        return Redirect::to("/index").into_response();
    }
    render_login_page(
        jar,
        &LoginUser::default(),
        &FormErrors::default(),
        next_params.next.as_deref(),
    )
}

pub async fn login_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Query(next_params): Query<NextParams>,
    jar: CookieJar,
    Form(mut login_user): Form<LoginUser>,
) -> Result<Response, AppError> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/index").into_response());
    }

    login_user.username = login_user.username.trim().to_string();

    let mut errors = FormErrors::default();
    if login_user.username.is_empty() {
        errors.add("username", form::REQUIRED);
    }
    if login_user.password.is_empty() {
        errors.add("password", form::REQUIRED);
    }
    if !errors.is_empty() {
        return Ok(render_login_page(
            jar,
            &login_user,
            &errors,
            next_params.next.as_deref(),
        ));
    }

    let user = User::find_by_username(&app_state.pool, &login_user.username)
        .await?
        .filter(|user| user.check_password(&login_user.password));
    let Some(user) = user else {
        warn!("Failed login attempt for @{}", login_user.username);
        let jar = flash::push(jar, "Invalid username or password");
        return Ok((jar, Redirect::to("/login")).into_response());
    };

    let jar = jar.add(login_cookie(
        user.id,
        login_user.remember_me.is_some(),
        &app_state.cipher,
    )?);
    info!("@{} logged in", user.username);

    let next = next_or_index(next_params.next.as_deref());
    Ok((jar, Redirect::to(next)).into_response())
}

pub async fn logout_route(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(logout_cookie()), Redirect::to("/index"))
}
