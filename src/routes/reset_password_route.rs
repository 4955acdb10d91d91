use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

use crate::{
    extractors::auth_extractor::AuthUser,
    models::user::User,
    structs::reset_password::{ResetPassword, ResetPasswordRequest},
    utils::{
        app_error::AppError,
        email::send_password_reset_email,
        flash,
        form::FormErrors,
        register::{check_email_address, check_passwords},
    },
    views, AppState,
};

fn render_request_page(
    jar: CookieJar,
    request: &ResetPasswordRequest,
    errors: &FormErrors,
) -> Response {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(views::auth::reset_password_request_page(
            &flashes, request, errors,
        )),
    )
        .into_response()
}

fn render_reset_page(jar: CookieJar, token: &str, errors: &FormErrors) -> Response {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(views::auth::reset_password_page(&flashes, token, errors)),
    )
        .into_response()
}

pub async fn reset_password_request_page_route(
    AuthUser(auth_user): AuthUser,
    jar: CookieJar,
) -> Response {
    if auth_user.is_some() {
        return Redirect::to("/index").into_response();
    }
    render_request_page(
        jar,
        &ResetPasswordRequest::default(),
        &FormErrors::default(),
    )
}

pub async fn reset_password_request_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    jar: CookieJar,
    Form(mut request): Form<ResetPasswordRequest>,
) -> Result<Response, AppError> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/index").into_response());
    }

    request.email = request.email.trim().to_lowercase();
    if let Err(message) = check_email_address(&request.email) {
        let mut errors = FormErrors::default();
        errors.add("email", message);
        return Ok(render_request_page(jar, &request, &errors));
    }

    // Same answer whether the address is known or not
    match User::find_by_email(&app_state.pool, &request.email).await? {
        Some(user) => {
            send_password_reset_email(&app_state, &user)?;
            info!("Password reset requested for @{}", user.username);
        }
        None => warn!("Password reset requested for unknown email `{}`", request.email),
    }

    let jar = flash::push(
        jar,
        "Check your email for the instructions to reset your password",
    );
    Ok((jar, Redirect::to("/login")).into_response())
}

pub async fn reset_password_page_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Path(token): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/index").into_response());
    }

    let user = User::verify_reset_password_token(
        &app_state.pool,
        &token,
        app_state.config.secret_key.as_bytes(),
    )
    .await?;
    if user.is_none() {
        return Ok(Redirect::to("/index").into_response());
    }

    Ok(render_reset_page(jar, &token, &FormErrors::default()))
}

pub async fn reset_password_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Path(token): Path<String>,
    jar: CookieJar,
    Form(reset_password): Form<ResetPassword>,
) -> Result<Response, AppError> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/index").into_response());
    }

    let Some(user) = User::verify_reset_password_token(
        &app_state.pool,
        &token,
        app_state.config.secret_key.as_bytes(),
    )
    .await?
    else {
        return Ok(Redirect::to("/index").into_response());
    };

    let mut errors = FormErrors::default();
    check_passwords(
        &reset_password.password,
        &reset_password.password2,
        &mut errors,
    );
    if !errors.is_empty() {
        return Ok(render_reset_page(jar, &token, &errors));
    }

    user.set_password(&app_state.pool, &reset_password.password)
        .await?;
    info!("@{} reset their password", user.username);

    let jar = flash::push(jar, "Your password has been reset.");
    Ok((jar, Redirect::to("/login")).into_response())
}
