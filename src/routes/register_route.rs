use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

use crate::extractors::auth_extractor::AuthUser;
use crate::models::user::{UniqueViolation, User};
use crate::structs::register_user::RegisterUser;
use crate::utils::app_error::AppError;
use crate::utils::flash;
use crate::utils::form::FormErrors;
use crate::utils::register::check_register_infos;
use crate::views;
use crate::AppState;

fn render_register_page(jar: CookieJar, register_user: &RegisterUser, errors: &FormErrors) -> Response {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(views::auth::register_page(&flashes, register_user, errors)),
    )
        .into_response()
}

pub async fn register_page_route(AuthUser(auth_user): AuthUser, jar: CookieJar) -> Response {
    if auth_user.is_some() {
        return Redirect::to("/index").into_response();
    }
    render_register_page(jar, &RegisterUser::default(), &FormErrors::default())
}

pub async fn register_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    jar: CookieJar,
    Form(mut register_user): Form<RegisterUser>,
) -> Result<Response, AppError> {
    if auth_user.is_some() {
        return Ok(Redirect::to("/index").into_response());
    }

    register_user.username = register_user.username.trim().to_string();
    register_user.email = register_user.email.trim().to_lowercase();

    let mut errors = check_register_infos(&register_user);
    if !errors.is_empty() {
        return Ok(render_register_page(jar, &register_user, &errors));
    }

    if User::username_taken(&app_state.pool, &register_user.username).await? {
        warn!("Username `{}` already used", register_user.username);
        errors.add("username", UniqueViolation::Username.message());
    }
    if User::email_taken(&app_state.pool, &register_user.email).await? {
        warn!("Email address `{}` already used", register_user.email);
        errors.add("email", UniqueViolation::Email.message());
    }
    if !errors.is_empty() {
        return Ok(render_register_page(jar, &register_user, &errors));
    }

    let user = match User::create(
        &app_state.pool,
        &register_user.username,
        &register_user.email,
        &register_user.password,
    )
    .await?
    {
        Ok(user) => user,
        Err(violation) => {
            warn!(
                "Registration of @{} lost a race on the {}",
                register_user.username,
                violation.field()
            );
            errors.add(violation.field(), violation.message());
            return Ok(render_register_page(jar, &register_user, &errors));
        }
    };
    info!("New user @{} ({})", user.username, user.id);

    let jar = flash::push(jar, "Congratulations, you are now a registered user!");
    Ok((jar, Redirect::to("/login")).into_response())
}
