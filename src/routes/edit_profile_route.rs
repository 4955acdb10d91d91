use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

use crate::{
    extractors::auth_extractor::LoggedUser,
    models::user::{UniqueViolation, User},
    structs::edit_profile::EditProfile,
    utils::{
        app_error::AppError,
        flash,
        form::FormErrors,
        register::{check_about_me, check_username},
    },
    views, AppState,
};

fn render_edit_profile_page(
    jar: CookieJar,
    user: &User,
    edit_profile: &EditProfile,
    errors: &FormErrors,
) -> Response {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Html(views::user::edit_profile_page(
            user,
            &flashes,
            edit_profile,
            errors,
        )),
    )
        .into_response()
}

pub async fn edit_profile_page_route(LoggedUser(user): LoggedUser, jar: CookieJar) -> Response {
    let edit_profile = EditProfile {
        username: user.username.clone(),
        about_me: user.about_me.clone().unwrap_or_default(),
    };
    render_edit_profile_page(jar, &user, &edit_profile, &FormErrors::default())
}

pub async fn edit_profile_route(
    State(app_state): State<Arc<AppState>>,
    LoggedUser(user): LoggedUser,
    jar: CookieJar,
    Form(mut edit_profile): Form<EditProfile>,
) -> Result<Response, AppError> {
    edit_profile.username = edit_profile.username.trim().to_string();
    edit_profile.about_me = edit_profile.about_me.trim().to_string();

    let mut errors = FormErrors::default();
    if let Err(message) = check_username(&edit_profile.username) {
        errors.add("username", message);
    }
    if let Err(message) = check_about_me(&edit_profile.about_me) {
        errors.add("about_me", message);
    }
    if errors.is_empty()
        && edit_profile.username != user.username
        && User::username_taken(&app_state.pool, &edit_profile.username).await?
    {
        warn!(
            "@{} tried to take the username `{}`",
            user.username, edit_profile.username
        );
        errors.add("username", UniqueViolation::Username.message());
    }
    if !errors.is_empty() {
        return Ok(render_edit_profile_page(jar, &user, &edit_profile, &errors));
    }

    let about_me = Some(edit_profile.about_me.as_str()).filter(|about_me| !about_me.is_empty());
    if let Err(violation) = user
        .update_profile(&app_state.pool, &edit_profile.username, about_me)
        .await?
    {
        warn!(
            "@{} lost the username `{}` to another account",
            user.username, edit_profile.username
        );
        errors.add(violation.field(), violation.message());
        return Ok(render_edit_profile_page(jar, &user, &edit_profile, &errors));
    }
    info!("@{} updated their profile", edit_profile.username);

    let jar = flash::push(jar, "Your changes have been saved.");
    Ok((jar, Redirect::to("/edit_profile")).into_response())
}
