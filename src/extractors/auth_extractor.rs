use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, Method},
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::{
    models::user::User,
    utils::{app_error::AppError, session::SESSION_COOKIE, token::Token},
    AppState,
};

/// User of the session cookie, if any. Loading it records the visit.
pub struct AuthUser(pub Option<Arc<User>>);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        let cookies = CookieJar::from_headers(&parts.headers);
        let Some(token) = cookies.get(SESSION_COOKIE) else {
            return Ok(AuthUser(None));
        };

        // A stale or forged cookie only means the visitor is anonymous
        let Ok(sub) = Token::decode(token.value(), &app_state.cipher) else {
            return Ok(AuthUser(None));
        };
        let user_id = match sub.parse::<i64>() {
            Ok(user_id) => user_id,
            Err(e) => {
                warn!("Session token with an invalid subject `{sub}` : {e}");
                return Ok(AuthUser(None));
            }
        };

        let user = User::touch_last_seen(&app_state.pool, user_id).await?;
        Ok(AuthUser(user.map(Arc::new)))
    }
}

/// Logged in user, anonymous visitors are sent to the login form
pub struct LoggedUser(pub Arc<User>);

#[async_trait]
impl<S> FromRequestParts<S> for LoggedUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(auth_user) = AuthUser::from_request_parts(parts, state).await?;
        match auth_user {
            Some(user) => Ok(LoggedUser(user)),
            None => {
                // The login form redirects with a GET, only pages can be resumed
                let next = if parts.method == Method::GET {
                    parts
                        .uri
                        .path_and_query()
                        .map(|path_and_query| path_and_query.as_str())
                        .unwrap_or("/")
                } else {
                    "/index"
                };
                Err(AppError::you_have_to_be_connected_to_perform_this_action_error(
                    next,
                    CookieJar::from_headers(&parts.headers),
                ))
            }
        }
    }
}
