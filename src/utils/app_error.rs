use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use hyper::StatusCode;

use crate::utils::flash;
use crate::views::error::error_page;

/// Error returned by the routes, rendered as an HTML error page
/// or, for pages that need a session, as a redirection to the login form
#[derive(Debug)]
pub struct AppError {
    status_code: StatusCode,
    message: Option<String>,
    /// Location and the request cookies, queued flash messages included
    login_redirect: Option<(String, CookieJar)>,
}

impl AppError {
    pub fn new(status_code: StatusCode, message: Option<&str>) -> Self {
        Self {
            status_code,
            message: message.map(str::to_string),
            login_redirect: None,
        }
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, None)
    }

    pub fn not_found_error() -> Self {
        Self::new(StatusCode::NOT_FOUND, None)
    }

    /// Send the visitor to the login form, coming back to `next` once logged in.
    /// The message is queued after the flash messages already in `jar`.
    pub fn you_have_to_be_connected_to_perform_this_action_error(
        next: &str,
        jar: CookieJar,
    ) -> Self {
        let message = "Please log in to access this page.";
        Self {
            status_code: StatusCode::SEE_OTHER,
            message: Some(message.to_string()),
            login_redirect: Some((
                format!("/login?next={}", urlencoding::encode(next)),
                flash::push(jar, message),
            )),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some((location, jar)) = self.login_redirect {
            return (jar, Redirect::to(&location)).into_response();
        }

        (
            self.status_code,
            Html(error_page(self.status_code, self.message.as_deref())),
        )
            .into_response()
    }
}
