use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Duration;
use libaes::Cipher;

use crate::utils::app_error::AppError;
use crate::utils::token::Token;

pub const SESSION_COOKIE: &str = "session";

const REMEMBER_ME_DAYS: i64 = 365;
const SESSION_DAYS: i64 = 31;

/// Cookie logging in the user `user_id`, kept after the browser closes when `remember` is set
pub fn login_cookie(
    user_id: i64,
    remember: bool,
    cipher: &Cipher,
) -> Result<Cookie<'static>, AppError> {
    let days = if remember { REMEMBER_ME_DAYS } else { SESSION_DAYS };
    let token = Token::create(user_id.to_string(), Duration::days(days), cipher)?;

    let mut cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    if remember {
        cookie.set_max_age(time::Duration::days(REMEMBER_ME_DAYS));
    }
    Ok(cookie)
}

pub fn logout_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "").path("/").finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_me_makes_the_cookie_persistent() {
        let cipher = Cipher::new_256(b"0123456789abcdef0123456789abcdef");

        let persistent = login_cookie(3, true, &cipher).unwrap();
        assert_eq!(persistent.max_age(), Some(time::Duration::days(365)));
        assert_eq!(Token::decode(persistent.value(), &cipher).unwrap(), "3");

        let session = login_cookie(3, false, &cipher).unwrap();
        assert_eq!(session.max_age(), None);
        assert_eq!(session.http_only(), Some(true));
        assert_eq!(session.path(), Some("/"));
    }
}
