use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

pub const FLASH_COOKIE: &str = "flash";

/// Queue a message displayed by the next rendered page
pub fn push(jar: CookieJar, message: impl Into<String>) -> CookieJar {
    let mut messages = read(&jar);
    messages.push(message.into());
    jar.add(flash_cookie(&messages))
}

/// Consume the queued messages
pub fn take(jar: CookieJar) -> (CookieJar, Vec<String>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }
    let messages = read(&jar);
    (jar.remove(removal_cookie()), messages)
}

fn read(jar: &CookieJar) -> Vec<String> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };
    let decoded = match urlencoding::decode(cookie.value()) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Error decoding flash cookie : {e}");
            return Vec::new();
        }
    };
    serde_json::from_str(&decoded).unwrap_or_else(|e| {
        warn!("Error deserializing flash messages `{decoded}` : {e}");
        Vec::new()
    })
}

fn flash_cookie(messages: &[String]) -> Cookie<'static> {
    let value = serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string());
    Cookie::build(FLASH_COOKIE, urlencoding::encode(&value).into_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, "").path("/").finish()
}
