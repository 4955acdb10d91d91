mod config;
mod extractors;
mod middleware;
mod models;
mod routes;
mod structs;
mod utils;
mod views;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use libaes::Cipher;
use lettre::SmtpTransport;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::{Config, ConfigError};
use crate::middleware::logger_middleware::logger_middleware;
use crate::routes::edit_profile_route::{edit_profile_page_route, edit_profile_route};
use crate::routes::explore_route::explore_route;
use crate::routes::follow_user_route::{follow_user_route, unfollow_user_route};
use crate::routes::index_route::{index_route, publish_post_route};
use crate::routes::login_route::{login_page_route, login_route, logout_route};
use crate::routes::not_found_route::not_found_route;
use crate::routes::register_route::{register_page_route, register_route};
use crate::routes::reset_password_route::{
    reset_password_page_route, reset_password_request_page_route, reset_password_request_route,
    reset_password_route,
};
use crate::routes::user_route::user_route;
use crate::utils::email::build_smtp_client;

pub struct AppState {
    pool: PgPool,
    smtp_client: Option<SmtpTransport>,
    cipher: Arc<Cipher>,
    config: Config,
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration error : {0}")]
    Config(#[from] ConfigError),
    #[error("database error : {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error : {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("SMTP error : {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("server error : {0}")]
    Server(#[from] hyper::Error),
}

/// Every path answers unsupported methods with the 404 page
fn app(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(index_route)
                .post(publish_post_route)
                .fallback(not_found_route),
        )
        .route(
            "/index",
            get(index_route)
                .post(publish_post_route)
                .fallback(not_found_route),
        )
        .route("/explore", get(explore_route).fallback(not_found_route))
        .route(
            "/login",
            get(login_page_route)
                .post(login_route)
                .fallback(not_found_route),
        )
        .route("/logout", get(logout_route).fallback(not_found_route))
        .route(
            "/register",
            get(register_page_route)
                .post(register_route)
                .fallback(not_found_route),
        )
        .route("/user/:username", get(user_route).fallback(not_found_route))
        .route(
            "/edit_profile",
            get(edit_profile_page_route)
                .post(edit_profile_route)
                .fallback(not_found_route),
        )
        .route(
            "/follow/:username",
            post(follow_user_route).fallback(not_found_route),
        )
        .route(
            "/unfollow/:username",
            post(unfollow_user_route).fallback(not_found_route),
        )
        .route(
            "/reset_password_request",
            get(reset_password_request_page_route)
                .post(reset_password_request_route)
                .fallback(not_found_route),
        )
        .route(
            "/reset_password/:token",
            get(reset_password_page_route)
                .post(reset_password_route)
                .fallback(not_found_route),
        )
        .fallback(not_found_route)
        .layer(axum_middleware::from_fn(logger_middleware))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let smtp_client = build_smtp_client(&config.mail)?;
    match &smtp_client {
        Some(smtp_client) => match smtp_client.test_connection() {
            Ok(true) => info!("SMTP connection established"),
            Ok(false) => warn!("SMTP server not reachable, emails may be lost"),
            Err(e) => warn!("SMTP connection test failed : {e}"),
        },
        None => info!("MAIL_SERVER not set, emails will only be logged"),
    }

    let bind_address = config.bind_address;
    let app_state = Arc::new(AppState {
        pool,
        smtp_client,
        cipher: Arc::new(Cipher::new_256(&config.encoding_key)),
        config,
    });

    info!("Listening on {bind_address}");
    axum::Server::bind(&bind_address)
        .serve(app(app_state).into_make_service())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::body::Body;
    use axum_extra::extract::CookieJar;
    use hyper::{header, HeaderMap, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::models::user::User;
    use crate::utils::flash::{self, FLASH_COOKIE};
    use crate::utils::session::{login_cookie, SESSION_COOKIE};

    fn test_state(pool: PgPool) -> Arc<AppState> {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://microblog@localhost/microblog"),
            ("ENCODING_KEY", "0123456789abcdef0123456789abcdef"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|value| value.to_string()))
            .unwrap();

        Arc::new(AppState {
            pool,
            smtp_client: None,
            cipher: Arc::new(Cipher::new_256(&config.encoding_key)),
            config,
        })
    }

    fn test_app() -> Router {
        // Never connected: the requests sent to this app are answered before any query
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://microblog@localhost/microblog")
            .unwrap();
        app(test_state(pool))
    }

    fn session_cookie(app_state: &AppState, user: &User) -> String {
        let cookie = login_cookie(user.id, false, &app_state.cipher).unwrap();
        format!("{SESSION_COOKIE}={}", cookie.value())
    }

    fn form_request(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request.body(Body::empty()).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    fn set_cookies(response: &axum::response::Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    /// Flash messages the browser would send back after this response
    fn queued_flashes(response: &axum::response::Response) -> Vec<String> {
        let mut headers = HeaderMap::new();
        for cookie in set_cookies(response) {
            let pair = cookie.split(';').next().unwrap().to_string();
            headers.append(header::COOKIE, pair.parse().unwrap());
        }
        let (_, messages) = flash::take(CookieJar::from_headers(&headers));
        messages
    }

    fn flash_cookie_with(message: &str) -> String {
        let jar = flash::push(CookieJar::new(), message);
        let value = jar.get(FLASH_COOKIE).unwrap().value().to_string();
        format!("{FLASH_COOKIE}={value}")
    }

    #[tokio::test]
    async fn login_form_is_shown_to_visitors() {
        let response = test_app()
            .oneshot(get_request("/login", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<h1>Sign In</h1>"));
        assert!(body.contains(r#"action="/login""#));
    }

    #[tokio::test]
    async fn login_form_keeps_the_requested_page() {
        let response = test_app()
            .oneshot(get_request("/login?next=%2Fexplore", None))
            .await
            .unwrap();

        let body = body_text(response).await;
        assert!(body.contains(r#"action="/login?next=%2Fexplore""#));
    }

    #[tokio::test]
    async fn pages_needing_a_session_redirect_to_login() {
        let response = test_app()
            .oneshot(get_request("/index", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Findex");
        assert_eq!(
            queued_flashes(&response),
            vec!["Please log in to access this page.".to_string()]
        );
    }

    #[tokio::test]
    async fn login_redirect_keeps_pending_flashes() {
        let cookie = flash_cookie_with("Your changes have been saved.");
        let response = test_app()
            .oneshot(get_request("/explore", Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(location(&response), "/login?next=%2Fexplore");
        assert_eq!(
            queued_flashes(&response),
            vec![
                "Your changes have been saved.".to_string(),
                "Please log in to access this page.".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn follow_needs_a_session() {
        let response = test_app()
            .oneshot(form_request("/follow/susan", None, ""))
            .await
            .unwrap();

        // The login form comes back with a GET, which /follow does not answer
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?next=%2Findex");
    }

    #[tokio::test]
    async fn unsupported_methods_get_the_not_found_page() {
        let response = test_app()
            .oneshot(get_request("/follow/susan", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response)
            .await
            .contains("<h1>File Not Found</h1>"));

        let response = test_app()
            .oneshot(form_request("/logout", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn forged_session_cookie_is_anonymous() {
        let response = test_app()
            .oneshot(get_request("/login", Some("session=Zm9yZ2Vk")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn flash_messages_are_shown_once() {
        let cookie = flash_cookie_with("Invalid username or password");
        let response = test_app()
            .oneshot(get_request("/login", Some(&cookie)))
            .await
            .unwrap();

        let cookies = set_cookies(&response);
        assert!(cookies
            .iter()
            .any(|cookie| cookie.starts_with(&format!("{FLASH_COOKIE}=;"))));
        let body = body_text(response).await;
        assert!(body.contains(r#"<li class="flash">Invalid username or password</li>"#));
    }

    #[tokio::test]
    async fn empty_login_form_is_rejected() {
        let response = test_app()
            .oneshot(form_request("/login", None, "username=+&password="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("[This field is required.]"));
    }

    #[tokio::test]
    async fn registration_with_different_passwords_is_rejected() {
        let response = test_app()
            .oneshot(form_request(
                "/register",
                None,
                "username=susan&email=susan%40example.com&password=cat&password2=dog",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("[Field must be equal to password.]"));
        assert!(body.contains(r#"value="susan@example.com""#));
        assert!(!body.contains(r#"value="cat""#));
    }

    #[tokio::test]
    async fn invalid_reset_link_goes_home() {
        let response = test_app()
            .oneshot(get_request("/reset_password/not-a-token", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/index");
    }

    #[tokio::test]
    async fn logout_goes_home() {
        let response = test_app()
            .oneshot(get_request("/logout", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/index");
    }

    #[tokio::test]
    async fn unknown_pages_are_not_found() {
        let response = test_app()
            .oneshot(get_request("/does/not/exist", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_text(response).await;
        assert!(body.contains("<h1>File Not Found</h1>"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn registered_user_can_log_in(pool: PgPool) {
        let app_state = test_state(pool);

        let response = app(app_state.clone())
            .oneshot(form_request(
                "/register",
                None,
                "username=+susan+&email=Susan%40Example.com&password=cat&password2=cat",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
        assert_eq!(
            queued_flashes(&response),
            vec!["Congratulations, you are now a registered user!".to_string()]
        );

        let user = User::find_by_username(&app_state.pool, "susan")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.email, "susan@example.com");

        let response = app(app_state.clone())
            .oneshot(form_request(
                "/login?next=%2Fexplore",
                None,
                "username=+susan+&password=cat",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/explore");
        assert!(set_cookies(&response)
            .iter()
            .any(|cookie| cookie.starts_with(&format!("{SESSION_COOKIE}="))));

        let response = app(app_state)
            .oneshot(form_request("/login", None, "username=susan&password=dog"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/login");
        assert_eq!(
            queued_flashes(&response),
            vec!["Invalid username or password".to_string()]
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn taken_username_is_reported_on_the_form(pool: PgPool) {
        let app_state = test_state(pool);
        User::create(&app_state.pool, "susan", "susan@example.com", "cat")
            .await
            .unwrap()
            .unwrap();

        let response = app(app_state)
            .oneshot(form_request(
                "/register",
                None,
                "username=susan&email=other%40example.com&password=cat&password2=cat",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("[Please use a different username.]"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn published_post_shows_on_the_index(pool: PgPool) {
        let app_state = test_state(pool);
        let john = User::create(&app_state.pool, "john", "john@example.com", "cat")
            .await
            .unwrap()
            .unwrap();
        let cookie = session_cookie(&app_state, &john);

        let response = app(app_state.clone())
            .oneshot(form_request("/index", Some(&cookie), "post=Hello+%3Cworld%3E"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/index");
        assert_eq!(
            queued_flashes(&response),
            vec!["Your post is now live!".to_string()]
        );

        let response = app(app_state.clone())
            .oneshot(get_request("/index", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Hello &lt;world&gt;"));

        let response = app(app_state)
            .oneshot(form_request("/index", Some(&cookie), "post=+"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response)
            .await
            .contains("[This field is required.]"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn following_goes_through_the_profile(pool: PgPool) {
        let app_state = test_state(pool);
        let john = User::create(&app_state.pool, "john", "john@example.com", "cat")
            .await
            .unwrap()
            .unwrap();
        let susan = User::create(&app_state.pool, "susan", "susan@example.com", "cat")
            .await
            .unwrap()
            .unwrap();
        let cookie = session_cookie(&app_state, &john);

        let response = app(app_state.clone())
            .oneshot(form_request("/follow/susan", Some(&cookie), ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/user/susan");
        assert_eq!(
            queued_flashes(&response),
            vec!["You are following susan!".to_string()]
        );
        assert!(john.is_following(&app_state.pool, &susan).await.unwrap());

        let response = app(app_state.clone())
            .oneshot(form_request("/follow/john", Some(&cookie), ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/user/john");
        assert_eq!(
            queued_flashes(&response),
            vec!["You cannot follow yourself!".to_string()]
        );
        assert_eq!(john.followed_count(&app_state.pool).await.unwrap(), 1);

        let response = app(app_state.clone())
            .oneshot(form_request("/follow/nobody", Some(&cookie), ""))
            .await
            .unwrap();
        assert_eq!(location(&response), "/index");
        assert_eq!(
            queued_flashes(&response),
            vec!["User nobody not found.".to_string()]
        );

        for _ in 0..2 {
            let response = app(app_state.clone())
                .oneshot(form_request("/unfollow/susan", Some(&cookie), ""))
                .await
                .unwrap();
            assert_eq!(location(&response), "/user/susan");
            assert_eq!(
                queued_flashes(&response),
                vec!["You have unfollowed susan.".to_string()]
            );
        }
        assert!(!john.is_following(&app_state.pool, &susan).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn reset_link_sets_a_new_password(pool: PgPool) {
        let app_state = test_state(pool);
        let john = User::create(&app_state.pool, "john", "john@example.com", "cat")
            .await
            .unwrap()
            .unwrap();
        let token = john
            .get_reset_password_token(
                app_state.config.secret_key.as_bytes(),
                chrono::Duration::seconds(600),
            )
            .unwrap();

        let response = app(app_state.clone())
            .oneshot(form_request(
                &format!("/reset_password/{token}"),
                None,
                "password=dog&password2=dog",
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/login");
        assert_eq!(
            queued_flashes(&response),
            vec!["Your password has been reset.".to_string()]
        );

        let john = User::find_by_id(&app_state.pool, john.id)
            .await
            .unwrap()
            .unwrap();
        assert!(john.check_password("dog"));
    }
}
