use crate::structs::login_user::LoginUser;
use crate::structs::register_user::RegisterUser;
use crate::structs::reset_password::ResetPasswordRequest;
use crate::utils::form::FormErrors;
use crate::views::{form, layout};

pub fn login_page(
    flashes: &[String],
    login_user: &LoginUser,
    errors: &FormErrors,
    next: Option<&str>,
) -> String {
    let action = match next {
        Some(next) => format!("/login?next={}", urlencoding::encode(next)),
        None => "/login".to_string(),
    };
    let content = format!(
        r#"<h1>Sign In</h1>{}<p>New User? <a href="/register">Click to Register!</a></p><p>Forgot Your Password? <a href="/reset_password_request">Click to Reset It</a></p>"#,
        form::post_form(
            &action,
            &[
                form::input(
                    "Username",
                    "username",
                    "text",
                    &login_user.username,
                    errors.get("username"),
                ),
                form::input("Password", "password", "password", "", errors.get("password")),
                form::checkbox("Remember Me", "remember_me", login_user.remember_me.is_some()),
                form::submit("Sign In"),
            ],
        )
    );
    layout::base("Sign In", None, flashes, &content)
}

pub fn register_page(flashes: &[String], register_user: &RegisterUser, errors: &FormErrors) -> String {
    let content = format!(
        "<h1>Register</h1>{}",
        form::post_form(
            "/register",
            &[
                form::input(
                    "Username",
                    "username",
                    "text",
                    &register_user.username,
                    errors.get("username"),
                ),
                form::input(
                    "Email",
                    "email",
                    "email",
                    &register_user.email,
                    errors.get("email"),
                ),
                form::input("Password", "password", "password", "", errors.get("password")),
                form::input(
                    "Repeat Password",
                    "password2",
                    "password",
                    "",
                    errors.get("password2"),
                ),
                form::submit("Register"),
            ],
        )
    );
    layout::base("Register", None, flashes, &content)
}

pub fn reset_password_request_page(
    flashes: &[String],
    request: &ResetPasswordRequest,
    errors: &FormErrors,
) -> String {
    let content = format!(
        "<h1>Reset Password</h1>{}",
        form::post_form(
            "/reset_password_request",
            &[
                form::input("Email", "email", "email", &request.email, errors.get("email")),
                form::submit("Request Password Reset"),
            ],
        )
    );
    layout::base("Reset Password", None, flashes, &content)
}

/// `token` is the one carried by the emailed link
pub fn reset_password_page(flashes: &[String], token: &str, errors: &FormErrors) -> String {
    let content = format!(
        "<h1>Reset Your Password</h1>{}",
        form::post_form(
            &format!("/reset_password/{}", urlencoding::encode(token)),
            &[
                form::input("Password", "password", "password", "", errors.get("password")),
                form::input(
                    "Repeat Password",
                    "password2",
                    "password",
                    "",
                    errors.get("password2"),
                ),
                form::submit("Request Password Reset"),
            ],
        )
    );
    layout::base("Reset Password", None, flashes, &content)
}
