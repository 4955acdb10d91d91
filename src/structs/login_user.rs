use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
    /// Checkbox, present only when ticked
    pub remember_me: Option<String>,
}

/// Page requested before being sent to the login form
#[derive(Deserialize, Default)]
pub struct NextParams {
    pub next: Option<String>,
}
