use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ResetPassword {
    pub password: String,
    pub password2: String,
}
