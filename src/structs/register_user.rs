use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}
