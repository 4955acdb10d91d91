use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct EditProfile {
    pub username: String,
    pub about_me: String,
}
