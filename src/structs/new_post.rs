use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct NewPost {
    pub post: String,
}
