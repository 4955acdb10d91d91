use tracing::warn;

use crate::utils::form;

pub const POST_MAX_LENGTH: usize = 140;

/// Check the body of a new post, already trimmed
pub fn check_new_post_data(auth_user_id: i64, body: &str) -> Result<(), String> {
    if body.is_empty() {
        warn!("User {auth_user_id} tried to create an empty post");
        return Err(form::REQUIRED.to_string());
    }

    let length = body.chars().count();
    if length > POST_MAX_LENGTH {
        warn!(
            "User {} tried to create a post with a wrong length : {}/{}",
            auth_user_id, length, POST_MAX_LENGTH
        );
        return Err(form::too_long(POST_MAX_LENGTH));
    }

    Ok(())
}
