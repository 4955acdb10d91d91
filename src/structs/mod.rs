pub mod edit_profile;
pub mod login_user;
pub mod new_post;
pub mod register_user;
pub mod reset_password;
