pub mod edit_profile_route;
pub mod explore_route;
pub mod follow_user_route;
pub mod index_route;
pub mod login_route;
pub mod not_found_route;
pub mod register_route;
pub mod reset_password_route;
pub mod user_route;
