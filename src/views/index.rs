use crate::models::post::PostWithAuthor;
use crate::models::user::User;
use crate::utils::pagination::Page;
use crate::views::{escape, form, layout, post};

/// Home page: the post form above the feed
pub fn index_page(
    user: &User,
    flashes: &[String],
    draft: &str,
    error: Option<&str>,
    posts: &Page<PostWithAuthor>,
) -> String {
    let content = format!(
        "<h1>Hi, {}!</h1>{}{}",
        escape(&user.username),
        form::post_form(
            "/index",
            &[
                form::textarea("Say something", "post", draft, error),
                form::submit("Submit"),
            ],
        ),
        post::post_list(posts, "/index"),
    );
    layout::base("Home", Some(user), flashes, &content)
}

pub fn explore_page(user: &User, flashes: &[String], posts: &Page<PostWithAuthor>) -> String {
    let content = format!("<h1>Explore</h1>{}", post::post_list(posts, "/explore"));
    layout::base("Explore", Some(user), flashes, &content)
}
