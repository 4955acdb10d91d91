use crate::models::post::PostWithAuthor;
use crate::utils::pagination::Page;
use crate::views::{escape, format_timestamp, user_url};

fn post_row(post: &PostWithAuthor) -> String {
    let author_url = escape(&user_url(&post.author_username));
    format!(
        r#"<tr id="post-{}" valign="top"><td><a href="{author_url}"><img src="{}" alt=""></a></td><td><a href="{author_url}">{}</a> said {}:<br>{}</td></tr>"#,
        post.id,
        escape(&post.author_avatar(36)),
        escape(&post.author_username),
        format_timestamp(post.timestamp),
        escape(&post.body),
    )
}

/// Posts of a page followed by the links to the newer and older pages.
/// `base_url` is the path of the listing, without query string.
pub fn post_list(posts: &Page<PostWithAuthor>, base_url: &str) -> String {
    let rows: String = posts.items.iter().map(post_row).collect();

    let mut navigation = String::new();
    if posts.has_prev() {
        navigation.push_str(&format!(
            r#"<a href="{}?page={}">Newer posts</a> "#,
            escape(base_url),
            posts.page - 1
        ));
    }
    if posts.has_next {
        navigation.push_str(&format!(
            r#"<a href="{}?page={}">Older posts</a>"#,
            escape(base_url),
            posts.page + 1
        ));
    }

    format!("<table>{rows}</table><p>{navigation}</p>")
}
