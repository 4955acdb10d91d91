use crate::models::user::User;
use crate::views::{escape, user_url};

fn navigation(current_user: Option<&User>) -> String {
    let links = match current_user {
        Some(user) => format!(
            r#"<a href="/index">Home</a> <a href="/explore">Explore</a> <a href="{}">Profile</a> <a href="/logout">Logout</a>"#,
            escape(&user_url(&user.username))
        ),
        None => r#"<a href="/index">Home</a> <a href="/login">Login</a>"#.to_string(),
    };
    format!(r#"<nav><a class="brand" href="/index">Microblog</a> {links}</nav>"#)
}

fn flash_messages(flashes: &[String]) -> String {
    if flashes.is_empty() {
        return String::new();
    }
    let items: String = flashes
        .iter()
        .map(|message| format!(r#"<li class="flash">{}</li>"#, escape(message)))
        .collect();
    format!("<ul>{items}</ul>")
}

/// Page skeleton shared by every view
pub fn base(title: &str, current_user: Option<&User>, flashes: &[String], content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{} - Microblog</title>
</head>
<body>
{}
<main>
{}
{}
</main>
</body>
</html>
"#,
        escape(title),
        navigation(current_user),
        flash_messages(flashes),
        content
    )
}
