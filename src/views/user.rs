use crate::models::post::PostWithAuthor;
use crate::models::user::User;
use crate::structs::edit_profile::EditProfile;
use crate::utils::form::FormErrors;
use crate::utils::pagination::Page;
use crate::views::{escape, form, format_timestamp, layout, post, user_url};

/// What the profile page shows about its user
pub struct Profile<'a> {
    pub user: &'a User,
    pub followers_count: i64,
    pub followed_count: i64,
    /// `None` on one's own profile
    pub is_following: Option<bool>,
    pub posts: &'a Page<PostWithAuthor>,
}

fn follow_button(username: &str, is_following: bool) -> String {
    let (action, label) = if is_following {
        ("unfollow", "Unfollow")
    } else {
        ("follow", "Follow")
    };
    form::post_form(
        &format!("/{}/{}", action, urlencoding::encode(username)),
        &[form::submit(label)],
    )
}

pub fn profile_page(current_user: &User, flashes: &[String], profile: &Profile) -> String {
    let user = profile.user;

    let about_me = user
        .about_me
        .as_deref()
        .filter(|about_me| !about_me.is_empty())
        .map(|about_me| format!("<p>{}</p>", escape(about_me)))
        .unwrap_or_default();

    let action = match profile.is_following {
        None => r#"<p><a href="/edit_profile">Edit your profile</a></p>"#.to_string(),
        Some(is_following) => follow_button(&user.username, is_following),
    };

    let content = format!(
        r#"<table><tr valign="top"><td><img src="{}" alt=""></td><td><h1>User: {}</h1>{}<p>Last seen on: {}</p><p>{} followers, {} following.</p>{}</td></tr></table><hr>{}"#,
        escape(&user.avatar(128)),
        escape(&user.username),
        about_me,
        format_timestamp(user.last_seen),
        profile.followers_count,
        profile.followed_count,
        action,
        post::post_list(profile.posts, &user_url(&user.username)),
    );
    layout::base(&user.username, Some(current_user), flashes, &content)
}

pub fn edit_profile_page(
    current_user: &User,
    flashes: &[String],
    edit_profile: &EditProfile,
    errors: &FormErrors,
) -> String {
    let content = format!(
        "<h1>Edit Profile</h1>{}",
        form::post_form(
            "/edit_profile",
            &[
                form::input(
                    "Username",
                    "username",
                    "text",
                    &edit_profile.username,
                    errors.get("username"),
                ),
                form::textarea(
                    "About me",
                    "about_me",
                    &edit_profile.about_me,
                    errors.get("about_me"),
                ),
                form::submit("Submit"),
            ],
        )
    );
    layout::base("Edit Profile", Some(current_user), flashes, &content)
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn user(username: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            about_me: Some("I <3 Rust".to_string()),
            last_seen: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn empty_page() -> Page<PostWithAuthor> {
        Page {
            items: Vec::new(),
            page: 1,
            has_next: false,
        }
    }

    #[test]
    fn own_profile_links_to_the_edit_form() {
        let john = user("john");
        let posts = empty_page();
        let html = profile_page(
            &john,
            &[],
            &Profile {
                user: &john,
                followers_count: 2,
                followed_count: 1,
                is_following: None,
                posts: &posts,
            },
        );

        assert!(html.contains(r#"<a href="/edit_profile">"#));
        assert!(html.contains("2 followers, 1 following."));
        assert!(html.contains("I &lt;3 Rust"));
        assert!(!html.contains("/follow/"));
    }

    #[test]
    fn other_profiles_show_the_follow_state() {
        let john = user("john");
        let susan = user("susan");
        let posts = empty_page();
        let mut profile = Profile {
            user: &susan,
            followers_count: 0,
            followed_count: 0,
            is_following: Some(false),
            posts: &posts,
        };

        let html = profile_page(&john, &[], &profile);
        assert!(html.contains(r#"action="/follow/susan""#));

        profile.is_following = Some(true);
        let html = profile_page(&john, &[], &profile);
        assert!(html.contains(r#"action="/unfollow/susan""#));
    }
}
