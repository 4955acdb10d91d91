use crate::models::user::User;
use crate::views::escape;

pub fn reset_password_text(user: &User, url: &str) -> String {
    format!(
        "Dear {},\n\n\
         To reset your password click on the following link:\n\n\
         {}\n\n\
         If you have not requested a password reset simply ignore this message.\n\n\
         Sincerely,\n\n\
         The Microblog Team\n",
        user.username, url
    )
}

pub fn reset_password_html(user: &User, url: &str) -> String {
    format!(
        r#"<p>Dear {},</p><p>To reset your password <a href="{url}">click here</a>.</p><p>Alternatively, you can paste the following link in your browser's address bar:</p><p>{url}</p><p>If you have not requested a password reset simply ignore this message.</p><p>Sincerely,</p><p>The Microblog Team</p>"#,
        escape(&user.username),
        url = escape(url),
    )
}
