//! Server-rendered HTML.
//!
//! Every page is a plain function building a `String`, wrapped by
//! [`layout::base`]. Text coming from users goes through [`escape`].

pub mod auth;
pub mod email;
pub mod error;
pub mod form;
pub mod index;
pub mod layout;
pub mod post;
pub mod user;

use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, UtcOffset};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_default()
}

/// Path of a profile page
pub fn user_url(username: &str) -> String {
    format!("/user/{}", urlencoding::encode(username))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn markup_is_escaped() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#x27;y&#x27;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn timestamps_are_shown_in_utc() {
        assert_eq!(
            format_timestamp(datetime!(2020-02-22 17:17:59 +01:00)),
            "2020-02-22 16:17 UTC"
        );
    }

    #[test]
    fn usernames_are_encoded_in_urls() {
        assert_eq!(user_url("susan"), "/user/susan");
        assert_eq!(user_url("a b/c"), "/user/a%20b%2Fc");
    }
}
