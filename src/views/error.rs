use hyper::StatusCode;

use crate::views::{escape, layout};

pub fn error_page(status_code: StatusCode, message: Option<&str>) -> String {
    let (title, default_message) = match status_code {
        StatusCode::NOT_FOUND => ("File Not Found", "The page you are looking for does not exist."),
        StatusCode::INTERNAL_SERVER_ERROR => (
            "An unexpected error has occurred",
            "The administrator has been notified. Sorry for the inconvenience!",
        ),
        _ => (status_code.canonical_reason().unwrap_or("Error"), ""),
    };

    let content = format!(
        r#"<h1>{}</h1><p>{}</p><p><a href="/index">Back</a></p>"#,
        escape(title),
        escape(message.unwrap_or(default_message)),
    );
    layout::base(title, None, &[], &content)
}
