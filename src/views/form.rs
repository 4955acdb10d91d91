use crate::views::escape;

fn error_line(error: Option<&str>) -> String {
    error
        .map(|error| format!(r#"<span class="error">[{}]</span>"#, escape(error)))
        .unwrap_or_default()
}

/// Labelled `<input>`, `kind` is the input type
pub fn input(label: &str, name: &str, kind: &str, value: &str, error: Option<&str>) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label><br><input id="{name}" name="{name}" type="{kind}" value="{value}">{error}</p>"#,
        name = name,
        label = escape(label),
        kind = kind,
        value = escape(value),
        error = error_line(error),
    )
}

pub fn textarea(label: &str, name: &str, value: &str, error: Option<&str>) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label><br><textarea id="{name}" name="{name}" cols="50" rows="4">{value}</textarea>{error}</p>"#,
        name = name,
        label = escape(label),
        value = escape(value),
        error = error_line(error),
    )
}

pub fn checkbox(label: &str, name: &str, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(
        r#"<p><input id="{name}" name="{name}" type="checkbox" value="y"{checked}> <label for="{name}">{label}</label></p>"#,
        label = escape(label),
    )
}

pub fn submit(label: &str) -> String {
    format!(r#"<p><input type="submit" value="{}"></p>"#, escape(label))
}

/// `<form method="post">` around already rendered fields
pub fn post_form(action: &str, fields: &[String]) -> String {
    format!(
        r#"<form action="{}" method="post" novalidate>{}</form>"#,
        escape(action),
        fields.concat()
    )
}
