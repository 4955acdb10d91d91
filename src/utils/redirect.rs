/// Only follow `next` when it stays on this site
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/')
        && !next.starts_with("//")
        && !next.starts_with("/\\")
        && !next.contains("://")
        && next.chars().all(|c| c.is_ascii_graphic())
}

/// Where to go once logged in
pub fn next_or_index(next: Option<&str>) -> &str {
    match next {
        Some(next) if is_safe_next(next) => next,
        _ => "/index",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_followed() {
        assert_eq!(next_or_index(Some("/user/susan?page=2")), "/user/susan?page=2");
        assert_eq!(next_or_index(Some("/edit_profile")), "/edit_profile");
    }

    #[test]
    fn other_sites_are_not_followed() {
        assert_eq!(next_or_index(Some("https://evil.example.com")), "/index");
        assert_eq!(next_or_index(Some("//evil.example.com/index")), "/index");
        assert_eq!(next_or_index(Some("/\\evil.example.com")), "/index");
        assert_eq!(next_or_index(Some("index")), "/index");
        assert_eq!(next_or_index(Some("/a\r\nLocation: x")), "/index");
        assert_eq!(next_or_index(Some("/usér")), "/index");
        assert_eq!(next_or_index(None), "/index");
    }
}
