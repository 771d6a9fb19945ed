//! URL and display helpers for listing data coming from third-party portals.

/// Placeholder returned for missing links
pub const EMPTY_LINK: &str = "#";

/// Turn whatever a portal gave us into an absolute HTTPS URL.
///
/// Never fails: empty input maps to `"#"`, protocol-relative URLs get an
/// `https:` scheme, scheme-less ones get `https://` with leading slashes
/// dropped. Absolute http/https URLs are returned untouched.
pub fn normalize_url(raw: &str) -> String {
    if raw.is_empty() {
        return EMPTY_LINK.to_string();
    }
    if raw.starts_with("//") {
        return format!("https:{}", raw);
    }
    if !has_http_scheme(raw) {
        return format!("https://{}", raw.trim_start_matches('/'));
    }
    raw.to_string()
}

fn has_http_scheme(raw: &str) -> bool {
    let lower = raw
        .get(..8)
        .unwrap_or(raw)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Space out the sol prefix: "S/1500" and "S/.1500" both render as "S/ 1500".
///
/// The dot of the older "S/." abbreviation is dropped along with any spacing
/// after the prefix, so the result never reads "S/ .1500" or "S/  1500".
pub fn format_price(price: &str) -> String {
    match price.find("S/") {
        Some(idx) => {
            let (head, tail) = price.split_at(idx);
            let amount = tail["S/".len()..].trim_start_matches('.').trim_start();
            format!("{}S/ {}", head, amount)
        }
        None => price.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_relative_forms() {
        assert_eq!(normalize_url("//x.com/a"), "https://x.com/a");
        assert_eq!(normalize_url("x.com/a"), "https://x.com/a");
        assert_eq!(normalize_url("///x.com/a"), "https:///x.com/a");
        assert_eq!(normalize_url("/x.com/a"), "https://x.com/a");
    }

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(normalize_url("http://x.com"), "http://x.com");
        assert_eq!(normalize_url("https://x.com/a?b=1"), "https://x.com/a?b=1");
        assert_eq!(normalize_url("HTTPS://X.com"), "HTTPS://X.com");
    }

    #[test]
    fn empty_is_placeholder() {
        assert_eq!(normalize_url(""), "#");
    }

    #[test]
    fn price_prefix_is_spaced() {
        assert_eq!(format_price("S/1500"), "S/ 1500");
        assert_eq!(format_price("S/.1,200"), "S/ 1,200");
        assert_eq!(format_price("S/ 900"), "S/ 900");
        assert_eq!(format_price("USD 700"), "USD 700");
        assert_eq!(format_price(""), "");
    }
}
