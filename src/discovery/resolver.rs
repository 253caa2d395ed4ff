//! Turns raw `href` values into absolute, allow-listed article URLs.

use super::allowlist::DomainAllowList;
use url::Url;

/// Why an `href` did not resolve to a usable URL.
///
/// Rejections are dropped by the discovery engine; they never travel further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    Malformed,
    Scheme(String),
    MissingHost,
    Disallowed(String),
}

/// Resolve `href` against `base`.
///
/// Relative (`/a/b`, `b`) and protocol-relative (`//host/a`) references are
/// joined onto the base; only `http` and `https` results are kept, and the
/// resulting host must be on `allow_list`.
pub fn resolve(href: &str, base: &Url, allow_list: &DomainAllowList) -> Result<Url, Rejection> {
    let href = href.trim();
    if href.is_empty() {
        return Err(Rejection::Empty);
    }

    let url = base.join(href).map_err(|_| Rejection::Malformed)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(Rejection::Scheme(other.to_string())),
    }

    let host = url.host_str().ok_or(Rejection::MissingHost)?;
    if !allow_list.contains(host) {
        return Err(Rejection::Disallowed(host.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/news/").unwrap()
    }

    fn list() -> DomainAllowList {
        DomainAllowList::new(["example.com", "partner.org"])
    }

    #[test]
    fn test_relative_and_absolute_paths() {
        let url = resolve("/tech/2024/05/01/foo", &base(), &list()).unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/tech/2024/05/01/foo");

        let url = resolve("world/story-one", &base(), &list()).unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/news/world/story-one");
    }

    #[test]
    fn test_protocol_relative_uses_base_scheme() {
        let url = resolve("//partner.org/a/b", &base(), &list()).unwrap();
        assert_eq!(url.as_str(), "https://partner.org/a/b");
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        assert_eq!(
            resolve("mailto:desk@example.com", &base(), &list()),
            Err(Rejection::Scheme("mailto".into()))
        );
        assert_eq!(
            resolve("javascript:void(0)", &base(), &list()),
            Err(Rejection::Scheme("javascript".into()))
        );
        assert!(resolve("ftp://example.com/file", &base(), &list()).is_err());
    }

    #[test]
    fn test_off_list_hosts_rejected() {
        assert_eq!(
            resolve("https://tracker.net/a/b/c", &base(), &list()),
            Err(Rejection::Disallowed("tracker.net".into()))
        );
        assert!(resolve("https://sub.example.com/a", &base(), &list()).is_err());
    }

    #[test]
    fn test_malformed_and_empty_hrefs_rejected() {
        assert_eq!(resolve("   ", &base(), &list()), Err(Rejection::Empty));
        assert_eq!(resolve("http://[::1", &base(), &list()), Err(Rejection::Malformed));
    }

    fn href_strategy() -> impl Strategy<Value = String> {
        let host = prop::sample::select(vec![
            "example.com", "www.example.com", "EXAMPLE.com", "partner.org", "sub.partner.org",
            "evil.com", "example.com.evil.com", "www.www.example.com", "", "[::1]",
        ]);
        let path = "[a-z0-9/._-]{0,24}";
        prop_oneof![
            "[ -~]{0,40}",
            (host.clone(), path).prop_map(|(h, p)| format!("//{h}/{p}")),
            (prop::sample::select(vec!["http", "https", "ftp", "javascript", "mailto"]), host, path)
                .prop_map(|(s, h, p)| format!("{s}://{h}/{p}")),
            path.prop_map(|p| format!("/{p}")),
        ]
    }

    fn base_strategy() -> impl Strategy<Value = Url> {
        prop::sample::select(vec![
            "https://www.example.com/news/",
            "http://partner.org",
            "https://evil.com/a/b",
        ])
        .prop_map(|b| Url::parse(b).unwrap())
    }

    proptest! {
        #[test]
        fn resolved_urls_are_always_on_the_list(href in href_strategy(), base in base_strategy()) {
            if let Ok(url) = resolve(&href, &base, &list()) {
                prop_assert!(matches!(url.scheme(), "http" | "https"));
                let host = url.host_str().unwrap_or_default();
                prop_assert!(list().contains(host), "{} -> {}", href, url);
            }
        }
    }

    #[test]
    fn test_never_returns_off_list_host() {
        let hrefs = [
            "/a", "//evil.com/x", "https://evil.com", "http://www.example.com/ok",
            "HTTPS://PARTNER.ORG/Y", "https://example.com.evil.com/z", "?q=1", "#top",
        ];
        for href in hrefs {
            if let Ok(url) = resolve(href, &base(), &list()) {
                assert!(list().contains(url.host_str().unwrap()), "{href} -> {url}");
            }
        }
    }
}
