use url::{Host, Url};

/// Extracts the host from a URL, lower-cased
///
/// The port is not part of the result: `example.com:8080` and `example.com`
/// name the same host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL's host is an IP address literal rather than a name
pub fn is_ip_host(url: &Url) -> bool {
    matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)))
}

/// Returns the `www.`-toggled spelling of a host name
///
/// A leading `www.` is stripped if present, otherwise one is added.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::toggle_www;
///
/// assert_eq!(toggle_www("www.example.com"), "example.com");
/// assert_eq!(toggle_www("example.com"), "www.example.com");
/// ```
pub fn toggle_www(host: &str) -> String {
    match host.strip_prefix("www.") {
        Some(bare) => bare.to_string(),
        None => format!("www.{}", host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_host() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_ignores_port() {
        let url = Url::parse("http://example.com:8080/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/Page").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_no_host() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(extract_host(&url), None);
    }

    #[test]
    fn test_is_ip_host() {
        assert!(is_ip_host(&Url::parse("http://127.0.0.1:3000/").unwrap()));
        assert!(is_ip_host(&Url::parse("http://10.0.0.5/a").unwrap()));
        assert!(is_ip_host(&Url::parse("http://[::1]/").unwrap()));
        assert!(!is_ip_host(&Url::parse("http://example.com/").unwrap()));
        assert!(!is_ip_host(&Url::parse("http://localhost/").unwrap()));
    }

    #[test]
    fn test_toggle_www() {
        assert_eq!(toggle_www("www.example.com"), "example.com");
        assert_eq!(toggle_www("example.com"), "www.example.com");
        assert_eq!(toggle_www("blog.example.com"), "www.blog.example.com");
        assert_eq!(toggle_www(&toggle_www("example.com")), "example.com");
    }
}
