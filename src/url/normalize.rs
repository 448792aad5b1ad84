use crate::UrlError;
use url::Url;

/// Scheme assumed for seeds given as a bare host
const DEFAULT_SCHEME: &str = "http";

/// Normalizes the crawl seed into an absolute, defragmented URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prefix `http://` when the seed carries no scheme (`example.com/docs`)
/// 3. Parse; reject if malformed
/// 4. Reject schemes other than HTTP and HTTPS
/// 5. Reject URLs without a host
/// 6. Remove the fragment
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::normalize_seed;
///
/// let url = normalize_seed("example.com").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/");
///
/// let url = normalize_seed("https://example.com/docs#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_seed(seed: &str) -> Result<Url, UrlError> {
    let seed = seed.trim();
    if seed.is_empty() {
        return Err(UrlError::Parse("empty seed URL".to_string()));
    }

    let candidate = if seed.contains("://") {
        seed.to_string()
    } else {
        format!("{}://{}", DEFAULT_SCHEME, seed)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(defragment(url))
}

/// Removes the `#fragment` suffix so the URL can serve as an identity key
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::defragment;
///
/// let url = Url::parse("http://example.com/a#frag").unwrap();
/// assert_eq!(defragment(url).as_str(), "http://example.com/a");
/// ```
pub fn defragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Resolves a raw reference against the page it was found on and defragments it
///
/// Returns `None` when the reference cannot be joined into a valid URL.
pub fn resolve(base: &Url, reference: &str) -> Option<Url> {
    base.join(reference.trim()).ok().map(defragment)
}
