//! Hostname helpers for common names and issuer URLs.

use url::{Host, Url};

/// The host of an absolute URL, or `None` if `raw` is not one.
pub fn hostname(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.host_str().map(str::to_string)
}

/// Whether `raw` is an absolute `http`/`https` URL with a host.
///
/// Federated proofs carry such an issuer; self-issued proofs carry the bare
/// common name instead.
pub fn is_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Whether `common_name` is hostname-shaped: a non-empty domain or IP
/// literal with no scheme, port, path or whitespace, already in the
/// canonical form URL parsing yields (lowercase ASCII, punycode).
///
/// Federated proofs resolve to canonical hostnames, so a common name in any
/// other form could never be re-verified and would alias a canonical one.
pub fn is_valid_common_name(common_name: &str) -> bool {
    !common_name.is_empty()
        && common_name.len() <= 253
        && matches!(Host::parse(common_name), Ok(host) if host.to_string() == common_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hostname_of_issuer_urls() {
        assert_eq!(hostname("https://dev-123.okta.com/oauth2/default").as_deref(), Some("dev-123.okta.com"));
        assert_eq!(hostname("https://api-1.duosecurity.com:443").as_deref(), Some("api-1.duosecurity.com"));
        assert_eq!(hostname("example.com"), None);
        assert_eq!(hostname(""), None);
    }

    #[test]
    fn http_url_detection() {
        assert!(is_http_url("https://example.com"));
        assert!(is_http_url("http://127.0.0.1:8080/issuer"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url("urn:example:issuer"));
        assert!(!is_http_url("file:///etc/passwd"));
    }

    #[test]
    fn common_name_shape() {
        assert!(is_valid_common_name("example.com"));
        assert!(is_valid_common_name("dev-123.okta.com"));
        assert!(is_valid_common_name("10.0.0.1"));
        assert!(!is_valid_common_name(""));
        assert!(!is_valid_common_name(" example.com"));
        assert!(!is_valid_common_name("https://example.com"));
        assert!(!is_valid_common_name("example.com/path"));
        assert!(!is_valid_common_name("exa mple.com"));
    }

    #[test]
    fn common_name_must_be_canonical() {
        assert!(!is_valid_common_name("EXAMPLE.com"));
        assert!(!is_valid_common_name("Dev-123.Okta.com"));
        assert!(!is_valid_common_name("bücher.example"));
        assert!(is_valid_common_name("xn--bcher-kva.example"));
        assert_eq!(
            hostname("https://EXAMPLE.com/issuer").as_deref(),
            Some("example.com")
        );
    }

    proptest! {
        #[test]
        fn hostname_of_built_url_is_the_host(label in "[a-z][a-z0-9]{0,20}", tld in "[a-z]{2,6}") {
            let host = format!("{label}.{tld}");
            prop_assert!(is_valid_common_name(&host));
            let url = format!("https://{host}/oauth2");
            prop_assert_eq!(hostname(&url), Some(host));
        }
    }
}
