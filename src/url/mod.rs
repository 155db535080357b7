//! URL handling module for Gem-Prospector
//!
//! This module provides domain extraction, source-site detection and the
//! TLD heuristics used when guessing a business website.

mod domain;

use url::Url;

// Re-export main functions
pub use domain::{
    extract_domain, has_known_tld, is_source_link, site_domain, strip_www, KNOWN_TLDS,
    TWO_LABEL_SUFFIXES,
};

/// Qualifies a site-relative href against the source base URL
///
/// Only the scheme and host of `base` are kept, so `/review/x` always maps
/// to `<scheme>://<host>/review/x` regardless of the base path.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gem_prospector::url::qualify;
///
/// let base = Url::parse("https://fr.trustpilot.com").unwrap();
/// assert_eq!(
///     qualify(&base, "/review/bijoux.fr"),
///     Some("https://fr.trustpilot.com/review/bijoux.fr".to_string())
/// );
/// ```
pub fn qualify(base: &Url, href: &str) -> Option<String> {
    base.join(href).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_relative_path() {
        let base = Url::parse("https://fr.trustpilot.com").unwrap();
        assert_eq!(
            qualify(&base, "/review/www.bijoux.fr"),
            Some("https://fr.trustpilot.com/review/www.bijoux.fr".to_string())
        );
    }

    #[test]
    fn test_qualify_ignores_base_path() {
        let base = Url::parse("http://127.0.0.1:8080/categories/jewelry_store").unwrap();
        assert_eq!(
            qualify(&base, "/review/shop.com"),
            Some("http://127.0.0.1:8080/review/shop.com".to_string())
        );
    }

    #[test]
    fn test_qualify_keeps_query() {
        let base = Url::parse("https://fr.trustpilot.com").unwrap();
        assert_eq!(
            qualify(&base, "/review/shop.com?utm=1"),
            Some("https://fr.trustpilot.com/review/shop.com?utm=1".to_string())
        );
    }
}
