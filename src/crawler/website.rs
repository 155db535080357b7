//! Best-guess business website from the outbound links of a page
//!
//! Used when neither the contact block nor the "visit website" button gives
//! a website. It is a heuristic: wrong guesses and misses are expected.

use crate::crawler::extract::{element_text, DetailPage};
use crate::url::{extract_domain, has_known_tld, is_source_link, strip_www};
use scraper::Selector;
use url::Url;

/// Link texts that mean "this is the business website"
const VISIT_SITE_TEXTS: [&str; 5] = [
    "visiter le site web",
    "visit website",
    "website",
    "site web",
    "voir le site",
];

/// Guesses the website of `company_name` from the page's outbound links
///
/// Links to the source site and links whose domain has no known TLD are
/// ignored. For each remaining link, in document order:
///
/// 1. the normalized company name is part of the domain;
/// 2. a company-name word longer than two characters is part of the domain;
/// 3. the link text is a "visit site" phrase;
/// 4. the link text itself looks like a bare domain.
///
/// The first link meeting any rule wins. Rules 1 to 3 return the domain
/// without `www.`; rule 4 returns the link text.
pub fn resolve_website(page: &DetailPage, company_name: &str) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;

    let lower_name = company_name.to_lowercase();
    let clean_company: String = lower_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let company_words: Vec<&str> = lower_name
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .collect();

    for link in page.document().select(&selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") || is_source_link(href, page.source_site()) {
            continue;
        }

        let Some(domain) = Url::parse(href).ok().as_ref().and_then(extract_domain) else {
            continue;
        };
        if !has_known_tld(&domain) {
            continue;
        }

        let compact_domain = domain.replace(['-', '.'], "");
        if !clean_company.is_empty() && compact_domain.contains(&clean_company) {
            return Some(strip_www(&domain));
        }

        if company_words.iter().any(|word| domain.contains(word)) {
            return Some(strip_www(&domain));
        }

        let text = element_text(&link);
        if VISIT_SITE_TEXTS.contains(&text.to_lowercase().as_str()) {
            return Some(strip_www(&domain));
        }

        if looks_like_domain(&text) {
            return Some(text);
        }
    }

    None
}

/// True for short single-token text carrying a known TLD
pub fn looks_like_domain(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty()
        && has_known_tld(text)
        && !text.contains('@')
        && text.chars().count() < 50
        && !text.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "trustpilot.com";

    fn resolve(html: &str, name: &str) -> Option<String> {
        resolve_website(&DetailPage::parse(html, SITE), name)
    }

    #[test]
    fn test_company_name_in_domain() {
        let html = r#"
            <a href="https://www.facebook.com/somepage">Facebook</a>
            <a href="https://www.bijouterie-dupont.fr/">Accueil</a>
        "#;
        assert_eq!(
            resolve(html, "Bijouterie Dupont"),
            Some("bijouterie-dupont.fr".to_string())
        );
    }

    #[test]
    fn test_company_word_in_domain() {
        let html = r#"<a href="https://dupont-joaillier.com/shop">Boutique</a>"#;
        assert_eq!(
            resolve(html, "Maison Dupont"),
            Some("dupont-joaillier.com".to_string())
        );
    }

    #[test]
    fn test_short_words_ignored() {
        let html = r#"<a href="https://www.or.com/">Or</a>"#;
        assert_eq!(resolve(html, "Or et Argent"), None);
    }

    #[test]
    fn test_visit_site_text() {
        let html = r#"<a href="https://www.example-shop.fr/?ref=tp">Visiter le site web</a>"#;
        assert_eq!(
            resolve(html, "Something Else"),
            Some("example-shop.fr".to_string())
        );
    }

    #[test]
    fn test_link_text_looks_like_domain() {
        let html = r#"<a href="https://redirect.example.com/r?id=9">gems-store.fr</a>"#;
        assert_eq!(resolve(html, "Unrelated"), Some("gems-store.fr".to_string()));
    }

    #[test]
    fn test_source_site_and_unknown_tld_ignored() {
        let html = r#"
            <a href="https://fr.trustpilot.com/review/dupont.fr">dupont.fr</a>
            <a href="https://dupont.io/">dupont.io</a>
            <a href="/relative/dupont">dupont.fr</a>
        "#;
        assert_eq!(resolve(html, "Dupont"), None);
    }

    #[test]
    fn test_first_matching_link_wins() {
        let html = r#"
            <a href="https://www.first-shop.com/">Website</a>
            <a href="https://www.dupont.fr/">Dupont</a>
        "#;
        assert_eq!(resolve(html, "Dupont"), Some("first-shop.com".to_string()));
    }

    #[test]
    fn test_looks_like_domain() {
        assert!(looks_like_domain("bijoux.fr"));
        assert!(!looks_like_domain("contact@bijoux.fr"));
        assert!(!looks_like_domain("voir bijoux.fr"));
        assert!(!looks_like_domain(""));
        assert!(!looks_like_domain(&format!("{}.com", "a".repeat(60))));
    }
}
