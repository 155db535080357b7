use url::Url;

/// Top-level domain suffixes recognised by the website heuristics
pub const KNOWN_TLDS: &[&str] = &[
    ".com", ".fr", ".net", ".org", ".co.uk", ".de", ".it", ".es", ".be", ".ch",
];

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gem_prospector::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Removes every `www.` from a domain
pub fn strip_www(domain: &str) -> String {
    domain.replace("www.", "")
}

/// Returns true if the text contains one of the known TLD suffixes
///
/// This is a substring test, so `shop.com.au` and `example.fr/path`
/// both qualify.
pub fn has_known_tld(text: &str) -> bool {
    let lower = text.to_lowercase();
    KNOWN_TLDS.iter().any(|tld| lower.contains(tld))
}

/// Public suffixes made of two labels
pub const TWO_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "com.au", "net.au", "org.au", "co.nz", "co.jp",
    "com.br", "co.za", "com.mx",
];

/// Returns the registrable domain of a host (`fr.trustpilot.com` -> `trustpilot.com`)
///
/// Under a two-label suffix one more label is kept
/// (`reviews.example.co.uk` -> `example.co.uk`). IP addresses are returned
/// unchanged.
pub fn site_domain(host: &str) -> String {
    let host = host.to_lowercase();
    if host.parse::<std::net::IpAddr>().is_ok() {
        return host;
    }
    let labels: Vec<&str> = host.split('.').collect();
    let suffix_labels = if labels.len() > 2
        && TWO_LABEL_SUFFIXES.contains(&labels[labels.len() - 2..].join(".").as_str())
    {
        2
    } else {
        1
    };
    let keep = suffix_labels + 1;
    if labels.len() <= keep {
        return host;
    }
    labels[labels.len() - keep..].join(".")
}

/// Returns true if an absolute link points back to the source site
///
/// Every host under the source's site domain counts, so links to
/// `www.trustpilot.com` are recognised while scraping `fr.trustpilot.com`.
pub fn is_source_link(href: &str, source_site: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => match extract_domain(&url) {
            Some(host) => host == source_site || host.ends_with(&format!(".{}", source_site)),
            None => false,
        },
        Err(_) => false,
    }
}
