//! Detail-page extraction
//!
//! The review site's markup changes often and differs between listings, so
//! every field is read through an ordered list of strategies. Each strategy
//! is a plain function from a parsed page to an optional value; the first
//! one that yields non-empty text wins.

use crate::crawler::website::resolve_website;
use crate::record::CompanyRecord;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref DIGITS_RE: Regex = Regex::new(r"\d+").unwrap();
    static ref DECIMAL_RE: Regex = Regex::new(r"(\d+[.,]\d+)").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap();
}

/// Class of the list items holding contact details
const CONTACT_ITEM: &str = "li.styles_itemRow__74s4a";

/// Path data that identifies the location pin icon
const LOCATION_ICON_SIGNATURE: &str = "M3.404 1.904A6.5 6.5";

/// Countries whose presence marks a paragraph as an address
const KNOWN_COUNTRIES: [&str; 4] = ["France", "Belgium", "Switzerland", "Canada"];

/// A parsed detail page and the site it came from
pub struct DetailPage {
    document: Html,
    source_site: String,
}

impl DetailPage {
    /// Parses a detail page
    ///
    /// `source_site` is the review site's domain; links to it are never
    /// taken for the business website.
    pub fn parse(html: &str, source_site: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            source_site: source_site.to_lowercase(),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn source_site(&self) -> &str {
        &self.source_site
    }

    /// Text of the first element matching `css`, if non-empty
    fn first_text(&self, css: &str) -> Option<String> {
        let selector = Selector::parse(css).ok()?;
        self.document
            .select(&selector)
            .next()
            .map(|element| element_text(&element))
            .filter(|text| !text.is_empty())
    }

    /// Contact list items, in document order
    fn contact_items(&self) -> Vec<ElementRef<'_>> {
        match Selector::parse(CONTACT_ITEM) {
            Ok(selector) => self.document.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Trimmed text content of an element, fragments joined by single spaces
pub fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A single extraction strategy
pub type Strategy = fn(&DetailPage) -> Option<String>;

/// Runs strategies in order and returns the first non-empty value
pub fn first_match(page: &DetailPage, strategies: &[Strategy]) -> Option<String> {
    strategies
        .iter()
        .find_map(|strategy| strategy(page).filter(|value| !value.is_empty()))
}

pub const NAME_STRATEGIES: &[Strategy] = &[
    name_from_title_display,
    name_from_display_typography,
    name_from_mobile_heading,
    name_from_first_heading,
];

pub const REVIEWS_TEXT_STRATEGIES: &[Strategy] = &[
    reviews_from_full_class,
    reviews_from_short_class,
    reviews_from_class_pattern,
];

pub const EMAIL_STRATEGIES: &[Strategy] = &[email_from_contact_items, email_from_page_text];

pub const PHONE_STRATEGIES: &[Strategy] = &[phone_from_contact_items];

/// The name-based resolver runs after these, see [`extract_company`]
pub const WEBSITE_STRATEGIES: &[Strategy] = &[website_from_contact_items, website_from_visit_button];

pub const ADDRESS_STRATEGIES: &[Strategy] =
    &[address_from_location_item, address_from_country_paragraph];

pub const DESCRIPTION_STRATEGIES: &[Strategy] = &[description_from_about_section];

pub fn name_from_title_display(page: &DetailPage) -> Option<String> {
    page.first_text(
        "span.typography_display-s__pKPhT.typography_appearance-default__t8iAq.title_displayName__9lGaz",
    )
}

pub fn name_from_display_typography(page: &DetailPage) -> Option<String> {
    page.first_text("span.typography_display-s__pKPhT")
}

pub fn name_from_mobile_heading(page: &DetailPage) -> Option<String> {
    page.first_text(
        "p.CDS_Typography_appearance-default__bedfe1.CDS_Typography_heading-s__bedfe1.styles_mobileDisplayName__eFqHW",
    )
}

pub fn name_from_first_heading(page: &DetailPage) -> Option<String> {
    page.first_text("h1")
}

pub fn reviews_from_full_class(page: &DetailPage) -> Option<String> {
    page.first_text(
        "span.typography_body-l__v5JLj.typography_appearance-default__t8iAq.styles_reviewsAndRating__OIRXy",
    )
}

pub fn reviews_from_short_class(page: &DetailPage) -> Option<String> {
    page.first_text("span.styles_reviewsAndRating__OIRXy")
}

pub fn reviews_from_class_pattern(page: &DetailPage) -> Option<String> {
    page.first_text(r#"span[class*="reviewsAndRating"]"#)
}

/// Concatenates every digit run of `text` (`"1 234 avis"` -> `"1234"`)
///
/// The runs are joined, not summed, so thousands separators disappear.
/// Unrelated numbers in the same text are joined as well.
pub fn concat_digits(text: &str) -> Option<String> {
    let digits: String = DIGITS_RE.find_iter(text).map(|m| m.as_str()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// First decimal number of `text`, with a comma separator turned into a period
pub fn parse_rating(text: &str) -> Option<String> {
    DECIMAL_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().replace(',', "."))
}

/// Review count as a digit string
pub fn review_count(page: &DetailPage) -> Option<String> {
    first_match(page, REVIEWS_TEXT_STRATEGIES).and_then(|text| concat_digits(&text))
}

/// Rating read from the first rating/score block holding a decimal
pub fn rating_from_score_element(page: &DetailPage) -> Option<String> {
    let selector = Selector::parse(r#"div[class*="rating"], div[class*="score"]"#).ok()?;
    page.document()
        .select(&selector)
        .find_map(|element| parse_rating(&element_text(&element)))
}

/// Text of the first link in a contact item whose href starts with `prefix`
fn contact_link_text(page: &DetailPage, prefix: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"a[href^="{}"]"#, prefix)).ok()?;
    page.contact_items().iter().find_map(|item| {
        item.select(&selector)
            .map(|link| element_text(&link))
            .find(|text| !text.is_empty())
    })
}

pub fn email_from_contact_items(page: &DetailPage) -> Option<String> {
    contact_link_text(page, "mailto:")
}

pub fn phone_from_contact_items(page: &DetailPage) -> Option<String> {
    contact_link_text(page, "tel:")
}

/// Visible text of the first external absolute link in the contact block
pub fn website_from_contact_items(page: &DetailPage) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    page.contact_items().iter().find_map(|item| {
        item.select(&selector).find_map(|link| {
            let href = link.value().attr("href")?;
            if !href.starts_with("http") || crate::url::is_source_link(href, page.source_site()) {
                return None;
            }
            Some(element_text(&link)).filter(|text| !text.is_empty())
        })
    })
}

/// Paragraph next to the location icon in the contact block
pub fn address_from_location_item(page: &DetailPage) -> Option<String> {
    let svg = Selector::parse("svg").ok()?;
    let paragraph = Selector::parse("p").ok()?;

    page.contact_items().iter().find_map(|item| {
        let has_pin = item
            .select(&svg)
            .any(|icon| icon.html().contains(LOCATION_ICON_SIGNATURE));
        if !has_pin {
            return None;
        }
        item.select(&paragraph)
            .next()
            .map(|p| element_text(&p))
            .filter(|text| !text.is_empty())
    })
}

/// First email-shaped token anywhere in the page text
pub fn email_from_page_text(page: &DetailPage) -> Option<String> {
    let text = page
        .document()
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    EMAIL_RE.find(&text).map(|m| m.as_str().to_string())
}

/// Target of the marked "visit website" button
pub fn website_from_visit_button(page: &DetailPage) -> Option<String> {
    let selector = Selector::parse("a[data-visit-website-button-link][href]").ok()?;
    page.document()
        .select(&selector)
        .find_map(|link| link.value().attr("href"))
        .map(|href| href.trim().to_string())
}

/// Body paragraph mentioning a known country
pub fn address_from_country_paragraph(page: &DetailPage) -> Option<String> {
    let selector =
        Selector::parse("p.typography_body-l__v5JLj.typography_appearance-default__t8iAq").ok()?;
    page.document()
        .select(&selector)
        .map(|p| element_text(&p))
        .find(|text| KNOWN_COUNTRIES.iter().any(|country| text.contains(country)))
}

pub fn description_from_about_section(page: &DetailPage) -> Option<String> {
    page.first_text(
        "div[data-business-unit-about-section] p[data-relevant-review-text-typography]",
    )
}

/// Extracts a company record from a parsed detail page
///
/// Fields that no strategy resolves stay empty.
pub fn extract_company(page: &DetailPage, source_link: &str) -> CompanyRecord {
    let name = first_match(page, NAME_STRATEGIES).unwrap_or_default();

    let website = first_match(page, WEBSITE_STRATEGIES)
        .or_else(|| resolve_website(page, &name))
        .unwrap_or_default();

    CompanyRecord {
        source_link: source_link.to_string(),
        review_count: review_count(page).unwrap_or_default(),
        rating: rating_from_score_element(page).unwrap_or_default(),
        address: first_match(page, ADDRESS_STRATEGIES).unwrap_or_default(),
        email: first_match(page, EMAIL_STRATEGIES).unwrap_or_default(),
        phone: first_match(page, PHONE_STRATEGIES).unwrap_or_default(),
        description: first_match(page, DESCRIPTION_STRATEGIES).unwrap_or_default(),
        website,
        name,
    }
}

/// Parses `html` and extracts a company record in one step
pub fn extract_company_info(html: &str, source_link: &str, source_site: &str) -> CompanyRecord {
    let page = DetailPage::parse(html, source_site);
    extract_company(&page, source_link)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "trustpilot.com";
    const LINK: &str = "https://fr.trustpilot.com/review/www.bijoux-dupont.fr";

    fn page(html: &str) -> DetailPage {
        DetailPage::parse(html, SITE)
    }

    const FULL_PAGE: &str = r#"
        <html><body>
            <span class="typography_display-s__pKPhT typography_appearance-default__t8iAq title_displayName__9lGaz">
                Bijouterie Dupont
            </span>
            <span class="typography_body-l__v5JLj typography_appearance-default__t8iAq styles_reviewsAndRating__OIRXy">
                1 234 avis
            </span>
            <div class="styles_rating__pY5Pk"><p>4,5 / 5</p></div>
            <ul>
                <li class="styles_itemRow__74s4a">
                    <a href="mailto:contact@bijoux-dupont.fr">contact@bijoux-dupont.fr</a>
                </li>
                <li class="styles_itemRow__74s4a">
                    <a href="tel:+33123456789">+33 1 23 45 67 89</a>
                </li>
                <li class="styles_itemRow__74s4a">
                    <a href="https://www.trustpilot.com/review/www.bijoux-dupont.fr">Trustpilot</a>
                    <a href="https://www.bijoux-dupont.fr">www.bijoux-dupont.fr</a>
                </li>
                <li class="styles_itemRow__74s4a">
                    <svg viewBox="0 0 16 16"><path d="M3.404 1.904A6.5 6.5 0 0 1 14.5 6.5"></path></svg>
                    <ul><li><p>12 rue de la Paix, 75002 Paris, France</p></li></ul>
                </li>
            </ul>
            <div data-business-unit-about-section="true">
                <p data-relevant-review-text-typography="true">Joaillier depuis 1920.</p>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_full_page_extraction() {
        let record = extract_company_info(FULL_PAGE, LINK, SITE);

        assert_eq!(record.name, "Bijouterie Dupont");
        assert_eq!(record.source_link, LINK);
        assert_eq!(record.review_count, "1234");
        assert_eq!(record.rating, "4.5");
        assert_eq!(record.email, "contact@bijoux-dupont.fr");
        assert_eq!(record.phone, "+33 1 23 45 67 89");
        assert_eq!(record.website, "www.bijoux-dupont.fr");
        assert_eq!(record.address, "12 rue de la Paix, 75002 Paris, France");
        assert_eq!(record.description, "Joaillier depuis 1920.");
        assert_eq!(record.filled_count(), 9);
    }

    #[test]
    fn test_concat_digits() {
        assert_eq!(concat_digits("1 234 avis"), Some("1234".to_string()));
        assert_eq!(concat_digits("87 avis"), Some("87".to_string()));
        assert_eq!(concat_digits("12 avis, 4 étoiles"), Some("124".to_string()));
        assert_eq!(concat_digits("aucun avis"), None);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4,5 / 5"), Some("4.5".to_string()));
        assert_eq!(parse_rating("TrustScore 3.8 sur 5"), Some("3.8".to_string()));
        assert_eq!(parse_rating("5 / 5"), None);
    }

    #[test]
    fn test_rating_skips_blocks_without_decimal() {
        let p = page(
            r#"<div class="styles_ratingLabel">Excellent</div>
               <div class="trust_score">4,2</div>"#,
        );
        assert_eq!(rating_from_score_element(&p), Some("4.2".to_string()));
    }

    #[test]
    fn test_name_falls_back_to_heading() {
        let p = page("<html><body><h1>  Or &amp; Argent </h1></body></html>");
        assert_eq!(first_match(&p, NAME_STRATEGIES), Some("Or & Argent".to_string()));
        assert_eq!(name_from_title_display(&p), None);
    }

    #[test]
    fn test_name_prefers_display_span_over_heading() {
        let p = page(
            r#"<h1>Heading</h1><span class="typography_display-s__pKPhT">Display Name</span>"#,
        );
        assert_eq!(first_match(&p, NAME_STRATEGIES), Some("Display Name".to_string()));
    }

    #[test]
    fn test_empty_strategy_result_falls_through() {
        let p = page(r#"<span class="typography_display-s__pKPhT">   </span><h1>Fallback</h1>"#);
        assert_eq!(first_match(&p, NAME_STRATEGIES), Some("Fallback".to_string()));
    }

    #[test]
    fn test_reviews_from_class_pattern() {
        let p = page(r#"<span class="styles_reviewsAndRating__XYZ12">2 051 avis</span>"#);
        assert_eq!(reviews_from_full_class(&p), None);
        assert_eq!(review_count(&p), Some("2051".to_string()));
    }

    #[test]
    fn test_email_falls_back_to_page_text() {
        let p = page("<html><body><p>Écrivez-nous : info@or-et-argent.com</p></body></html>");
        assert_eq!(email_from_contact_items(&p), None);
        assert_eq!(
            first_match(&p, EMAIL_STRATEGIES),
            Some("info@or-et-argent.com".to_string())
        );
    }

    #[test]
    fn test_website_from_visit_button() {
        let p = page(
            r#"<a data-visit-website-button-link="true" href="https://www.bijoux.fr?utm=tp">Visiter</a>"#,
        );
        assert_eq!(
            first_match(&p, WEBSITE_STRATEGIES),
            Some("https://www.bijoux.fr?utm=tp".to_string())
        );
    }

    #[test]
    fn test_website_contact_item_ignores_source_site() {
        let p = page(
            r#"<li class="styles_itemRow__74s4a">
                 <a href="https://fr.trustpilot.com/categories">Catégories</a>
               </li>"#,
        );
        assert_eq!(website_from_contact_items(&p), None);
    }

    #[test]
    fn test_address_requires_location_icon() {
        let p = page(
            r#"<li class="styles_itemRow__74s4a">
                 <svg><path d="M0 0h16v16H0z"></path></svg><p>Not an address</p>
               </li>"#,
        );
        assert_eq!(address_from_location_item(&p), None);
    }

    #[test]
    fn test_address_from_country_paragraph() {
        let p = page(
            r#"<p class="typography_body-l__v5JLj typography_appearance-default__t8iAq">Livraison rapide</p>
               <p class="typography_body-l__v5JLj typography_appearance-default__t8iAq">Rue du Rhône 1, Genève, Switzerland</p>"#,
        );
        assert_eq!(
            first_match(&p, ADDRESS_STRATEGIES),
            Some("Rue du Rhône 1, Genève, Switzerland".to_string())
        );
    }

    #[test]
    fn test_description_requires_about_section() {
        let p = page(r#"<p data-relevant-review-text-typography="true">Review text</p>"#);
        assert_eq!(description_from_about_section(&p), None);
    }

    #[test]
    fn test_empty_page_yields_empty_record() {
        let record = extract_company_info("<html><body></body></html>", LINK, SITE);

        assert_eq!(record, CompanyRecord::empty(LINK));
        assert!(record.has_no_data());
    }
}
