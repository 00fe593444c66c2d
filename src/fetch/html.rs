// src/fetch/html.rs
// =============================================================================
// Turns a fetched HTML document into a Page: its title plus the set of
// outbound links worth crawling.
//
// Link rules:
// - every <a href> is resolved against the page URL (relative links work)
// - anchors, mailto:, tel: and javascript: hrefs are skipped
// - fragments are dropped, so /page#a and /page#b are the same address
// - only http/https results are kept
// - optionally, only links on one domain are kept
//
// Addresses are compared as plain strings after resolution; nothing here
// lowercases paths or strips trailing slashes.
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

use super::Page;

/// Parses `html` fetched from `page_url` into a Page.
///
/// `domain` restricts links to a single host when set.
pub fn parse_page(html: &str, page_url: &Url, domain: Option<&str>) -> Page {
    let document = Html::parse_document(html);

    Page {
        title: extract_title(&document),
        links: extract_links(&document, page_url, domain),
    }
}

// Text of the first <title> element, trimmed. Empty if the page has none.
fn extract_title(document: &Html) -> String {
    let selector = Selector::parse("title").expect("'title' is a valid selector");

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_links(document: &Html, page_url: &Url, domain: Option<&str>) -> HashSet<String> {
    let selector = Selector::parse("a[href]").expect("'a[href]' is a valid selector");
    let mut links = HashSet::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = resolve_link(page_url, href) else {
            tracing::trace!(href, base = %page_url, "skipping unresolvable link");
            continue;
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            continue;
        }
        if let Some(domain) = domain {
            if url.domain() != Some(domain) {
                continue;
            }
        }

        links.insert(url.to_string());
    }

    links
}

// Resolves a link (possibly relative) to an absolute URL without fragment
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_title_is_trimmed() {
        let page = parse_page(
            "<html><head><title>\n  Hello World  </title></head></html>",
            &base(),
            None,
        );
        assert_eq!(page.title, "Hello World");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let page = parse_page("<html><body><p>no title</p></body></html>", &base(), None);
        assert_eq!(page.title, "");
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_resolve_relative_link() {
        let result = resolve_link(&base(), "/about");
        assert_eq!(result.unwrap().as_str(), "https://example.com/about");
    }

    #[test]
    fn test_resolve_protocol_relative_link() {
        let result = resolve_link(&base(), "//other.org/x");
        assert_eq!(result.unwrap().as_str(), "https://other.org/x");
    }

    #[test]
    fn test_fragment_is_dropped() {
        let result = resolve_link(&base(), "intro#section-2");
        assert_eq!(result.unwrap().as_str(), "https://example.com/docs/intro");
    }

    #[test]
    fn test_skip_special_links() {
        assert_eq!(resolve_link(&base(), "#top"), None);
        assert_eq!(resolve_link(&base(), "mailto:me@example.com"), None);
        assert_eq!(resolve_link(&base(), "tel:+123"), None);
        assert_eq!(resolve_link(&base(), "javascript:void(0)"), None);
        assert_eq!(resolve_link(&base(), "   "), None);
    }

    #[test]
    fn test_links_are_deduplicated_and_http_only() {
        let html = r#"
            <a href="/a">A</a>
            <a href="/a#again">A again</a>
            <a href="https://other.org/">Other</a>
            <a href="ftp://files.example.com/f">FTP</a>
        "#;
        let page = parse_page(html, &base(), None);

        let mut links: Vec<_> = page.links.into_iter().collect();
        links.sort();
        assert_eq!(links, vec!["https://example.com/a", "https://other.org/"]);
    }

    #[test]
    fn test_same_domain_filter() {
        let html = r#"
            <a href="/local">Local</a>
            <a href="https://other.org/remote">Remote</a>
        "#;
        let page = parse_page(html, &base(), Some("example.com"));

        assert_eq!(page.links.len(), 1);
        assert!(page.links.contains("https://example.com/local"));
    }
}
