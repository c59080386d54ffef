// ABOUTME: DOM traversal and rewriting utilities for the block importer.
// ABOUTME: Provides text normalization helpers plus the serializer and cleanup submodules.

//! DOM utilities for HTML document manipulation.
//!
//! Documents are parsed with `scraper` and treated as read-only. Every mutation
//! (subtree removal, attribute stripping, block substitution) is expressed as a
//! filtered re-serialization of the tree, see [`serialize`].

pub mod cleaners;
pub mod serialize;

use scraper::ElementRef;

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized text content of an element.
pub fn element_text(element: &ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Level of an `h1`..`h6` element, `None` for anything else.
pub fn heading_level(element: &ElementRef) -> Option<u8> {
    let name = element.value().name();
    let bytes = name.as_bytes();
    if bytes.len() == 2 && bytes[0].eq_ignore_ascii_case(&b'h') && (b'1'..=b'6').contains(&bytes[1])
    {
        Some(bytes[1] - b'0')
    } else {
        None
    }
}

/// Trimmed, non-empty attribute value.
pub fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  hello   world  "), "hello world");
        assert_eq!(normalize_whitespace("no\textra\nspaces"), "no extra spaces");
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_heading_level() {
        let doc = Html::parse_fragment("<h3>a</h3><span>b</span><h6>c</h6>");
        let levels: Vec<Option<u8>> = doc
            .select(&Selector::parse("h3, span, h6").unwrap())
            .map(|el| heading_level(&el))
            .collect();
        assert_eq!(levels, vec![Some(3), None, Some(6)]);
    }

    #[test]
    fn test_element_text_and_attr() {
        let doc = Html::parse_fragment(r#"<a href="  /x  " title=" "> Meet <b>Jane</b> </a>"#);
        let a = doc.select(&Selector::parse("a").unwrap()).next().unwrap();
        assert_eq!(element_text(&a), "Meet Jane");
        assert_eq!(non_empty_attr(&a, "href"), Some("/x"));
        assert_eq!(non_empty_attr(&a, "title"), None);
        assert_eq!(non_empty_attr(&a, "rel"), None);
    }
}
