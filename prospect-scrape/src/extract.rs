//! Paragraph text extraction.

use crate::page::PageDocument;

/// Flatten a page into readable text: every paragraph's trimmed content,
/// empties discarded, joined with single spaces. An empty string is a valid
/// result ("this page says nothing"), not an error.
pub fn extract_text(doc: &PageDocument) -> String {
    doc.paragraphs()
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn doc(html: &str) -> PageDocument {
        PageDocument::new(
            Url::parse("http://example.com").unwrap(),
            html.to_string(),
        )
    }

    #[test]
    fn joins_paragraphs_with_single_spaces() {
        let d = doc("<p>We are a nonprofit.</p><p>Founded in 1998.</p>");
        assert_eq!(extract_text(&d), "We are a nonprofit. Founded in 1998.");
    }

    #[test]
    fn trims_and_discards_empty_paragraphs() {
        let d = doc("<p>  spaced  </p><p>   </p><p></p><p>end</p>");
        assert_eq!(extract_text(&d), "spaced end");
    }

    #[test]
    fn whitespace_only_page_yields_empty_string() {
        let d = doc("<p> \n\t </p><p></p>");
        assert_eq!(extract_text(&d), "");
    }

    #[test]
    fn page_without_paragraphs_yields_empty_string() {
        let d = doc("<div>divs only</div>");
        assert_eq!(extract_text(&d), "");
    }
}
