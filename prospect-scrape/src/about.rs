//! About-link discovery.
//!
//! A homepage usually links to an organizational description page. The
//! heuristic: the first hyperlink whose visible text or href mentions
//! "about", in document order. First match wins; no ranking.

use crate::page::PageDocument;
use url::Url;

/// Scan a homepage for an "About Us"-style link and resolve it to an
/// absolute URL. Candidates whose href cannot be resolved against the page
/// URL are skipped and the scan continues.
pub fn find_about_link(doc: &PageDocument) -> Option<Url> {
    for link in doc.links() {
        if !mentions_about(&link.text) && !mentions_about(&link.href) {
            continue;
        }
        match doc.resolve(&link.href) {
            Some(url) => return Some(url),
            None => {
                tracing::debug!(href = %link.href, "skipping unresolvable about candidate");
            }
        }
    }
    None
}

fn mentions_about(s: &str) -> bool {
    s.to_lowercase().contains("about")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> PageDocument {
        PageDocument::new(
            Url::parse("http://example.com").unwrap(),
            html.to_string(),
        )
    }

    #[test]
    fn first_match_wins() {
        let d = doc(
            r#"<a href="/">Home</a>
               <a href="/about">About Us</a>
               <a href="/about-team">About the Team</a>"#,
        );
        assert_eq!(
            find_about_link(&d).unwrap().as_str(),
            "http://example.com/about"
        );
    }

    #[test]
    fn matches_on_href_alone() {
        let d = doc(r#"<a href="/company/about-us">Who we are</a>"#);
        assert_eq!(
            find_about_link(&d).unwrap().as_str(),
            "http://example.com/company/about-us"
        );
    }

    #[test]
    fn matches_case_insensitively() {
        let d = doc(r#"<a href="/team">ABOUT</a>"#);
        assert_eq!(
            find_about_link(&d).unwrap().as_str(),
            "http://example.com/team"
        );
    }

    #[test]
    fn absolute_hrefs_pass_through() {
        let d = doc(r#"<a href="https://corp.example.org/about">About</a>"#);
        assert_eq!(
            find_about_link(&d).unwrap().as_str(),
            "https://corp.example.org/about"
        );
    }

    #[test]
    fn no_match_yields_none() {
        let d = doc(r#"<a href="/">Home</a><a href="/contact">Contact</a>"#);
        assert!(find_about_link(&d).is_none());
    }

    #[test]
    fn unresolvable_candidate_is_skipped() {
        let d = doc(
            r#"<a href="http://[bad">About</a>
               <a href="/about">About Us</a>"#,
        );
        assert_eq!(
            find_about_link(&d).unwrap().as_str(),
            "http://example.com/about"
        );
    }
}
