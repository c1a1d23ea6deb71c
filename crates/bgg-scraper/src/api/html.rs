//! Publisher directory page parsing.

use scraper::{Html, Selector};

use crate::error::{FetchError, Result};

/// Find the publisher ID in a directory listing page.
///
/// Publisher links look like `/boardgamepublisher/<id>/<slug>`; the first
/// anchor whose href contains `slug` wins and the ID is the third
/// `/`-separated segment.
pub fn find_publisher_id(html: &str, slug: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let anchor_selector =
        Selector::parse("a[href]").map_err(|e| FetchError::Parse(e.to_string()))?;

    let id = document
        .select(&anchor_selector)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(slug))
        .and_then(|href| href.split('/').nth(2))
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTORY: &str = r#"<!DOCTYPE html>
<html><body>
<table id="collectionitems">
  <tr><td><a href="/boardgamepublisher/51011/1-2-3-games">1-2-3 Games</a></td></tr>
  <tr><td><a href="/boardgamepublisher/45230/4am-brain-llc">4am Brain LLC</a></td></tr>
  <tr><td><a href="/boardgamepublisher/45230/4am-brain-llc/linkeditems">Games</a></td></tr>
  <tr><td><a>no href</a></td></tr>
</table>
</body></html>"#;

    #[test]
    fn test_finds_first_matching_link() {
        assert_eq!(
            find_publisher_id(DIRECTORY, "4am-brain-llc").unwrap(),
            Some("45230".to_string())
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(find_publisher_id(DIRECTORY, "kosmos").unwrap(), None);
    }

    #[test]
    fn test_short_href_is_a_miss() {
        let html = r#"<a href="kosmos">KOSMOS</a>"#;
        assert_eq!(find_publisher_id(html, "kosmos").unwrap(), None);
    }
}
