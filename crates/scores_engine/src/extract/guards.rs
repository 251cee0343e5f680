//! Block-level checks shared by every format strategy, plus small DOM helpers.

use scraper::{ElementRef, Selector};

const DETAIL_LINK: &str = "a[href*='/boxscores/']";
const WOMENS_DESCRIPTORS: &[&str] = &["Women's", "Women\u{2019}s"];

pub(crate) fn select<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => scope.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// Text content with runs of whitespace (including `&nbsp;`) collapsed.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn href(element: ElementRef<'_>) -> Option<&str> {
    element.value().attr("href")
}

/// True if any detail link in `scope`, or the block's `id`, carries `date_str`.
pub(crate) fn matches_target_date(block: ElementRef<'_>, date_str: &str) -> bool {
    let id_matches = block
        .value()
        .id()
        .is_some_and(|id| id.contains(date_str));
    id_matches
        || select(block, DETAIL_LINK)
            .into_iter()
            .filter_map(href)
            .any(|h| h.contains(date_str))
}

/// Two independent signals for a non-qualifying (women's) competition block:
/// a structural marker in classes or program links, and a textual descriptor.
/// Either one is enough to discard the block.
pub(crate) fn is_non_qualifying(block: ElementRef<'_>) -> bool {
    has_structural_marker(block) || has_textual_descriptor(block)
}

fn has_structural_marker(block: ElementRef<'_>) -> bool {
    let class_marker = block.value().classes().any(|class| {
        class.eq_ignore_ascii_case("gender-f") || class.to_ascii_lowercase().contains("women")
    });
    class_marker
        || select(block, "a[href]")
            .into_iter()
            .filter_map(href)
            .any(|h| h.to_ascii_lowercase().contains("/women/"))
}

fn has_textual_descriptor(block: ElementRef<'_>) -> bool {
    let text = text_of(block);
    WOMENS_DESCRIPTORS.iter().any(|d| text.contains(d))
}

/// Looks for an `OT` token (also `2OT`, `3OT`) anywhere in the block text.
pub(crate) fn has_overtime_token(block: ElementRef<'_>) -> bool {
    text_of(block)
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| {
            token
                .strip_suffix("OT")
                .is_some_and(|prefix| prefix.chars().all(|c| c.is_ascii_digit()))
        })
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    fn first_div(html: &str) -> (Html, Selector) {
        (Html::parse_fragment(html), Selector::parse("div").unwrap())
    }

    #[test]
    fn overtime_token_needs_word_boundary() {
        let (doc, sel) = first_div("<div>Final (2OT)</div>");
        assert!(has_overtime_token(doc.select(&sel).next().unwrap()));

        let (doc, sel) = first_div("<div>Scotty BOTTS Final</div>");
        assert!(!has_overtime_token(doc.select(&sel).next().unwrap()));
    }

    #[test]
    fn womens_descriptor_or_marker_is_enough() {
        let (doc, sel) = first_div("<div class='game_summary'>Women's Basketball</div>");
        assert!(is_non_qualifying(doc.select(&sel).next().unwrap()));

        let (doc, sel) = first_div("<div class='game_summary gender-f'>Final</div>");
        assert!(is_non_qualifying(doc.select(&sel).next().unwrap()));

        let (doc, sel) =
            first_div("<div><a href='/cbb/schools/duke/women/2022.html'>Duke</a></div>");
        assert!(is_non_qualifying(doc.select(&sel).next().unwrap()));

        let (doc, sel) = first_div("<div class='game_summary gender-m'>Men's</div>");
        assert!(!is_non_qualifying(doc.select(&sel).next().unwrap()));
    }

    #[test]
    fn date_guard_accepts_link_or_id() {
        let (doc, sel) = first_div(
            "<div><a href='/cbb/boxscores/2021-11-09-19-duke.html'>Final</a></div>",
        );
        let block = doc.select(&sel).next().unwrap();
        assert!(matches_target_date(block, "2021-11-09"));
        assert!(!matches_target_date(block, "2021-11-10"));

        let (doc, sel) = first_div("<div id='game-2003-01-04-duke'>Duke 70</div>");
        assert!(matches_target_date(doc.select(&sel).next().unwrap(), "2003-01-04"));
    }
}
