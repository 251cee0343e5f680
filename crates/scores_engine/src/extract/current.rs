//! Current scoreboard markup: one `div.game_summary` per game, a `table.teams`
//! with one row per participant and a `td.gamelink` pointing at the box score.

use scraper::{ElementRef, Html};

use super::guards::{href, select, text_of};

const DETAIL_LINK: &str = "td.gamelink a[href*='/boxscores/']";

pub(super) fn blocks(doc: &Html) -> Vec<ElementRef<'_>> {
    select(doc.root_element(), "div.game_summary")
        .into_iter()
        .filter(|block| !select(*block, DETAIL_LINK).is_empty())
        .collect()
}

/// Only the game link counts here; echoed links elsewhere in the block are ignored.
pub(super) fn matches_date(block: ElementRef<'_>, date_str: &str) -> bool {
    select(block, DETAIL_LINK)
        .into_iter()
        .filter_map(href)
        .any(|h| h.contains(date_str))
}

pub(super) fn participants(block: ElementRef<'_>) -> Vec<(String, String)> {
    select(block, "table.teams tr")
        .into_iter()
        .filter_map(|row| {
            let team = select(row, "td a[href*='/schools/']").into_iter().next()?;
            let score = select(row, "td.right")
                .into_iter()
                .find(|cell| !cell.value().classes().any(|c| c == "gamelink"))?;
            Some((text_of(team), text_of(score)))
        })
        .collect()
}
