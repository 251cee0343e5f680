//! Oldest inline summaries: `div.game_summary` blocks without a game-link
//! cell. Team names are not always linked and the score may sit in any cell
//! after the name.

use scraper::{ElementRef, Html};

use super::guards::{select, text_of};

pub(super) fn blocks(doc: &Html) -> Vec<ElementRef<'_>> {
    select(doc.root_element(), "div.game_summary")
}

pub(super) fn participants(block: ElementRef<'_>) -> Vec<(String, String)> {
    select(block, "table.teams tr")
        .into_iter()
        .filter_map(|row| {
            let cells = select(row, "td");
            let team = match select(row, "a[href*='/schools/']").into_iter().next() {
                Some(link) => text_of(link),
                None => text_of(*cells.first()?),
            };
            let score = cells
                .iter()
                .find(|cell| {
                    let classes: Vec<_> = cell.value().classes().collect();
                    classes.contains(&"right") && !classes.contains(&"gamelink")
                })
                .or_else(|| cells.get(1))?;
            Some((team, text_of(*score)))
        })
        .collect()
}
