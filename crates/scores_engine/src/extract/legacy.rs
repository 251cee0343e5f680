//! Legacy line-score tables (early 2000s): `table.linescore`, first cell is the
//! team, last cell is the final score, period columns in between.

use scraper::{ElementRef, Html};

use super::guards::{select, text_of};

pub(super) fn blocks(doc: &Html) -> Vec<ElementRef<'_>> {
    select(doc.root_element(), "table.linescore")
}

pub(super) fn participants(block: ElementRef<'_>) -> Vec<(String, String)> {
    select(block, "tr")
        .into_iter()
        .filter_map(|row| {
            // Header rows are all `th`.
            if select(row, "td").is_empty() {
                return None;
            }
            let cells = select(row, "td, th");
            if cells.len() < 2 {
                return None;
            }
            let team = text_of(*cells.first()?);
            let score = text_of(*cells.last()?);
            Some((team, score))
        })
        .collect()
}
