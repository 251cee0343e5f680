//! Turns a box score page into validated game records.
//!
//! The site's markup changed several times, so extraction is an ordered list
//! of independent format strategies. The first one that produces at least one
//! accepted record wins; a strategy that only finds rejected blocks falls
//! through to the next, since formats overlapped during transition years.

mod current;
mod guards;
mod inline;
mod legacy;

use std::collections::HashSet;

use chrono::NaiveDate;
use scores_core::{format_date, GameRecord, RawCandidate, RecordRejection};
use scores_logging::scrape_debug;
use scraper::{ElementRef, Html};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionStrategy {
    Current,
    LegacyTable,
    OldestInline,
}

impl ExtractionStrategy {
    pub const PRIORITY: [ExtractionStrategy; 3] = [
        ExtractionStrategy::Current,
        ExtractionStrategy::LegacyTable,
        ExtractionStrategy::OldestInline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExtractionStrategy::Current => "current",
            ExtractionStrategy::LegacyTable => "legacy-table",
            ExtractionStrategy::OldestInline => "oldest-inline",
        }
    }

    fn blocks(self, doc: &Html) -> Vec<ElementRef<'_>> {
        match self {
            ExtractionStrategy::Current => current::blocks(doc),
            ExtractionStrategy::LegacyTable => legacy::blocks(doc),
            ExtractionStrategy::OldestInline => inline::blocks(doc),
        }
    }

    fn matches_date(self, block: ElementRef<'_>, date_str: &str) -> bool {
        match self {
            ExtractionStrategy::Current => current::matches_date(block, date_str),
            ExtractionStrategy::LegacyTable | ExtractionStrategy::OldestInline => {
                guards::matches_target_date(block, date_str)
            }
        }
    }

    fn participants(self, block: ElementRef<'_>) -> Vec<(String, String)> {
        match self {
            ExtractionStrategy::Current => current::participants(block),
            ExtractionStrategy::LegacyTable => legacy::participants(block),
            ExtractionStrategy::OldestInline => inline::participants(block),
        }
    }

    /// Applies the guards and validation to one block.
    fn candidate(
        self,
        block: ElementRef<'_>,
        date: NaiveDate,
        date_str: &str,
    ) -> Result<GameRecord, RecordRejection> {
        if guards::is_non_qualifying(block) {
            return Err(RecordRejection::NonQualifying);
        }
        if !self.matches_date(block, date_str) {
            return Err(RecordRejection::DateMismatch);
        }
        RawCandidate {
            participants: self.participants(block),
            overtime: guards::has_overtime_token(block),
        }
        .into_record(date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionResult {
    pub records: Vec<GameRecord>,
    /// Distinct page blocks that no tried strategy accepted. A block read by
    /// several strategies counts once.
    pub rejected: usize,
    /// Strategy whose records were accepted, if any.
    pub strategy: Option<ExtractionStrategy>,
}

#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    strategies: Vec<ExtractionStrategy>,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(ExtractionStrategy::PRIORITY.to_vec())
    }
}

impl ExtractionPipeline {
    pub fn new(strategies: Vec<ExtractionStrategy>) -> Self {
        Self { strategies }
    }

    /// A page with no accepted records is a valid empty result.
    pub fn extract(&self, html: &str, date: NaiveDate) -> ExtractionResult {
        let doc = Html::parse_document(html);
        let date_str = format_date(date);
        let mut result = ExtractionResult::default();
        let mut rejected_blocks = HashSet::new();

        for &strategy in &self.strategies {
            let blocks = strategy.blocks(&doc);
            if blocks.is_empty() {
                continue;
            }
            let mut records = Vec::new();
            let mut accepted = Vec::new();
            for block in blocks {
                match strategy.candidate(block, date, &date_str) {
                    Ok(record) => {
                        accepted.push(block.id());
                        records.push(record);
                    }
                    Err(reason) => {
                        scrape_debug!("{} block rejected: {}", strategy.name(), reason);
                        rejected_blocks.insert(block.id());
                    }
                }
            }
            if !records.is_empty() {
                for id in &accepted {
                    rejected_blocks.remove(id);
                }
                result.records = records;
                result.strategy = Some(strategy);
                break;
            }
        }

        result.rejected = rejected_blocks.len();
        result
    }
}
