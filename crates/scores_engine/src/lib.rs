//! Score scraper engine: fetching, extraction, persistence and the day loop.
mod client;
mod config;
mod decode;
mod extract;
mod fetch;
mod ledger;
mod orchestrator;
mod pacing;
mod persist;
mod store;
mod types;

pub use client::RequestClient;
pub use config::{EngineConfig, ResumeSource, DEFAULT_BASE_URL, LEDGER_FILENAME, OUTPUT_FILENAME};
pub use decode::{decode_html, decode_page, DecodedPage, EncodingSource};
pub use extract::{ExtractionPipeline, ExtractionResult, ExtractionStrategy};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use ledger::{LedgerError, ProgressLedger};
pub use orchestrator::{DayReport, EngineError, Orchestrator, RunSummary};
pub use pacing::{JitterRange, PacingPolicy, Pause, PauseKind, RetryPolicy, TokioPause};
pub use persist::{ensure_output_dir, ensure_parent_dir, PersistError};
pub use store::{OutputStore, StoreError, HEADER};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
