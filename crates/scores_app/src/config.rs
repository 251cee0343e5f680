//! Optional RON configuration for the binary.
//!
//! Every field may be omitted; missing fields keep the engine defaults.
//! Durations are written as seconds.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use log::LevelFilter;
use scores_core::Season;
use scores_engine::{EngineConfig, JitterRange, ResumeSource};
use scores_logging::LogDestination;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "scores.ron";
pub const CONFIG_ENV: &str = "SCORES_CONFIG";
const LOG_FILENAME: &str = "score_scraper.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogTarget {
    File,
    Terminal,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    /// Defaults to a file inside `output_dir`.
    pub log_file: Option<PathBuf>,
    pub log_target: LogTarget,
    pub log_level: LogLevel,
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout_secs: Option<f64>,
    pub max_attempts: Option<u32>,
    pub base_delay_secs: Option<f64>,
    pub jitter_secs: Option<(f64, f64)>,
    pub after_success_secs: Option<f64>,
    pub between_days_secs: Option<(f64, f64)>,
    pub season_months: Option<Vec<u32>>,
    pub resume: ResumeSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            log_file: None,
            log_target: LogTarget::default(),
            log_level: LogLevel::default(),
            base_url: None,
            user_agent: None,
            request_timeout_secs: None,
            max_attempts: None,
            base_delay_secs: None,
            jitter_secs: None,
            after_success_secs: None,
            between_days_secs: None,
            season_months: None,
            resume: ResumeSource::default(),
        }
    }
}

impl AppConfig {
    /// Reads `$SCORES_CONFIG` if set, otherwise `./scores.ron` when present.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => match Self::from_file(Path::new(CONFIG_FILENAME)) {
                Err(err) if is_not_found(&err) => Ok(Self::default()),
                other => other,
            },
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {path:?}"))?;
        Self::from_ron(&text).with_context(|| format!("invalid config file {path:?}"))
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join(LOG_FILENAME))
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log_target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }

    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = EngineConfig::default_with_output(self.output_dir.clone());
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(user_agent) = &self.user_agent {
            config.fetch.user_agent = user_agent.clone();
        }
        if let Some(secs) = self.request_timeout_secs {
            config.fetch.request_timeout = seconds(secs, "request_timeout_secs")?;
        }
        if let Some(attempts) = self.max_attempts {
            if attempts == 0 {
                bail!("max_attempts must be at least 1");
            }
            config.retry.max_attempts = attempts;
        }
        if let Some(secs) = self.base_delay_secs {
            config.retry.base_delay = seconds(secs, "base_delay_secs")?;
        }
        if let Some(range) = self.jitter_secs {
            config.retry.jitter = jitter(range, "jitter_secs")?;
        }
        if let Some(secs) = self.after_success_secs {
            config.pacing.after_success = seconds(secs, "after_success_secs")?;
        }
        if let Some(range) = self.between_days_secs {
            config.pacing.between_days = jitter(range, "between_days_secs")?;
        }
        if let Some(months) = &self.season_months {
            let season = Season::from_months(months.iter().copied());
            if season.months().next().is_none() {
                bail!("season_months has no month in 1..=12");
            }
            config.season = season;
        }
        config.resume = self.resume;
        Ok(config)
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == ErrorKind::NotFound)
    })
}

fn seconds(secs: f64, field: &str) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{field} must be a non-negative number of seconds, got {secs}"))
}

fn jitter((min, max): (f64, f64), field: &str) -> anyhow::Result<JitterRange> {
    Ok(JitterRange::new(seconds(min, field)?, seconds(max, field)?))
}
