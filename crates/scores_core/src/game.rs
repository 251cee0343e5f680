use chrono::NaiveDate;
use thiserror::Error;

/// One completed game.
///
/// `total` and `margin` are always derived from the two scores; there is no way
/// to construct a record that carries source-provided values for them.
/// `margin` is signed: `home - away`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    date: NaiveDate,
    home_team: String,
    away_team: String,
    home: u32,
    away: u32,
    total: u64,
    margin: i64,
    overtime: bool,
}

impl GameRecord {
    /// Builds a validated record. Team names are trimmed and must be non-empty.
    pub fn new(
        date: NaiveDate,
        home_team: &str,
        away_team: &str,
        home: u32,
        away: u32,
        overtime: bool,
    ) -> Result<Self, RecordRejection> {
        let home_team = home_team.trim();
        let away_team = away_team.trim();
        if home_team.is_empty() || away_team.is_empty() {
            return Err(RecordRejection::EmptyTeamName);
        }
        Ok(Self {
            date,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home,
            away,
            total: u64::from(home) + u64::from(away),
            margin: i64::from(home) - i64::from(away),
            overtime,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn home_team(&self) -> &str {
        &self.home_team
    }

    pub fn away_team(&self) -> &str {
        &self.away_team
    }

    pub fn home(&self) -> u32 {
        self.home
    }

    pub fn away(&self) -> u32 {
        self.away
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn margin(&self) -> i64 {
        self.margin
    }

    pub fn overtime(&self) -> bool {
        self.overtime
    }

    pub fn key(&self) -> DedupKey {
        DedupKey {
            date: self.date,
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            home: self.home,
            away: self.away,
        }
    }
}

/// Identity of a game occurrence, shared by the intra-day and cross-dataset passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home: u32,
    pub away: u32,
}

/// Why a candidate block did not become a record. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejection {
    #[error("fewer than two participants resolved ({0})")]
    MissingParticipants(usize),
    #[error("team name empty after trimming")]
    EmptyTeamName,
    #[error("score {0:?} is not a non-negative integer")]
    InvalidScore(String),
    #[error("no detail link or identifier for the target date")]
    DateMismatch,
    #[error("non-qualifying competition class")]
    NonQualifying,
}

/// Participant text as located on the page, before validation.
///
/// Participants are in page order: the first row is the away team, the
/// second the home team.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCandidate {
    pub participants: Vec<(String, String)>,
    pub overtime: bool,
}

impl RawCandidate {
    pub fn into_record(self, date: NaiveDate) -> Result<GameRecord, RecordRejection> {
        let count = self.participants.len();
        let mut rows = self.participants.into_iter();
        let (Some((away_team, away_raw)), Some((home_team, home_raw))) = (rows.next(), rows.next())
        else {
            return Err(RecordRejection::MissingParticipants(count));
        };
        let away = parse_score(&away_raw)?;
        let home = parse_score(&home_raw)?;
        GameRecord::new(date, &home_team, &away_team, home, away, self.overtime)
    }
}

fn parse_score(raw: &str) -> Result<u32, RecordRejection> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| RecordRejection::InvalidScore(trimmed.to_string()))
}
