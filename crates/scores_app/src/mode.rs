use anyhow::{bail, Context};
use chrono::NaiveDate;

const USAGE: &str = "usage: score_scraper [nightly | full <start> <end> | rescrape]";

/// Which entry point a run goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Yesterday only.
    Nightly,
    /// Every in-season day of the inclusive range.
    Full { start: NaiveDate, end: NaiveDate },
    /// Days the ledger reports as failed or empty.
    Rescrape,
}

impl Mode {
    /// No arguments means `nightly`.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mode = match args.next().as_deref() {
            None | Some("nightly") => Mode::Nightly,
            Some("rescrape") => Mode::Rescrape,
            Some("full") => {
                let start = parse_iso(args.next(), "start")?;
                let end = parse_iso(args.next(), "end")?;
                if end < start {
                    bail!("end date {end} is before start date {start}");
                }
                Mode::Full { start, end }
            }
            Some(other) => bail!("unknown mode {other:?}; {USAGE}"),
        };
        if let Some(extra) = args.next() {
            bail!("unexpected argument {extra:?}; {USAGE}");
        }
        Ok(mode)
    }
}

fn parse_iso(raw: Option<String>, which: &str) -> anyhow::Result<NaiveDate> {
    let raw = raw.with_context(|| format!("missing {which} date; {USAGE}"))?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .with_context(|| format!("{which} date {raw:?} is not YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Mode> {
        Mode::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_to_nightly() {
        assert_eq!(parse(&[]).unwrap(), Mode::Nightly);
        assert_eq!(parse(&["nightly"]).unwrap(), Mode::Nightly);
        assert_eq!(parse(&["rescrape"]).unwrap(), Mode::Rescrape);
    }

    #[test]
    fn full_takes_an_inclusive_iso_range() {
        assert_eq!(
            parse(&["full", "2021-11-09", "2022-04-04"]).unwrap(),
            Mode::Full {
                start: NaiveDate::from_ymd_opt(2021, 11, 9).unwrap(),
                end: NaiveDate::from_ymd_opt(2022, 4, 4).unwrap(),
            }
        );
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&["full", "2021-11-09"]).is_err());
        assert!(parse(&["full", "11/9/2021", "2021-11-10"]).is_err());
        assert!(parse(&["full", "2021-11-10", "2021-11-09"]).is_err());
        assert!(parse(&["weekly"]).is_err());
        assert!(parse(&["rescrape", "now"]).is_err());
    }
}
