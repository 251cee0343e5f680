use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use scores_core::{
    completed_dates, reconcile_failed_dates, LedgerEntry, LedgerOutcome,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn lines_use_the_games_scraped_format() {
    let entry = LedgerEntry::new(d(2021, 11, 9), LedgerOutcome::Scraped { games: 12 });
    assert_eq!(entry.to_line(), "2021-11-09: 12 games scraped");
    assert_eq!(LedgerEntry::parse_line(&entry.to_line()), Some(entry));

    let failed = LedgerEntry::new(
        d(2021, 11, 10),
        LedgerOutcome::Failed {
            reason: "Failed to load scoreboard (http status 404)".into(),
        },
    );
    assert_eq!(
        failed.to_line(),
        "2021-11-10: Failed to load scoreboard (http status 404)"
    );
    assert_eq!(LedgerEntry::parse_line(&failed.to_line()), Some(failed));
}

#[test]
fn parse_tolerates_brackets_and_rejects_garbage() {
    let entry = LedgerEntry::parse_line("[2003-01-04]: 3 games scraped").unwrap();
    assert_eq!(entry.date, d(2003, 1, 4));
    assert_eq!(entry.outcome, LedgerOutcome::Scraped { games: 3 });
    assert_eq!(LedgerEntry::parse_line("Starting rebuild"), None);
    assert_eq!(LedgerEntry::parse_line(""), None);
}

#[test]
fn completed_dates_skip_failures_but_keep_empty_days() {
    let entries = [
        LedgerEntry::new(d(2021, 11, 9), LedgerOutcome::Scraped { games: 4 }),
        LedgerEntry::new(d(2021, 11, 10), LedgerOutcome::Scraped { games: 0 }),
        LedgerEntry::new(
            d(2021, 11, 11),
            LedgerOutcome::Failed {
                reason: "Failed to load scoreboard".into(),
            },
        ),
    ];
    let done = completed_dates(&entries);
    assert!(done.contains(&d(2021, 11, 9)));
    assert!(done.contains(&d(2021, 11, 10)));
    assert!(!done.contains(&d(2021, 11, 11)));
}

#[test]
fn later_success_keeps_date_completed() {
    let entries = [
        LedgerEntry::new(
            d(2021, 11, 11),
            LedgerOutcome::Failed {
                reason: "Failed to load scoreboard".into(),
            },
        ),
        LedgerEntry::new(d(2021, 11, 11), LedgerOutcome::Scraped { games: 2 }),
    ];
    assert!(completed_dates(&entries).contains(&d(2021, 11, 11)));
}

#[test]
fn reconciliation_finds_zero_game_and_failure_lines() {
    let log = "\
2021-11-09: 10 games scraped
2021-11-10: 0 games scraped
2021-11-11: Failed to load scoreboard (timeout)
2021-11-12: ❌ gave up after 4 attempts
2021-11-10: 0 games scraped
garbage line
2021-11-13: Failed to persist rows (io error)
";
    assert_eq!(
        reconcile_failed_dates(log.lines()),
        vec![
            d(2021, 11, 10),
            d(2021, 11, 11),
            d(2021, 11, 12),
            d(2021, 11, 13)
        ]
    );
}

#[test]
fn reconciliation_drops_dates_recovered_later() {
    let log = "\
2021-11-10: 0 games scraped
2021-11-11: Failed to load scoreboard (timeout)
2021-11-11: 6 games scraped
";
    assert_eq!(reconcile_failed_dates(log.lines()), vec![d(2021, 11, 10)]);
}
