use std::fs;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use scores_core::GameRecord;
use scores_engine::OutputStore;
use tempfile::TempDir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn game(date: NaiveDate, home: &str, away: &str, h: u32, a: u32, ot: bool) -> GameRecord {
    GameRecord::new(date, home, away, h, a, ot).unwrap()
}

#[test]
fn first_append_writes_header_once() {
    let temp = TempDir::new().unwrap();
    let store = OutputStore::new(temp.path().join("nested").join("scores_clean.csv"));

    store
        .append(&[game(d(2021, 11, 9), "Team A", "Team B", 70, 65, false)])
        .unwrap();
    store
        .append(&[game(d(2021, 11, 10), "St. John's (NY)", "Texas A&M, Corpus", 80, 79, true)])
        .unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    assert_eq!(
        text,
        "date,home_team,away_team,home,away,total,margin,ot\n\
         2021-11-09,Team A,Team B,70,65,135,5,0\n\
         2021-11-10,St. John's (NY),\"Texas A&M, Corpus\",80,79,159,1,1\n"
    );
}

#[test]
fn empty_append_does_not_create_file() {
    let temp = TempDir::new().unwrap();
    let store = OutputStore::new(temp.path().join("scores_clean.csv"));
    assert_eq!(store.append(&[]).unwrap(), 0);
    assert!(!store.path().exists());
}

#[test]
fn read_back_recomputes_derived_columns() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scores_clean.csv");
    fs::write(
        &path,
        "date,home_team,away_team,home,away,total,margin,ot\n\
         11/9/2021,Team A,Team B,70,65,999,-999,True\n\
         2021-11-10,,Team D,50,40,90,10,0\n\
         2021-11-11,Team E,Team F,61,63,124,-2,0\n",
    )
    .unwrap();
    let store = OutputStore::new(path);

    let records = store.read_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date(), d(2021, 11, 9));
    assert_eq!(records[0].total(), 135);
    assert_eq!(records[0].margin(), 5);
    assert!(records[0].overtime());
    assert_eq!(records[1].margin(), -2);

    let dates = store.existing_dates().unwrap();
    assert_eq!(dates.into_iter().collect::<Vec<_>>(), vec![d(2021, 11, 9), d(2021, 11, 11)]);
}

#[test]
fn append_after_torn_row_starts_new_line() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("scores_clean.csv");
    fs::write(
        &path,
        "date,home_team,away_team,home,away,total,margin,ot\n2021-11-09,Team A,Te",
    )
    .unwrap();
    let store = OutputStore::new(path);
    store
        .append(&[game(d(2021, 11, 10), "Team C", "Team D", 60, 50, false)])
        .unwrap();

    let records = store.read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].home_team(), "Team C");
}

#[test]
fn missing_file_has_no_dates() {
    let temp = TempDir::new().unwrap();
    let store = OutputStore::new(temp.path().join("absent.csv"));
    assert!(store.existing_dates().unwrap().is_empty());
    assert!(store.existing_keys().unwrap().is_empty());
}
