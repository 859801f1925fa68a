use std::fs;
use std::path::PathBuf;

use grid_shooter::leaderboard::*;
use grid_shooter::LeaderboardError;

use tempfile::TempDir;

fn scores_path(dir: &TempDir) -> PathBuf {
    dir.path().join("high_scores.txt")
}

fn board(entries: &[(&str, u32)]) -> Leaderboard {
    Leaderboard::from_entries(
        "unused.txt",
        entries
            .iter()
            .map(|(n, s)| LeaderboardEntry::new(*n, *s))
            .collect(),
    )
}

fn names(board: &Leaderboard) -> Vec<&str> {
    board.entries().iter().map(|e| e.name.as_str()).collect()
}

/// Ten entries scoring 12 down to 3.
fn full_board() -> Leaderboard {
    let entries: Vec<_> = (0..10)
        .map(|i| LeaderboardEntry::new(format!("p{i}"), 12 - i))
        .collect();
    Leaderboard::from_entries("unused.txt", entries)
}

fn assert_ranked(board: &Leaderboard) {
    assert!(board.len() <= MAX_HIGH_SCORES);
    assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
}

// ── record_result ─────────────────────────────────────────────────────────────

#[test]
fn first_result_is_inserted() {
    let mut b = Leaderboard::new("unused.txt");
    assert_eq!(b.record_result("Ann", 5), RecordOutcome::Inserted { rank: 1 });
    assert_eq!(b.entries(), &[LeaderboardEntry::new("Ann", 5)]);
}

#[test]
fn zero_score_qualifies_on_short_board() {
    let mut b = Leaderboard::new("unused.txt");
    assert_eq!(b.record_result("Ann", 0), RecordOutcome::Inserted { rank: 1 });
}

#[test]
fn full_board_rejects_score_below_minimum() {
    let mut b = full_board();
    let before = b.entries().to_vec();
    assert!(!b.is_qualifying(2));
    assert_eq!(b.record_result("New", 2), RecordOutcome::NotQualifying);
    assert_eq!(b.entries(), before.as_slice());
}

#[test]
fn full_board_rejects_score_equal_to_minimum() {
    let mut b = full_board();
    assert_eq!(b.record_result("New", 3), RecordOutcome::NotQualifying);
    assert_eq!(b.len(), MAX_HIGH_SCORES);
}

#[test]
fn full_board_evicts_lowest_on_insert() {
    let mut b = full_board();
    assert_eq!(b.record_result("New", 4), RecordOutcome::Inserted { rank: 10 });
    assert_eq!(b.len(), MAX_HIGH_SCORES);
    assert!(b.find("p9").is_none()); // scored 3
    assert_eq!(b.entries()[8], LeaderboardEntry::new("p8", 4));
    assert_eq!(b.entries().last().unwrap(), &LeaderboardEntry::new("New", 4));
    assert_ranked(&b);
}

#[test]
fn same_player_keeps_only_best_score() {
    let mut b = Leaderboard::new("unused.txt");
    b.record_result("Bob", 7);
    b.record_result("Cid", 6);
    assert_eq!(b.record_result("Ann", 5), RecordOutcome::Inserted { rank: 3 });
    assert_eq!(b.record_result("Ann", 3), RecordOutcome::NoChange { existing: 5 });
    assert_eq!(
        b.record_result("Ann", 9),
        RecordOutcome::UpdatedHigher { old: 5, new: 9 }
    );
    assert_eq!(names(&b), vec!["Ann", "Bob", "Cid"]);
    assert_eq!(b.find("Ann").unwrap().score, 9);
    assert_eq!(b.len(), 3);
}

#[test]
fn equal_resubmission_changes_nothing() {
    let mut b = board(&[("Ann", 5), ("Bob", 4)]);
    let before = b.entries().to_vec();
    assert_eq!(b.record_result("Ann", 5), RecordOutcome::NoChange { existing: 5 });
    assert_eq!(b.record_result("Bob", 1), RecordOutcome::NoChange { existing: 4 });
    assert_eq!(b.entries(), before.as_slice());
}

#[test]
fn names_match_case_sensitively() {
    let mut b = board(&[("Ann", 5)]);
    assert_eq!(b.record_result("ann", 2), RecordOutcome::Inserted { rank: 2 });
    assert_eq!(b.len(), 2);
}

#[test]
fn known_player_can_update_even_on_full_board() {
    let mut b = full_board();
    assert_eq!(
        b.record_result("p9", 20),
        RecordOutcome::UpdatedHigher { old: 3, new: 20 }
    );
    assert_eq!(b.entries()[0].name, "p9");
    assert_eq!(b.len(), MAX_HIGH_SCORES);
}

#[test]
fn new_entry_goes_after_equal_scores() {
    let mut b = board(&[("Bob", 5), ("Cid", 3)]);
    assert_eq!(b.record_result("Ann", 5), RecordOutcome::Inserted { rank: 2 });
    assert_eq!(names(&b), vec!["Bob", "Ann", "Cid"]);
}

#[test]
fn updated_entry_stays_behind_equal_scores() {
    let mut b = board(&[("A", 9), ("B", 7), ("C", 5)]);
    b.record_result("C", 7);
    assert_eq!(names(&b), vec!["A", "B", "C"]);
}

// ── queries ───────────────────────────────────────────────────────────────────

#[test]
fn top_is_a_bounded_read_only_view() {
    let b = board(&[("A", 5), ("B", 4), ("C", 3), ("D", 2), ("E", 1)]);
    assert_eq!(b.top(3).len(), 3);
    assert_eq!(b.top(3)[0].name, "A");
    assert_eq!(b.top(20).len(), 5);
    assert_eq!(b.top(0).len(), 0);
    assert_eq!(b.len(), 5);
}

#[test]
fn best_score_and_empty() {
    assert_eq!(Leaderboard::new("x").best_score(), None);
    assert!(Leaderboard::new("x").is_empty());
    assert_eq!(board(&[("A", 4), ("B", 8)]).best_score(), Some(8));
}

#[test]
fn from_entries_sorts_dedupes_and_bounds() {
    let entries: Vec<_> = (0..12)
        .map(|i| LeaderboardEntry::new(format!("p{i}"), i))
        .chain([LeaderboardEntry::new("p11", 2)])
        .collect();
    let b = Leaderboard::from_entries("x", entries);
    assert_eq!(b.len(), MAX_HIGH_SCORES);
    assert_eq!(b.entries()[0], LeaderboardEntry::new("p11", 11));
    assert_eq!(b.entries().iter().filter(|e| e.name == "p11").count(), 1);
    assert_ranked(&b);
}

// ── storage format ────────────────────────────────────────────────────────────

#[test]
fn parse_record_accepts_name_and_score() {
    assert_eq!(
        parse_record("Ann 42", 1).unwrap(),
        LeaderboardEntry::new("Ann", 42)
    );
}

#[test]
fn parse_record_rejects_bad_lines() {
    for bad in ["Ann", "Ann x", "Ann -3", "Ann 4 extra", ""] {
        let err = parse_record(bad, 7).unwrap_err();
        assert!(
            matches!(err, LeaderboardError::MalformedRecord { line: 7, .. }),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn parse_records_stops_at_first_malformed_line() {
    let entries = parse_records("a 5\nbad\nc 3\n");
    assert_eq!(entries, vec![LeaderboardEntry::new("a", 5)]);
}

#[test]
fn parse_records_skips_blank_lines() {
    let entries = parse_records("a 5\n\n   \nb 3\n");
    assert_eq!(entries.len(), 2);
}

#[test]
fn parse_records_reads_at_most_max_entries() {
    let text: String = (0..12).map(|i| format!("p{i} {i}\n")).collect();
    let entries = parse_records(&text);
    assert_eq!(entries.len(), MAX_HIGH_SCORES);
    assert_eq!(entries.last().unwrap().name, "p9");
}

#[test]
fn render_writes_one_line_per_entry() {
    let b = board(&[("Ann", 9), ("Bob", 3)]);
    assert_eq!(render_records(b.entries()), "Ann 9\nBob 3\n");
}

// ── load / save ───────────────────────────────────────────────────────────────

#[test]
fn load_missing_file_gives_empty_board() {
    let dir = TempDir::new().unwrap();
    let b = Leaderboard::load(scores_path(&dir));
    assert!(b.is_empty());
}

#[test]
fn try_load_missing_file_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let err = Leaderboard::try_load(&scores_path(&dir)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn load_unreadable_path_gives_empty_board() {
    let dir = TempDir::new().unwrap();
    // A directory cannot be read as a file.
    let b = Leaderboard::load(dir.path());
    assert!(b.is_empty());
    let err = Leaderboard::try_load(dir.path()).unwrap_err();
    assert!(matches!(err, LeaderboardError::StorageUnavailable { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn load_resorts_with_stable_ties() {
    let dir = TempDir::new().unwrap();
    let path = scores_path(&dir);
    fs::write(&path, "b 3\na 5\nc 3\n").unwrap();
    let b = Leaderboard::load(&path);
    assert_eq!(names(&b), vec!["a", "b", "c"]);
}

#[test]
fn load_keeps_records_before_malformed_line() {
    let dir = TempDir::new().unwrap();
    let path = scores_path(&dir);
    fs::write(&path, "a 5\nb 4\nnot-a-record\nc 9\n").unwrap();
    let b = Leaderboard::load(&path);
    assert_eq!(names(&b), vec!["a", "b"]);
}

#[test]
fn load_collapses_duplicate_names_to_best() {
    let dir = TempDir::new().unwrap();
    let path = scores_path(&dir);
    fs::write(&path, "a 3\nb 4\na 7\n").unwrap();
    let b = Leaderboard::load(&path);
    assert_eq!(
        b.entries(),
        &[LeaderboardEntry::new("a", 7), LeaderboardEntry::new("b", 4)]
    );
}

#[test]
fn save_then_load_restores_board() {
    let dir = TempDir::new().unwrap();
    let path = scores_path(&dir);
    let mut b = Leaderboard::new(&path);
    b.record_result("Ann", 5);
    b.record_result("Bob", 8);
    b.save().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "Bob 8\nAnn 5\n");
    assert_eq!(Leaderboard::load(&path).entries(), b.entries());
}

#[test]
fn save_of_load_is_byte_stable() {
    let dir = TempDir::new().unwrap();
    let path = scores_path(&dir);
    fs::write(&path, "b 3\na 5\n\nc 3\nd 11\n").unwrap();

    Leaderboard::load(&path).save().unwrap();
    let first = fs::read(&path).unwrap();
    Leaderboard::load(&path).save().unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(String::from_utf8(first).unwrap(), "d 11\na 5\nb 3\nc 3\n");
}

#[test]
fn save_truncates_previous_content() {
    let dir = TempDir::new().unwrap();
    let path = scores_path(&dir);
    fs::write(&path, "x 1\ny 2\nz 3\nw 4\n").unwrap();
    let b = Leaderboard::from_entries(&path, vec![LeaderboardEntry::new("only", 1)]);
    b.save().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "only 1\n");
}

#[test]
fn save_creates_missing_parent_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("scores.txt");
    let b = Leaderboard::from_entries(&path, vec![LeaderboardEntry::new("Ann", 1)]);
    b.save().unwrap();
    assert!(path.exists());
}

#[test]
fn save_failure_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    let b = Leaderboard::from_entries(dir.path(), vec![LeaderboardEntry::new("Ann", 1)]);
    let err = b.save().unwrap_err();
    assert!(matches!(err, LeaderboardError::StorageWriteFailed { .. }));
    assert!(err.to_string().contains("could not save high scores"));
    // The in-memory board is untouched.
    assert_eq!(b.len(), 1);
}

#[test]
fn record_and_save_persists_only_changes() {
    let dir = TempDir::new().unwrap();
    let path = scores_path(&dir);
    let mut b = Leaderboard::new(&path);

    let (outcome, saved) = b.record_and_save("Ann", 5);
    assert_eq!(outcome, RecordOutcome::Inserted { rank: 1 });
    assert!(saved.is_ok());
    assert_eq!(fs::read_to_string(&path).unwrap(), "Ann 5\n");

    fs::remove_file(&path).unwrap();
    let (outcome, saved) = b.record_and_save("Ann", 2);
    assert_eq!(outcome, RecordOutcome::NoChange { existing: 5 });
    assert!(saved.is_ok());
    assert!(!path.exists());
}
