//! Run journal persistence across reopen, ordering, and pruning.

use billbrief::journal::{RunJournal, RunRecord, RunSettings, RunStatus};
use chrono::{Duration, NaiveDate};
use tempfile::TempDir;

fn record_started_minutes_ago(minutes: i64) -> RunRecord {
    let mut record = RunRecord::start(RunSettings {
        model: "gemini-2.5-flash".to_string(),
        batch_size: 50,
        cutoff: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        credentials: 1,
        max_batches: Some(3),
    });
    record.started_at -= Duration::minutes(minutes);
    record.run_id = record.started_at.format("%Y%m%dT%H%M%S%.6fZ").to_string();
    record
}

#[test]
fn test_runs_survive_reopen_newest_first() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("journal");

    let oldest = record_started_minutes_ago(30);
    let middle = record_started_minutes_ago(20);
    let newest = record_started_minutes_ago(10);
    {
        let journal = RunJournal::open(&path).unwrap();
        for record in [&middle, &newest, &oldest] {
            journal.put_run(record).unwrap();
        }
    }

    let journal = RunJournal::open(&path).unwrap();
    let runs = journal.list_runs(10).unwrap();
    let ids: Vec<&str> = runs.iter().map(|r| r.run_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            newest.run_id.as_str(),
            middle.run_id.as_str(),
            oldest.run_id.as_str()
        ]
    );
    assert_eq!(journal.list_runs(2).unwrap().len(), 2);
    assert_eq!(journal.get_run(&middle.run_id).unwrap(), Some(middle.clone()));
}

#[test]
fn test_prune_keeps_newest_runs() {
    let temp_dir = TempDir::new().unwrap();
    let journal = RunJournal::open(&temp_dir.path().join("journal")).unwrap();
    let records: Vec<RunRecord> = (1..=5).map(|m| record_started_minutes_ago(m * 5)).collect();
    for record in &records {
        journal.put_run(record).unwrap();
    }

    assert_eq!(journal.prune(2).unwrap(), 3);
    let kept: Vec<String> = journal
        .list_runs(10)
        .unwrap()
        .into_iter()
        .map(|r| r.run_id)
        .collect();
    assert_eq!(kept, vec![records[0].run_id.clone(), records[1].run_id.clone()]);
    assert_eq!(journal.prune(2).unwrap(), 0);
}

#[test]
fn test_unfinished_runs_become_interrupted_on_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("journal");
    let stale = record_started_minutes_ago(60);
    let mut done = record_started_minutes_ago(30);
    done.fail("connection refused");
    {
        let journal = RunJournal::open(&path).unwrap();
        journal.put_run(&stale).unwrap();
        journal.put_run(&done).unwrap();
    }

    let journal = RunJournal::open(&path).unwrap();
    assert_eq!(journal.mark_interrupted_runs().unwrap(), 1);
    let stale = journal.get_run(&stale.run_id).unwrap().unwrap();
    assert_eq!(stale.status, RunStatus::Interrupted);
    let done = journal.get_run(&done.run_id).unwrap().unwrap();
    assert_eq!(done.status, RunStatus::Failed);
    assert_eq!(journal.mark_interrupted_runs().unwrap(), 0);
}
