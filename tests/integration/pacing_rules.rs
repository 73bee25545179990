//! Per-record pacing inside a batch, measured on a paused clock.

use crate::integration::test_utils::{
    bill, credentials, fast_config, quota_exhausted, reply, Scripted, ScriptedGenerator,
};
use billbrief::batch::run_summarization;
use billbrief::config::{BillbriefConfig, PacingConfig};
use billbrief::credentials::CredentialRotator;
use billbrief::error::GenerationError;
use billbrief::store::MemoryStore;
use std::time::Duration;
use tokio::time::Instant;

const INSTRUCTIONS: &str = "Summarize the bill as JSON.";

fn one_second_pacing() -> BillbriefConfig {
    let mut config = fast_config();
    config.pacing = PacingConfig {
        base_interval_secs: 1.0,
        jitter_secs: 0.0,
        min_interval_secs: 0.0,
    };
    config.batch.auto_continue = false;
    config
}

fn bills(count: usize) -> MemoryStore {
    MemoryStore::with_records(
        (1..=count).map(|i| bill(&format!("b{}", i), &format!("220000{}", i))),
    )
}

/// Run one batch and return how long the paused clock advanced.
async fn paced_run(count: usize, script: Vec<Scripted>, keys: &[&str]) -> Duration {
    let store = bills(count);
    let generator = ScriptedGenerator::new(script);
    let config = one_second_pacing();
    let mut rotator = CredentialRotator::new(credentials(keys));

    let started = Instant::now();
    run_summarization(&store, &generator, INSTRUCTIONS, &config, &mut rotator)
        .await
        .unwrap();
    started.elapsed()
}

fn assert_pauses(elapsed: Duration, pauses: u64) {
    let expected = Duration::from_secs(pauses);
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(500),
        "expected {} pauses, clock advanced {:?}",
        pauses,
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn test_pause_between_successes_but_not_after_last() {
    let elapsed = paced_run(3, vec![reply("하나"), reply("둘"), reply("셋")], &["key-one"]).await;
    assert_pauses(elapsed, 2);
}

#[tokio::test(start_paused = true)]
async fn test_rotation_is_not_paced() {
    let elapsed = paced_run(
        3,
        vec![reply("하나"), quota_exhausted(), reply("셋")],
        &["key-one", "key-two"],
    )
    .await;
    assert_pauses(elapsed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_abort_is_not_paced() {
    let elapsed = paced_run(2, vec![reply("하나"), quota_exhausted()], &["key-one"]).await;
    assert_pauses(elapsed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_record_is_paced() {
    let elapsed = paced_run(
        3,
        vec![
            reply("하나"),
            Err(GenerationError::Transport("connection reset".to_string())),
            reply("셋"),
        ],
        &["key-one"],
    )
    .await;
    assert_pauses(elapsed, 2);
}
