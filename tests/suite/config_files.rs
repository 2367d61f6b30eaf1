//! Config files driving the primitives.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use corral_config::{ConfigError, CorralConfig};
use corral_core::{BatchScheduler, run_bounded};

#[tokio::test(start_paused = true)]
async fn configured_limits_reach_runner_and_scheduler() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[runner]\nconcurrency = 3\n\n[batch]\ndelay_ms = 40\n").unwrap();

    let config = CorralConfig::load_from(&path).unwrap();

    let doubled = run_bounded(
        vec![1, 2, 3, 4],
        |n, _| async move { Ok::<_, String>(n * 2) },
        config.runner.concurrency,
    )
    .await
    .unwrap();
    assert_eq!(doubled, vec![2, 4, 6, 8]);

    let scheduler = BatchScheduler::new(|batch: Vec<u8>| async move { Ok::<_, String>(batch.len()) })
        .with_delay(config.batch.delay);
    assert_eq!(scheduler.delay().as_duration(), Duration::from_millis(40));

    let started = tokio::time::Instant::now();
    let size = scheduler.schedule(1).await.unwrap();
    assert_eq!(size, 1);
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[test]
fn invalid_config_file_names_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[runner]\nconcurrency = 0\n").unwrap();

    let err = CorralConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"), "{err}");
}
