//! Chains, bounded runs and adapters composed end to end.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use corral_adapters::{CallError, call};
use corral_core::run_bounded;
use corral_sequence::{Chain, chainable};
use corral_types::Concurrency;

use crate::common::Gauge;

#[tokio::test(start_paused = true)]
async fn chain_filters_maps_and_reduces_in_order() {
    let gauge = Arc::new(Gauge::default());
    let tracked = Arc::clone(&gauge);

    let words = chainable::<_, String>(vec!["ox", "heron", "", "elk", "marmot", "", "yak"])
        .filter(|word, _| {
            let keep = !word.is_empty();
            async move { Ok(keep) }
        })
        .map(
            move |word, index| {
                let gauge = Arc::clone(&tracked);
                async move {
                    gauge.enter();
                    tokio::time::sleep(Duration::from_millis(10 * (5 - index as u64))).await;
                    gauge.exit();
                    Ok(word.to_uppercase())
                }
            },
            Some(Concurrency::new(2).unwrap()),
        )
        .reduce(
            |mut joined: String, word, _| async move {
                if !joined.is_empty() {
                    joined.push(' ');
                }
                joined.push_str(&word);
                Ok(joined)
            },
            String::new(),
        )
        .await
        .unwrap();

    assert_eq!(words, "OX HERON ELK MARMOT YAK");
    assert_eq!(gauge.peak(), 2);
}

#[tokio::test]
async fn callback_results_feed_a_chain() {
    let total = Chain::from_future(async {
        call(|callback| callback.succeed(vec![3, 4, 5]))
            .await
            .map_err(|err: CallError<String>| err.to_string())
    })
    .map(|n: i32, _| async move { Ok(n * n) }, None)
    .reduce(|sum, n, _| async move { Ok(sum + n) }, 0)
    .await;

    assert_eq!(total, Ok(50));
}

#[tokio::test]
async fn dropped_callback_fails_the_chain() {
    let outcome = Chain::<i32, String>::from_future(async {
        call(drop).await.map_err(|err: CallError<String>| err.to_string())
    })
    .every(|_, _| async { Ok(true) })
    .await;

    assert_eq!(
        outcome,
        Err("callback was dropped without being completed".to_string())
    );
}

#[cfg(unix)]
#[tokio::test]
async fn bounded_processes_respect_the_cap() {
    use corral_adapters::awaitable;
    use tokio::process::Command;

    let gauge = Arc::new(Gauge::default());
    let scripts = vec!["exit 0", "sleep 0.05", "exit 0", "sleep 0.05", "exit 0"];

    let codes = run_bounded(
        scripts,
        |script, _| {
            let gauge = Arc::clone(&gauge);
            async move {
                gauge.enter();
                let outcome = awaitable::run(Command::new("sh").arg("-c").arg(script)).await;
                gauge.exit();
                outcome.map(|()| script)
            }
        },
        Some(Concurrency::new(2).unwrap()),
    )
    .await
    .unwrap();

    assert_eq!(codes.len(), 5);
    assert_eq!(codes[1], "sleep 0.05");
    assert_eq!(gauge.peak(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn failing_process_rejects_the_run() {
    use corral_adapters::{ProcessError, awaitable};
    use tokio::process::Command;

    let outcome = run_bounded(
        vec!["exit 0", "exit 7"],
        |script, _| async move { awaitable::run(Command::new("sh").arg("-c").arg(script)).await },
        Some(Concurrency::SERIAL),
    )
    .await;

    assert!(matches!(outcome, Err(ProcessError::ExitCode(7))));
}
