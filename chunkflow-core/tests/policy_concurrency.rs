//! Concurrent use of the adaptive size policy

use chunkflow_core::AdaptiveSizePolicy;
use std::thread;

#[test]
fn test_concurrent_records_are_not_lost() {
    let policy = AdaptiveSizePolicy::default();

    thread::scope(|scope| {
        for worker in 0..8 {
            let policy = &policy;
            scope.spawn(move || {
                for i in 0..1_000 {
                    let size = if (worker + i) % 2 == 0 { 300 } else { 500 };
                    policy.record(size, i % 10 != 0);
                }
            });
        }
    });

    let snapshot = policy.snapshot();
    let total: u64 = snapshot.iter().map(|entry| entry.attempts()).sum();
    assert_eq!(total, 8_000);

    let failures: u64 = snapshot.iter().map(|entry| entry.failure_count).sum();
    assert_eq!(failures, 800);
}

#[test]
fn test_suggest_while_recording() {
    let policy = AdaptiveSizePolicy::default();

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..500 {
                policy.record(384, true);
            }
        });
        scope.spawn(|| {
            for _ in 0..500 {
                let size = policy.suggest(512);
                assert!(size == 512 || size == 384);
            }
        });
    });

    assert_eq!(policy.suggest(512), 384);
}
