use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use galthumb::service::inflight::InflightLocks;

#[tokio::test]
async fn test_same_key_is_serialized() {
    let locks = Arc::new(InflightLocks::new());
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let (locks, active, peak) = (locks.clone(), active.clone(), peak.clone());
        tasks.push(tokio::spawn(async move {
            let _guard = locks.lock("a.jpg.jpg").await;
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            active.fetch_sub(1, Ordering::SeqCst);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_distinct_keys_do_not_block() {
    let locks = InflightLocks::new();
    let first = locks.lock("a.jpg.jpg").await;
    let second = tokio::time::timeout(Duration::from_secs(1), locks.lock("b.jpg.jpg"))
        .await
        .expect("distinct key must not wait");
    assert_eq!(locks.len(), 2);

    drop(first);
    drop(second);
    assert!(locks.is_empty());
}
