use std::time::Duration;

use qrlink_engine::Debouncer;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn fires_once_after_quiet_period() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut debouncer = Debouncer::new(Handle::current());
    let start = Instant::now();

    debouncer.arm(Duration::from_millis(500), move || {
        let _ = tx.send("a");
    });
    assert!(debouncer.is_armed());

    assert_eq!(rx.recv().await, Some("a"));
    assert_eq!(start.elapsed(), Duration::from_millis(500));
    assert!(!debouncer.is_armed());
}

#[tokio::test(start_paused = true)]
async fn rearming_supersedes_the_pending_timer() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut debouncer = Debouncer::new(Handle::current());
    let start = Instant::now();

    let first = tx.clone();
    debouncer.arm(Duration::from_millis(500), move || {
        let _ = first.send("a");
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.arm(Duration::from_millis(500), move || {
        let _ = tx.send("b");
    });

    assert_eq!(rx.recv().await, Some("b"));
    assert_eq!(start.elapsed(), Duration::from_millis(600));

    // Both senders are gone once the cancelled task has exited.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn cancel_prevents_firing() {
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    let mut debouncer = Debouncer::new(Handle::current());

    debouncer.arm(Duration::from_millis(500), move || {
        let _ = tx.send(());
    });
    assert!(debouncer.cancel());
    assert!(!debouncer.cancel());

    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_debouncer_cancels_its_timer() {
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    {
        let mut debouncer = Debouncer::new(Handle::current());
        debouncer.arm(Duration::from_millis(500), move || {
            let _ = tx.send(());
        });
    }

    assert_eq!(rx.recv().await, None);
}
