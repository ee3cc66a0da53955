//! Integration tests for push-mode dispatch
//!
//! Tests cover:
//! - One handler invocation per supply item
//! - Construction-time argument threading
//! - The absence of a delivery channel
//! - Cancellation before dispatch

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use spigot::generator::Generator;
use tokio::sync::mpsc;
use tokio::time::sleep;

use super::test_utils::wait_until;

#[tokio::test]
async fn handler_runs_once_per_item() {
    let (supply_tx, supply_rx) = mpsc::channel(8);
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let generator = Generator::dispatch(supply_rx, move |_: u32| {
        let seen = Arc::clone(&seen);
        async move {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    for n in 0..5 {
        supply_tx.send(n).await.unwrap();
    }

    wait_until("all five handler invocations", || {
        count.load(Ordering::SeqCst) == 5
    })
    .await;
    assert_eq!(generator.stats().dispatched, 5);
}

#[tokio::test]
async fn dispatch_with_threads_arguments_through() {
    let (supply_tx, supply_rx) = mpsc::channel(8);
    let outputs: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&outputs);
    let _generator = Generator::dispatch_with(
        supply_rx,
        "ctx-7".to_string(),
        move |item: u32, tag: String| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().unwrap().push(format!("{tag}:{item}"));
            }
        },
    );

    supply_tx.send(1).await.unwrap();
    supply_tx.send(2).await.unwrap();

    wait_until("both handler invocations", || {
        outputs.lock().unwrap().len() == 2
    })
    .await;

    let mut seen = outputs.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["ctx-7:1".to_string(), "ctx-7:2".to_string()]);
}

#[tokio::test]
async fn push_mode_exposes_no_delivery_channel() {
    let (supply_tx, supply_rx) = mpsc::channel::<u32>(4);
    let mut generator = Generator::dispatch(supply_rx, |_| async {});

    assert_eq!(generator.next().await, None);
    drop(supply_tx);
}

#[tokio::test]
async fn stop_prevents_further_dispatch() {
    let (supply_tx, supply_rx) = mpsc::channel(8);
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let generator = Generator::dispatch(supply_rx, move |_: u32| {
        let seen = Arc::clone(&seen);
        async move {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    assert!(generator.stop());

    for n in 0..3 {
        supply_tx.send(n).await.unwrap();
    }
    sleep(Duration::from_millis(50)).await;

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(generator.stats().dispatched, 0);
}
