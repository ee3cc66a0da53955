//! Integration tests for generator lifecycle and cancellation
//!
//! Tests cover:
//! - Stop idempotence and its return value
//! - Stop unblocking a waiting consumer on a never-closing supply
//! - Drop triggering the shared stop token
//! - Stopping before any item arrives

use std::time::Duration;

use spigot::generator::Generator;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

#[tokio::test]
async fn stop_is_idempotent() {
    let (_supply_tx, supply_rx) = mpsc::channel::<u32>(4);
    let generator = Generator::new(supply_rx);

    assert!(generator.stop());
    assert!(!generator.stop());
    assert!(!generator.stop());
    assert!(generator.is_stopped());
}

#[tokio::test]
async fn stop_unblocks_a_waiting_consumer() {
    // The supply never closes; only cancellation can release the consumer.
    let (_supply_tx, supply_rx) = mpsc::channel::<u32>(4);
    let mut generator = Generator::new(supply_rx);
    let token = generator.stop_token();

    let consumer = tokio::spawn(async move { generator.next().await });
    sleep(Duration::from_millis(20)).await;

    assert!(token.trigger());
    let item = timeout(Duration::from_secs(1), consumer)
        .await
        .expect("next() must unblock promptly after stop")
        .unwrap();
    assert_eq!(item, None);
}

#[tokio::test]
async fn dropping_the_generator_triggers_its_token() {
    let (_supply_tx, supply_rx) = mpsc::channel::<u32>(4);
    let generator = Generator::new(supply_rx);
    let token = generator.stop_token();

    assert!(!token.is_triggered());
    drop(generator);
    assert!(token.is_triggered());
}

#[tokio::test]
async fn stop_before_items_delivers_nothing() {
    let (supply_tx, supply_rx) = mpsc::channel(4);
    let mut generator = Generator::new(supply_rx);

    assert!(generator.stop());
    supply_tx.send(1).await.unwrap();

    assert_eq!(generator.next().await, None);
    let stats = generator.stats();
    assert_eq!(stats.forwarded, 0);
}

#[tokio::test]
async fn supply_close_triggers_the_shared_token() {
    let (supply_tx, supply_rx) = mpsc::channel::<u32>(4);
    let mut generator = Generator::new(supply_rx);
    let token = generator.stop_token();

    drop(supply_tx);
    assert_eq!(generator.next().await, None);
    assert!(token.is_triggered());
    // The consumer-side stop now reports "already cancelled".
    assert!(!generator.stop());
}
