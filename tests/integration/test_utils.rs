//! Shared helpers for integration tests

use std::time::Duration;

use tokio::time::sleep;

/// Poll `check` until it holds, panicking after roughly one second.
///
/// Used where the assertion depends on the mediator task getting
/// scheduled, which has no synchronous completion signal to await.
pub async fn wait_until<F: Fn() -> bool>(what: &str, check: F) {
    for _ in 0..200 {
        if check() {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {what}");
}
