//! Delivery mediator: the background task bridging a supply channel to
//! its delivery mechanism.

use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::config::OverflowPolicy;
use crate::control::StopToken;
use crate::generator::GeneratorStats;

/// Type-erased push-mode handler. Each invocation becomes one detached task.
pub(crate) type Handler<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// How the mediator forwards each item it reads from the supply.
pub(crate) enum Forward<T> {
    /// Relay into the bounded delivery channel (pull mode).
    Relay {
        delivery: mpsc::Sender<T>,
        overflow: OverflowPolicy,
    },
    /// Spawn the handler for each item (push mode).
    Dispatch { handler: Handler<T> },
}

/// Drain `supply` until it closes or `stop` fires, forwarding every item.
///
/// Exactly one mediator runs per generator; it terminates exactly once.
/// The select is biased toward cancellation, so once the token fires no
/// further reads are performed. When the supply closes, the delivery
/// sender is dropped on exit (unblocking waiting consumers with
/// exhaustion) and the token is triggered to free any other observers.
pub(crate) async fn run<T: Send + 'static>(
    mut supply: mpsc::Receiver<T>,
    forward: Forward<T>,
    stop: StopToken,
    stats: Arc<RwLock<GeneratorStats>>,
) {
    debug!("mediator started");
    loop {
        tokio::select! {
            biased;

            _ = stop.triggered() => {
                debug!("mediator observed cancellation");
                break;
            }
            item = supply.recv() => match item {
                Some(item) => {
                    if !forward_item(&forward, item, &stop, &stats).await {
                        stop.trigger();
                        break;
                    }
                }
                None => {
                    debug!("supply closed, mediator draining out");
                    stop.trigger();
                    break;
                }
            },
        }
    }
    debug!("mediator stopped");
}

/// Forward one item. Returns `false` when the delivery side is gone and
/// the mediator should exit.
async fn forward_item<T: Send + 'static>(
    forward: &Forward<T>,
    item: T,
    stop: &StopToken,
    stats: &RwLock<GeneratorStats>,
) -> bool {
    match forward {
        Forward::Relay {
            delivery,
            overflow: OverflowPolicy::DropNewest,
        } => match delivery.try_send(item) {
            Ok(()) => {
                stats.write().forwarded += 1;
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                // Lossy under backpressure: the current item is dropped,
                // never queued, keeping the mediator live.
                stats.write().dropped += 1;
                trace!("delivery channel full, item dropped");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("delivery channel closed by consumer");
                false
            }
        },
        Forward::Relay {
            delivery,
            overflow: OverflowPolicy::Block,
        } => {
            tokio::select! {
                biased;

                _ = stop.triggered() => {
                    // Cancelled while waiting for capacity; the item in
                    // hand is dropped and the outer loop exits next.
                    stats.write().dropped += 1;
                    trace!("cancelled while awaiting delivery capacity");
                    true
                }
                sent = delivery.send(item) => match sent {
                    Ok(()) => {
                        stats.write().forwarded += 1;
                        true
                    }
                    Err(_) => {
                        debug!("delivery channel closed by consumer");
                        false
                    }
                },
            }
        }
        Forward::Dispatch { handler } => {
            stats.write().dispatched += 1;
            trace!("dispatching handler for item");
            tokio::spawn(handler(item));
            true
        }
    }
}
