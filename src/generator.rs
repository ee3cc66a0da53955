//! Generator façade: pull-based consumption of a push-style supply.
//!
//! A [`Generator`] owns one background mediator task that drains a supply
//! channel until the supply closes or the generator is stopped. In pull
//! mode items are relayed through a bounded delivery channel and consumed
//! with [`Generator::next`] or the [`Stream`] implementation. In push mode
//! each item is handed to a detached handler task instead, and no delivery
//! channel is exposed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{FutureExt, Stream};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::warn;

use crate::config::GeneratorConfig;
use crate::control::StopToken;
use crate::mediator::{self, Forward, Handler};

/// Counters for one generator's mediator activity
#[derive(Debug, Clone, Default)]
pub struct GeneratorStats {
    /// Items relayed into the delivery channel (pull mode)
    pub forwarded: u64,
    /// Items dropped because the delivery channel was full, or because
    /// the mediator was cancelled while waiting for capacity
    pub dropped: u64,
    /// Handler tasks spawned (push mode)
    pub dispatched: u64,
}

/// Pull-style handle over a push-style supply channel.
///
/// Constructed via [`Generator::new`]/[`Generator::with_config`] (pull
/// mode) or [`Generator::dispatch`]/[`Generator::dispatch_with`] (push
/// mode); every constructor starts the mediator immediately. A
/// `Generator` is not restartable: construct a new one to iterate again.
///
/// Dropping the handle triggers the stop token, so an abandoned mediator
/// cannot leak.
pub struct Generator<T> {
    delivery: Option<mpsc::Receiver<T>>,
    control: Option<StopToken>,
    stats: Arc<RwLock<GeneratorStats>>,
}

impl<T> Default for Generator<T> {
    /// An inert handle with no mediator behind it. [`Generator::stop`]
    /// panics on it; [`Generator::next`] yields nothing. Exists so that
    /// holders of a not-yet-initialized slot fail loudly instead of
    /// silently cancelling nothing.
    fn default() -> Self {
        Self {
            delivery: None,
            control: None,
            stats: Arc::new(RwLock::new(GeneratorStats::default())),
        }
    }
}

impl<T: Send + 'static> Generator<T> {
    /// Pull mode with the default configuration (capacity 1, drop-newest
    /// overflow).
    pub fn new(supply: mpsc::Receiver<T>) -> Self {
        Self::with_config(supply, GeneratorConfig::default())
    }

    /// Pull mode: every supply item is relayed verbatim through a bounded
    /// delivery channel.
    ///
    /// Under [`OverflowPolicy::DropNewest`] a full delivery channel causes
    /// the current item to be dropped, never queued: delivery is
    /// best-effort under backpressure so the mediator stays live. Use
    /// [`OverflowPolicy::Block`] for lossless delivery to a consumer that
    /// is guaranteed to keep up eventually.
    ///
    /// [`OverflowPolicy::DropNewest`]: crate::config::OverflowPolicy::DropNewest
    /// [`OverflowPolicy::Block`]: crate::config::OverflowPolicy::Block
    pub fn with_config(supply: mpsc::Receiver<T>, config: GeneratorConfig) -> Self {
        let capacity = if config.capacity == 0 {
            warn!("delivery capacity 0 is not representable, using 1");
            1
        } else {
            config.capacity
        };
        let control = StopToken::new();
        let stats = Arc::new(RwLock::new(GeneratorStats::default()));
        let (delivery_tx, delivery_rx) = mpsc::channel(capacity);
        tokio::spawn(mediator::run(
            supply,
            Forward::Relay {
                delivery: delivery_tx,
                overflow: config.overflow,
            },
            control.clone(),
            Arc::clone(&stats),
        ));
        Self {
            delivery: Some(delivery_rx),
            control: Some(control),
            stats,
        }
    }

    /// Push mode: spawn `handler` as a detached task for every supply
    /// item. The mediator does not await handler completion, so the
    /// completion order of concurrent invocations is unspecified, and
    /// fan-out is unbounded; gate inside the handler (e.g. with a
    /// semaphore) if a concurrency bound is needed.
    pub fn dispatch<F, Fut>(supply: mpsc::Receiver<T>, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler<T> = Arc::new(move |item| handler(item).boxed());
        Self::spawn_dispatch(supply, handler)
    }

    /// Push mode with construction-time arguments threaded into every
    /// invocation: `args` is cloned per item. Supports parameterized
    /// one-shot restart patterns where the handler needs caller context.
    pub fn dispatch_with<A, F, Fut>(supply: mpsc::Receiver<T>, args: A, handler: F) -> Self
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(T, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: Handler<T> = Arc::new(move |item| handler(item, args.clone()).boxed());
        Self::spawn_dispatch(supply, handler)
    }

    fn spawn_dispatch(supply: mpsc::Receiver<T>, handler: Handler<T>) -> Self {
        let control = StopToken::new();
        let stats = Arc::new(RwLock::new(GeneratorStats::default()));
        tokio::spawn(mediator::run(
            supply,
            Forward::Dispatch { handler },
            control.clone(),
            Arc::clone(&stats),
        ));
        Self {
            delivery: None,
            control: Some(control),
            stats,
        }
    }
}

impl<T> Generator<T> {
    /// Receive the next item. Suspends until a value is available
    /// (`Some`) or the delivery channel is exhausted (`None`); exhaustion
    /// is sticky, so looping until `None` is always safe.
    ///
    /// Push-mode generators expose no delivery channel and return `None`
    /// immediately.
    pub async fn next(&mut self) -> Option<T> {
        match self.delivery.as_mut() {
            Some(delivery) => delivery.recv().await,
            None => None,
        }
    }

    /// Cancel the mediator. Returns `true` when this call performed the
    /// cancellation, `false` when the generator was already stopped.
    ///
    /// # Panics
    ///
    /// Panics on a handle that never started a mediator (a
    /// [`Generator::default`] value).
    pub fn stop(&self) -> bool {
        self.control
            .as_ref()
            .expect("stop() called on a generator that was never started")
            .trigger()
    }

    /// Whether the generator has been stopped or has run its supply dry.
    pub fn is_stopped(&self) -> bool {
        self.control
            .as_ref()
            .map(StopToken::is_triggered)
            .unwrap_or(false)
    }

    /// Clone of the shared stop token, for producers or other observers
    /// that need to race their own work against cancellation.
    ///
    /// # Panics
    ///
    /// Panics on a handle that never started a mediator.
    pub fn stop_token(&self) -> StopToken {
        self.control
            .as_ref()
            .expect("stop_token() called on a generator that was never started")
            .clone()
    }

    /// Snapshot of the mediator's forwarding counters.
    pub fn stats(&self) -> GeneratorStats {
        self.stats.read().clone()
    }
}

impl<T> Stream for Generator<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        match self.get_mut().delivery.as_mut() {
            Some(delivery) => delivery.poll_recv(cx),
            None => Poll::Ready(None),
        }
    }
}

impl<T> Drop for Generator<T> {
    fn drop(&mut self) {
        // A dropped consumer must not leak the mediator task.
        if let Some(control) = &self.control {
            control.trigger();
        }
    }
}
