//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Policy applied when the delivery channel is full at forward time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the current item rather than block the mediator. Delivery is
    /// at-most-once under backpressure: ordering among delivered items is
    /// preserved, totality is not.
    #[default]
    DropNewest,
    /// Wait for channel capacity, racing the wait against cancellation so
    /// the mediator never blocks indefinitely.
    Block,
}

/// Configuration for a generator's delivery channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Delivery channel capacity (minimum 1)
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Policy when the delivery channel is full
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

fn default_capacity() -> usize {
    1
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            overflow: OverflowPolicy::default(),
        }
    }
}
