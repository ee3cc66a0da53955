//! Spigot: Pull-Based Consumption of Push-Style Supplies
//!
//! Bridges a channel-like supply of items into a controllable, cancelable,
//! pull-based sequence, optionally fanning each item out to a concurrently
//! dispatched handler instead.

pub mod config;
pub mod control;
pub mod error;
pub mod generator;
pub mod logging;
mod mediator;
