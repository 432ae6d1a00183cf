//! Async task implementations

pub mod stream_task;

pub use stream_task::{PumpConfig, StreamOutcome, StreamPump};
