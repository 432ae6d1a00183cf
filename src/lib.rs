pub mod api;
pub mod async_impl;
pub mod config;
pub mod error;
pub mod ipc;
pub mod metrics;
pub mod prediction;
pub mod sensor;
pub mod server;

pub use async_impl::{PumpConfig, StreamOutcome, StreamPump};
pub use config::{load_config, read_config, ServiceConfig};
pub use ipc::{ChannelSink, ReadingSink, StopSignal};
pub use metrics::StreamMetrics;
pub use sensor::{SensorBaseline, SensorReading, TelemetryGenerator};
