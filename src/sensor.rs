//! Sensor module - Baseline template, noise sampling, and telemetry generation

pub mod baseline;
pub mod generator;
pub mod noise;

pub use baseline::SensorBaseline;
pub use generator::{degradation_factor, SensorReading, TelemetryGenerator};
pub use noise::{BoxMuller, NoiseSource};
