//! Prediction module - Sliding input window and the remote model client

pub mod client;
pub mod window;

pub use client::{PredictionClient, PredictionResponse};
pub use window::{MachineSample, SequenceRequest, SequenceWindow};
