use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::sensor::SensorReading;

// ============================================================================
// SEQUENCE WINDOW - Last N readings handed to the remote model
// ============================================================================

pub struct SequenceWindow {
    window_size: usize,
    buffer: VecDeque<SensorReading>,
}

impl SequenceWindow {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    /// Adds a reading, evicting the oldest. Returns the full window whenever
    /// it holds exactly `window_size` readings.
    pub fn push(&mut self, reading: SensorReading) -> Option<Vec<SensorReading>> {
        self.buffer.push_back(reading);
        if self.buffer.len() > self.window_size {
            self.buffer.pop_front();
        }
        self.is_full().then(|| self.buffer.iter().cloned().collect())
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.window_size
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// One row of the remote model's input, keyed the way its schema expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSample {
    #[serde(rename = "Air temperature [K]")]
    pub air_temperature: f64,
    #[serde(rename = "Process temperature [K]")]
    pub process_temperature: f64,
    #[serde(rename = "Rotational speed [rpm]")]
    pub rotational_speed: f64,
    #[serde(rename = "Torque [Nm]")]
    pub torque: f64,
    #[serde(rename = "Tool wear [min]")]
    pub tool_wear: f64,
}

impl MachineSample {
    /// `None` when the reading lacks one of the five model inputs.
    pub fn from_reading(reading: &SensorReading) -> Option<Self> {
        Some(Self {
            air_temperature: reading.get("air_temperature")?,
            process_temperature: reading.get("process_temperature")?,
            rotational_speed: reading.get("rotational_speed")?,
            torque: reading.get("torque")?,
            tool_wear: reading.get("tool_wear")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRequest {
    pub sequence: Vec<MachineSample>,
}

impl SequenceRequest {
    pub fn from_readings(readings: &[SensorReading]) -> Option<Self> {
        let sequence = readings
            .iter()
            .map(MachineSample::from_reading)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { sequence })
    }
}
