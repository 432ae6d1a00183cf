use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::baseline::{allows_negative, drift_coefficient, SensorBaseline};
use super::noise::{BoxMuller, NoiseSource};

/// One noised sample of every baseline field.
///
/// Serialises flat: each sensor name is a top-level key next to `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(skip)]
    pub tick: u64,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}

impl SensorReading {
    pub fn get(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }
}

/// Wear accumulated by `tick`; grows super-linearly.
pub fn degradation_factor(tick: u64) -> f64 {
    let t = tick as f64;
    t * 0.5 * (1.0 + t * 0.05)
}

/// Baseline value of `field` after wear at `tick`, before noise.
pub fn drifted(field: &str, nominal: f64, tick: u64) -> f64 {
    nominal + degradation_factor(tick) * drift_coefficient(field)
}

/// Rounds to 2 decimals; `-0.0` comes back as `0.0`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

// ============================================================================
// TELEMETRY GENERATOR - Simulates a machine wearing out
// ============================================================================

pub struct TelemetryGenerator<N = BoxMuller> {
    baseline: SensorBaseline,
    noise: N,
    noise_std_dev: f64,
    tick: u64,
}

impl TelemetryGenerator<BoxMuller> {
    /// Default baseline, noise drawn from an entropy-seeded RNG.
    pub fn new(noise_std_dev: f64) -> Self {
        Self::with_noise(SensorBaseline::default(), noise_std_dev, BoxMuller::from_entropy())
    }

    pub fn seeded(noise_std_dev: f64, seed: u64) -> Self {
        Self::with_noise(SensorBaseline::default(), noise_std_dev, BoxMuller::seeded(seed))
    }
}

impl<N: NoiseSource> TelemetryGenerator<N> {
    pub fn with_noise(baseline: SensorBaseline, noise_std_dev: f64, noise: N) -> Self {
        Self {
            baseline,
            noise,
            noise_std_dev,
            tick: 0,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn noise_std_dev(&self) -> f64 {
        self.noise_std_dev
    }

    pub fn baseline(&self) -> &SensorBaseline {
        &self.baseline
    }

    pub fn next_reading(&mut self) -> SensorReading {
        self.tick += 1;
        let tick = self.tick;

        let mut values = BTreeMap::new();
        for (field, nominal) in self.baseline.iter() {
            let base = drifted(field, nominal, tick);
            let scale = (base.abs() * 0.05).max(1.0);
            let z = self.noise.standard_normal();

            let mut noisy = base + z * scale * self.noise_std_dev;
            if noisy < 0.0 && !allows_negative(field) {
                noisy = 0.0;
            }
            values.insert(field.to_string(), round2(noisy));
        }

        SensorReading {
            tick,
            values,
            timestamp: unix_now(),
        }
    }
}

impl<N: NoiseSource> Iterator for TelemetryGenerator<N> {
    type Item = SensorReading;

    fn next(&mut self) -> Option<SensorReading> {
        Some(self.next_reading())
    }
}
