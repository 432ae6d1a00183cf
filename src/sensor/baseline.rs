//! Nominal operating point of the simulated machine and the per-field wear rules.

use crate::error::ConfigError;

/// Keys a reading already carries; a sensor may not reuse them.
pub const RESERVED_FIELDS: [&str; 1] = ["timestamp"];

/// Fields that may legitimately read below zero after noise is applied.
pub const SIGNED_FIELDS: [&str; 2] = ["torque", "vibration_level"];

const DEFAULT_FIELDS: [(&str, f64); 10] = [
    ("air_temperature", 298.1),
    ("process_temperature", 308.6),
    ("rotational_speed", 1551.0),
    ("torque", 42.8),
    ("tool_wear", 0.0),
    ("engine_rpm", 2500.0),
    ("oil_pressure_psi", 40.0),
    ("coolant_temp_c", 90.0),
    ("vibration_level", 0.5),
    ("engine_temp_c", 100.0),
];

/// Ordered sensor-name -> nominal value table.
///
/// A generator takes its own copy at construction; the table is never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorBaseline {
    fields: Vec<(String, f64)>,
}

impl SensorBaseline {
    /// Builds a custom baseline. Names must be unique and must not shadow
    /// a reserved reading key.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut fields: Vec<(String, f64)> = Vec::new();
        for (name, value) in pairs {
            let name = name.into();
            if RESERVED_FIELDS.contains(&name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "sensor name {name:?} is reserved"
                )));
            }
            if fields.iter().any(|(k, _)| *k == name) {
                return Err(ConfigError::Invalid(format!(
                    "sensor name {name:?} appears twice"
                )));
            }
            fields.push((name, value));
        }
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for SensorBaseline {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

/// Signed wear coefficient applied to `degradation_factor` for a field.
pub fn drift_coefficient(field: &str) -> f64 {
    match field {
        "coolant_temp_c" => 1.5,
        "engine_temp_c" => 1.2,
        "vibration_level" => 0.08,
        "oil_pressure_psi" => -0.8,
        _ => 0.0,
    }
}

pub fn allows_negative(field: &str) -> bool {
    SIGNED_FIELDS.contains(&field)
}
