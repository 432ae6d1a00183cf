use crate::sensor::SensorReading;

const DATA_PREFIX: &str = "data: ";

/// Encodes one reading as a server-sent event: `data: <json>\n\n`.
pub fn encode_event(reading: &SensorReading) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(reading)?;
    Ok(format!("{DATA_PREFIX}{json}\n\n"))
}

pub fn decode_event(frame: &str) -> Option<SensorReading> {
    let json = frame.strip_prefix(DATA_PREFIX)?.trim_end();
    serde_json::from_str(json).ok()
}
