//! module for parse wtrlvl beacon advertisement

/// minimum manufacturer data length (company id, voltage, distance)
pub(crate) const PAYLOAD_LEN: usize = 5;

/// one advertisement as delivered by the scanner
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Broadcast {
    pub(crate) identity: String,
    pub(crate) payload: Vec<u8>,
    pub(crate) received_at: u64,
}

/// result
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Measurement {
    /// battery voltage in millivolts
    pub(crate) voltage: f32,
    /// distance from sensor to surface in centimetres
    pub(crate) distance: f32,
}

/// parser
///
/// Bytes 0-1 are the company id, 2-3 the battery voltage (LE), 4 the distance.
pub(crate) fn parse_manufacturer_data(value: &[u8]) -> Option<Measurement> {
    if value.len() < PAYLOAD_LEN {
        return None;
    }
    let raw_voltage = u16::from_le_bytes([value[2], value[3]]);
    let raw_distance = value[4];

    return Some(Measurement {
        voltage: raw_voltage as f32,
        distance: raw_distance as f32,
    });
}

/// Decode a broadcast, ignoring anything not sent by `expected`.
pub(crate) fn decode(expected: &str, identity: &str, payload: &[u8]) -> Option<Measurement> {
    if identity != expected {
        return None;
    }
    parse_manufacturer_data(payload)
}
