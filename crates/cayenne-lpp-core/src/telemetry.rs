//! Application-level view of a reading set.
//!
//! Maps sensor types to flat telemetry fields (`temperature`, `lux`,
//! `loc`, ...). Tags with no application field are skipped.

use serde::Serialize;
use tracing::debug;

use crate::codec::layout::*;
use crate::reading::{Number, ReadingSet, ReadingValue};

/// Three-axis value (accelerometer, gyrometer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
}

/// Flattened telemetry fields; absent sensors are omitted from JSON.
///
/// # Examples
/// ```
/// use cayenne_lpp_core::{Telemetry, decode};
///
/// let readings = decode(&[0x03, 0x67, 0x01, 0x10, 0x04, 0x68, 0x82]).unwrap();
/// let telemetry = Telemetry::from_readings(&readings);
/// assert_eq!(telemetry.temperature.map(|t| t.as_f64()), Some(27.2));
/// assert_eq!(telemetry.humidity.map(|h| h.as_f64()), Some(65.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Telemetry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lux: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accel: Option<Axes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gyro: Option<Axes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
}

impl Telemetry {
    /// Build telemetry from readings in ascending channel number. When two
    /// channels carry the same type the higher channel wins, regardless of
    /// the order they arrived in.
    pub fn from_readings(readings: &ReadingSet) -> Self {
        let mut by_channel: Vec<_> = readings.iter().collect();
        by_channel.sort_by_key(|(channel, _)| *channel);

        let mut telemetry = Telemetry::default();
        for (channel, reading) in by_channel {
            let value = &reading.value;
            match reading.tag {
                TYPE_DIGITAL_INPUT => telemetry.count = value.scalar(),
                TYPE_ILLUMINANCE => telemetry.lux = value.scalar(),
                TYPE_PRESENCE => telemetry.presence = value.scalar(),
                TYPE_TEMPERATURE => telemetry.temperature = value.scalar(),
                TYPE_HUMIDITY => telemetry.humidity = value.scalar(),
                TYPE_BAROMETER => telemetry.pressure = value.scalar(),
                TYPE_ACCELEROMETER => telemetry.accel = axes(value),
                TYPE_GYROMETER => telemetry.gyro = axes(value),
                TYPE_GPS => telemetry.loc = location(value),
                tag => debug!(channel, tag, "no telemetry field for {}", reading.type_name),
            }
        }
        telemetry
    }

    pub fn is_empty(&self) -> bool {
        *self == Telemetry::default()
    }
}

fn axes(value: &ReadingValue) -> Option<Axes> {
    Some(Axes {
        x: value.field("x")?.as_f64(),
        y: value.field("y")?.as_f64(),
        z: value.field("z")?.as_f64(),
    })
}

fn location(value: &ReadingValue) -> Option<Location> {
    Some(Location {
        lat: value.field("latitude")?.as_f64(),
        lng: value.field("longitude")?.as_f64(),
        alt: value.field("altitude")?.as_f64(),
    })
}
