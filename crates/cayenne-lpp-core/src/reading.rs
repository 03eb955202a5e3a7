//! Decoded reading model.
//!
//! Values keep the distinction between exact integers (types with no
//! decimal scaling) and decimals so JSON output shows `500` for a lux
//! reading and `27.2` for a temperature.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Numeric reading value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(value) => value as f64,
            Number::Decimal(value) => value,
        }
    }

    pub(crate) fn from_raw(raw: i128, exponent: u32) -> Self {
        if exponent == 0 {
            if let Ok(value) = i64::try_from(raw) {
                return Number::Integer(value);
            }
        }
        Number::Decimal(crate::codec::reader::scaled(raw, exponent))
    }
}

/// Scalar value or named sub-fields in declared order.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingValue {
    Scalar(Number),
    Composite(Vec<(&'static str, Number)>),
}

impl ReadingValue {
    pub fn scalar(&self) -> Option<Number> {
        match self {
            ReadingValue::Scalar(value) => Some(*value),
            ReadingValue::Composite(_) => None,
        }
    }

    /// Sub-field value by name (composite values only).
    pub fn field(&self, name: &str) -> Option<Number> {
        match self {
            ReadingValue::Scalar(_) => None,
            ReadingValue::Composite(fields) => fields
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| *value),
        }
    }
}

impl Serialize for ReadingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReadingValue::Scalar(value) => value.serialize(serializer),
            ReadingValue::Composite(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

/// One decoded entry.
///
/// # Examples
/// ```
/// use cayenne_lpp_core::{Number, Reading, ReadingValue};
///
/// let reading = Reading {
///     tag: 103,
///     type_name: "Temperature Sensor",
///     value: ReadingValue::Scalar(Number::Decimal(27.2)),
/// };
/// let json = serde_json::to_value(&reading).unwrap();
/// assert_eq!(json["type"], 103);
/// assert_eq!(json["value"], 27.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// Sensor type tag.
    #[serde(rename = "type")]
    pub tag: u8,
    pub type_name: &'static str,
    pub value: ReadingValue,
}

/// Channel → reading map in first-seen order.
///
/// Inserting on an existing channel replaces the reading but keeps the
/// channel's original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingSet {
    entries: Vec<(u8, Reading)>,
}

impl ReadingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reading, returning the one it replaced.
    pub fn insert(&mut self, channel: u8, reading: Reading) -> Option<Reading> {
        match self.entries.iter_mut().find(|(existing, _)| *existing == channel) {
            Some((_, slot)) => Some(std::mem::replace(slot, reading)),
            None => {
                self.entries.push((channel, reading));
                None
            }
        }
    }

    pub fn get(&self, channel: u8) -> Option<&Reading> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == channel)
            .map(|(_, reading)| reading)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn channels(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().map(|(channel, _)| *channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Reading)> + '_ {
        self.entries.iter().map(|(channel, reading)| (*channel, reading))
    }
}

impl IntoIterator for ReadingSet {
    type Item = (u8, Reading);
    type IntoIter = std::vec::IntoIter<(u8, Reading)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ReadingSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (channel, reading) in &self.entries {
            map.serialize_entry(channel, reading)?;
        }
        map.end()
    }
}
