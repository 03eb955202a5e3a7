use tracing::{debug, warn};

use super::error::LppError;
use super::layout;
use super::reader::LppReader;
use super::registry::{self, TypeDescriptor};
use crate::reading::{Number, Reading, ReadingSet, ReadingValue};

/// Decode an LPP payload into a reading set.
///
/// The whole payload must be consumed by whole entries; any truncation or
/// unknown type aborts the decode with no partial result. An empty payload
/// yields an empty set.
///
/// # Examples
/// ```
/// use cayenne_lpp_core::{Number, decode};
///
/// let readings = decode(&[0x03, 0x67, 0x01, 0x10]).unwrap();
/// let reading = readings.get(3).unwrap();
/// assert_eq!(reading.type_name, "Temperature Sensor");
/// assert_eq!(reading.value.scalar(), Some(Number::Decimal(27.2)));
/// ```
pub fn decode(payload: &[u8]) -> Result<ReadingSet, LppError> {
    decode_units(payload)
}

/// Decode a payload held in wider integer units.
///
/// Every unit must fit in an octet; the first one that does not fails with
/// `LppError::ByteOverflow` at its offset.
pub fn decode_units<T: Copy + Into<u32>>(payload: &[T]) -> Result<ReadingSet, LppError> {
    let mut reader = LppReader::new(payload);
    let mut readings = ReadingSet::new();

    while !reader.is_exhausted() {
        let entry_offset = reader.position();
        let header = reader.read_header()?;
        let descriptor = registry::lookup(header.tag).ok_or(LppError::UnknownSensorType {
            tag: header.tag,
            offset: entry_offset,
        })?;
        let body = reader.read_body(header.tag, descriptor.width, entry_offset)?;
        let value = decode_value(
            descriptor,
            body,
            entry_offset + layout::HEADER_LEN,
        )?;

        debug!(
            channel = header.channel,
            tag = header.tag,
            offset = entry_offset,
            "decoded {}",
            descriptor.name
        );
        let reading = Reading {
            tag: descriptor.tag,
            type_name: descriptor.name,
            value,
        };
        if let Some(previous) = readings.insert(header.channel, reading) {
            warn!(
                channel = header.channel,
                previous_tag = previous.tag,
                tag = header.tag,
                "channel repeated in payload, keeping last reading"
            );
        }
    }

    Ok(readings)
}

fn decode_value<T: Copy + Into<u32>>(
    descriptor: &TypeDescriptor,
    body: &[T],
    body_offset: usize,
) -> Result<ReadingValue, LppError> {
    let mut reader = LppReader::with_base(body, body_offset);
    let mut fields = Vec::with_capacity(descriptor.spans.len());
    for span in descriptor.spans {
        let raw = reader.read_int(descriptor.tag, span.width, descriptor.signed)?;
        let mut value = Number::from_raw(raw, span.exponent);
        if let Some(multiplier) = descriptor.post_multiplier {
            value = Number::Decimal(value.as_f64() * multiplier);
        }
        fields.push((span.name, value));
    }

    if let [(None, value)] = fields.as_slice() {
        return Ok(ReadingValue::Scalar(*value));
    }
    Ok(ReadingValue::Composite(
        fields
            .into_iter()
            .map(|(name, value)| (name.unwrap_or_default(), value))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_units};
    use crate::codec::error::LppError;
    use crate::reading::{Number, ReadingValue};

    #[test]
    fn decode_empty_payload() {
        let readings = decode(&[]).unwrap();
        assert!(readings.is_empty());
    }

    #[test]
    fn decode_illuminance() {
        let readings = decode(&[0x07, 101, 0x00, 0x01]).unwrap();
        let reading = readings.get(7).unwrap();
        assert_eq!(reading.tag, 101);
        assert_eq!(reading.type_name, "Illuminance Sensor");
        assert_eq!(reading.value, ReadingValue::Scalar(Number::Integer(1)));
    }

    #[test]
    fn decode_negative_temperature() {
        let readings = decode(&[0x01, 103, 0xFF, 0x9C]).unwrap();
        assert_eq!(
            readings.get(1).unwrap().value,
            ReadingValue::Scalar(Number::Decimal(-10.0))
        );
    }

    #[test]
    fn decode_humidity_half_percent_steps() {
        let readings = decode(&[0x02, 104, 0x0A]).unwrap();
        assert_eq!(
            readings.get(2).unwrap().value,
            ReadingValue::Scalar(Number::Decimal(5.0))
        );
    }

    #[test]
    fn decode_digital_and_analog() {
        let readings = decode(&[0x01, 0, 0x2A, 0x02, 2, 0xFF, 0x38, 0x03, 1, 0x01]).unwrap();
        assert_eq!(
            readings.get(1).unwrap().value,
            ReadingValue::Scalar(Number::Integer(42))
        );
        assert_eq!(
            readings.get(2).unwrap().value,
            ReadingValue::Scalar(Number::Decimal(-2.0))
        );
        assert_eq!(readings.get(3).unwrap().type_name, "Digital Output");
    }

    #[test]
    fn decode_gps_subfields() {
        let payload = [
            0x01, 136, 0x06, 0x76, 0x5F, 0xF2, 0x96, 0x0A, 0x00, 0x03, 0xE8,
        ];
        let readings = decode(&payload).unwrap();
        assert_eq!(
            readings.get(1).unwrap().value,
            ReadingValue::Composite(vec![
                ("latitude", Number::Decimal(42.3519)),
                ("longitude", Number::Decimal(-87.9094)),
                ("altitude", Number::Decimal(10.0)),
            ])
        );
    }

    #[test]
    fn decode_accelerometer_and_gyrometer() {
        let payload = [
            0x06, 113, 0x04, 0xD2, 0xFB, 0x2E, 0x00, 0x00, //
            0x08, 134, 0x00, 0x64, 0xFF, 0x9C, 0x27, 0x10,
        ];
        let readings = decode(&payload).unwrap();
        let accel = &readings.get(6).unwrap().value;
        assert_eq!(accel.field("x"), Some(Number::Decimal(1.234)));
        assert_eq!(accel.field("y"), Some(Number::Decimal(-1.234)));
        assert_eq!(accel.field("z"), Some(Number::Decimal(0.0)));
        let gyro = &readings.get(8).unwrap().value;
        assert_eq!(gyro.field("x"), Some(Number::Decimal(1.0)));
        assert_eq!(gyro.field("y"), Some(Number::Decimal(-1.0)));
        assert_eq!(gyro.field("z"), Some(Number::Decimal(100.0)));
    }

    #[test]
    fn decode_keeps_first_seen_order_and_last_value() {
        let payload = [
            0x05, 102, 0x01, //
            0x02, 102, 0x00, //
            0x05, 103, 0x00, 0xC8,
        ];
        let readings = decode(&payload).unwrap();
        assert_eq!(readings.channels().collect::<Vec<_>>(), vec![5, 2]);
        let reading = readings.get(5).unwrap();
        assert_eq!(reading.tag, 103);
        assert_eq!(reading.value, ReadingValue::Scalar(Number::Decimal(20.0)));
    }

    #[test]
    fn decode_unknown_type() {
        let err = decode(&[0x01, 102, 0x01, 0x02, 255, 0x00]).unwrap_err();
        assert_eq!(err, LppError::UnknownSensorType { tag: 255, offset: 3 });
    }

    #[test]
    fn decode_truncated_header() {
        let err = decode(&[0x01, 102, 0x01, 0x02]).unwrap_err();
        assert_eq!(
            err,
            LppError::TruncatedHeader {
                offset: 3,
                remaining: 1
            }
        );
    }

    #[test]
    fn decode_truncated_body() {
        let err = decode(&[0x01, 136, 0x06, 0x76, 0x5F]).unwrap_err();
        assert_eq!(
            err,
            LppError::TruncatedBody {
                tag: 136,
                offset: 0,
                needed: 9,
                actual: 3
            }
        );
    }

    #[test]
    fn decode_units_matches_octets() {
        let units: Vec<u32> = vec![0x03, 0x67, 0x01, 0x10];
        assert_eq!(
            decode_units(&units).unwrap(),
            decode(&[0x03, 0x67, 0x01, 0x10]).unwrap()
        );
    }

    #[test]
    fn decode_units_rejects_overflow_in_header() {
        let units: Vec<u32> = vec![0x103, 0x67, 0x01, 0x10];
        let err = decode_units(&units).unwrap_err();
        assert_eq!(
            err,
            LppError::ByteOverflow {
                offset: 0,
                value: 0x103
            }
        );
    }

    #[test]
    fn decode_units_rejects_overflow_in_body() {
        let units: Vec<u16> = vec![0x01, 0x65, 0x00, 0x01, 0x02, 0x88, 0, 0, 0, 0, 0x1000, 0, 0, 0, 0];
        let err = decode_units(&units).unwrap_err();
        assert_eq!(
            err,
            LppError::ByteOverflow {
                offset: 10,
                value: 0x1000
            }
        );
    }
}
