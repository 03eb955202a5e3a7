//! Static sensor type registry.
//!
//! Each descriptor fully determines how an entry body is decoded: total
//! width, signedness, and one span per sub-field (a single unnamed span for
//! scalar types). The table is a `static` slice, so lookups are lock-free
//! and safe to share across threads. New sensor types are added here, not
//! as new branches in the parser.

use super::layout::*;

/// One contiguous sub-field of an entry body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Sub-field name; `None` for scalar types.
    pub name: Option<&'static str>,
    pub width: usize,
    /// Decimal exponent: the raw integer is divided by `10^exponent`.
    pub exponent: u32,
}

impl Span {
    const fn scalar(width: usize, exponent: u32) -> Self {
        Self {
            name: None,
            width,
            exponent,
        }
    }

    const fn field(name: &'static str, width: usize, exponent: u32) -> Self {
        Self {
            name: Some(name),
            width,
            exponent,
        }
    }
}

/// Decoding rule for one sensor type tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDescriptor {
    pub tag: u8,
    pub name: &'static str,
    /// Encoded body width in bytes (sum of span widths).
    pub width: usize,
    pub signed: bool,
    pub spans: &'static [Span],
    /// Multiplier applied after scaling (humidity is encoded in 0.5 % steps).
    pub post_multiplier: Option<f64>,
}

impl TypeDescriptor {
    pub fn is_composite(&self) -> bool {
        self.spans.iter().any(|span| span.name.is_some())
    }

    /// Sub-field names in declared order (empty for scalar types).
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.spans.iter().filter_map(|span| span.name)
    }

    /// Decimal exponent per span, in declared order.
    pub fn exponents(&self) -> impl Iterator<Item = u32> + '_ {
        self.spans.iter().map(|span| span.exponent)
    }
}

const UNIT_OCTET: &[Span] = &[Span::scalar(1, 0)];
const DECI_OCTET: &[Span] = &[Span::scalar(1, 1)];
const UNIT_WORD: &[Span] = &[Span::scalar(2, 0)];
const DECI_WORD: &[Span] = &[Span::scalar(2, 1)];
const CENTI_WORD: &[Span] = &[Span::scalar(2, 2)];

const XYZ_MILLI: &[Span] = &[
    Span::field("x", 2, 3),
    Span::field("y", 2, 3),
    Span::field("z", 2, 3),
];

const XYZ_CENTI: &[Span] = &[
    Span::field("x", 2, 2),
    Span::field("y", 2, 2),
    Span::field("z", 2, 2),
];

const GPS: &[Span] = &[
    Span::field("latitude", 3, 4),
    Span::field("longitude", 3, 4),
    Span::field("altitude", 3, 2),
];

static REGISTRY: &[TypeDescriptor] = &[
    entry(TYPE_DIGITAL_INPUT, "Digital Input", 1, false, UNIT_OCTET),
    entry(TYPE_DIGITAL_OUTPUT, "Digital Output", 1, false, UNIT_OCTET),
    entry(TYPE_ANALOG_INPUT, "Analog Input", 2, true, CENTI_WORD),
    entry(TYPE_ANALOG_OUTPUT, "Analog Output", 2, true, CENTI_WORD),
    entry(TYPE_ILLUMINANCE, "Illuminance Sensor", 2, false, UNIT_WORD),
    entry(TYPE_PRESENCE, "Presence Sensor", 1, false, UNIT_OCTET),
    entry(TYPE_TEMPERATURE, "Temperature Sensor", 2, true, DECI_WORD),
    TypeDescriptor {
        post_multiplier: Some(5.0),
        ..entry(TYPE_HUMIDITY, "Humidity Sensor", 1, false, DECI_OCTET)
    },
    entry(TYPE_ACCELEROMETER, "Accelerometer", 6, true, XYZ_MILLI),
    entry(TYPE_BAROMETER, "Barometer", 2, false, DECI_WORD),
    entry(TYPE_GYROMETER, "Gyrometer", 6, true, XYZ_CENTI),
    entry(TYPE_GPS, "GPS Location", 9, true, GPS),
];

const fn entry(
    tag: u8,
    name: &'static str,
    width: usize,
    signed: bool,
    spans: &'static [Span],
) -> TypeDescriptor {
    TypeDescriptor {
        tag,
        name,
        width,
        signed,
        spans,
        post_multiplier: None,
    }
}

/// Look up the descriptor for a sensor type tag.
pub fn lookup(tag: u8) -> Option<&'static TypeDescriptor> {
    REGISTRY.iter().find(|descriptor| descriptor.tag == tag)
}

/// All known descriptors, ordered by tag.
pub fn descriptors() -> &'static [TypeDescriptor] {
    REGISTRY
}

#[cfg(test)]
mod tests {
    use super::{descriptors, lookup};
    use crate::codec::layout;

    #[test]
    fn span_widths_sum_to_descriptor_width() {
        for descriptor in descriptors() {
            let total: usize = descriptor.spans.iter().map(|span| span.width).sum();
            assert_eq!(total, descriptor.width, "tag {}", descriptor.tag);
            assert!(
                descriptor
                    .spans
                    .iter()
                    .all(|span| span.width <= layout::MAX_INT_WIDTH)
            );
        }
    }

    #[test]
    fn tags_are_unique_and_sorted() {
        let tags: Vec<u8> = descriptors().iter().map(|d| d.tag).collect();
        let mut sorted = tags.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(tags, sorted);
        assert_eq!(tags.len(), 12);
    }

    #[test]
    fn lookup_scalar_types() {
        let temp = lookup(layout::TYPE_TEMPERATURE).unwrap();
        assert_eq!(temp.width, 2);
        assert!(temp.signed);
        assert!(!temp.is_composite());
        assert_eq!(temp.exponents().collect::<Vec<_>>(), vec![1]);
        assert_eq!(temp.field_names().count(), 0);

        let lux = lookup(layout::TYPE_ILLUMINANCE).unwrap();
        assert!(!lux.signed);
        assert_eq!(lux.exponents().collect::<Vec<_>>(), vec![0]);

        let analog = lookup(layout::TYPE_ANALOG_INPUT).unwrap();
        assert_eq!(analog.exponents().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn only_humidity_has_post_multiplier() {
        for descriptor in descriptors() {
            if descriptor.tag == layout::TYPE_HUMIDITY {
                assert_eq!(descriptor.post_multiplier, Some(5.0));
                assert_eq!(descriptor.exponents().collect::<Vec<_>>(), vec![1]);
            } else {
                assert_eq!(descriptor.post_multiplier, None, "tag {}", descriptor.tag);
            }
        }
    }

    #[test]
    fn lookup_composite_types() {
        let gps = lookup(layout::TYPE_GPS).unwrap();
        assert_eq!(gps.width, 9);
        assert!(gps.is_composite());
        assert_eq!(
            gps.field_names().collect::<Vec<_>>(),
            vec!["latitude", "longitude", "altitude"]
        );
        assert_eq!(gps.exponents().collect::<Vec<_>>(), vec![4, 4, 2]);

        let accel = lookup(layout::TYPE_ACCELEROMETER).unwrap();
        assert_eq!(accel.field_names().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        assert_eq!(accel.exponents().collect::<Vec<_>>(), vec![3, 3, 3]);

        let gyro = lookup(layout::TYPE_GYROMETER).unwrap();
        assert_eq!(gyro.exponents().collect::<Vec<_>>(), vec![2, 2, 2]);
    }

    #[test]
    fn lookup_unknown_tag() {
        assert!(lookup(255).is_none());
        assert!(lookup(100).is_none());
    }
}
