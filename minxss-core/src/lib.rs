pub mod protocol;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

pub use protocol::{
    ConversionKind, DomainError, DomainPolicy, FieldDescriptor, FieldTable, FrameLocator,
    PacketParser, ParseError, ParseResult, START_SYNC, STOP_SYNC, SyncMarker, TableError,
    UnsupportedWidth,
};

// Field names and raw slices are never resized once decoded, so we keep them
// as boxed slices instead of `String`/`Vec`.
type BoxStr = Box<str>;
type BoxBytes = Box<[u8]>;

/// Stand-in value for channels that have no physical-unit formula yet.
///
/// The flight software documentation never supplied calibration constants for
/// most channels, so those fields decode to one of two fixed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placeholder {
    /// No value at all (rendered as `null`).
    Empty,
    /// The constant `1`.
    #[default]
    One,
}

/// A single decoded telemetry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryValue {
    /// Bytes copied out of the packet without interpretation.
    Raw(BoxBytes),
    /// A reconstructed little-endian integer.
    Integer(i64),
    /// Temperature in degrees Celsius.
    Celsius(NotNan<f64>),
    /// Channel without a calibration formula.
    Unimplemented(Placeholder),
    /// Thermistor reading outside the model, kept only under
    /// [`DomainPolicy::Record`].
    Undefined(DomainError),
}

impl Serialize for TelemetryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TelemetryValue::Raw(bytes) => serializer.collect_seq(bytes.iter()),
            TelemetryValue::Integer(value) => serializer.serialize_i64(*value),
            TelemetryValue::Celsius(value) => serializer.serialize_f64(value.into_inner()),
            TelemetryValue::Unimplemented(Placeholder::Empty) => serializer.serialize_none(),
            TelemetryValue::Unimplemented(Placeholder::One) => serializer.serialize_u8(1),
            TelemetryValue::Undefined(err) => serializer.collect_str(err),
        }
    }
}

/// Decoded telemetry, keyed by field name.
///
/// Entries keep the order of the field table that produced them so reports
/// and serialized output are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryRecord {
    entries: Vec<(BoxStr, TelemetryValue)>,
}

impl TelemetryRecord {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    // Callers guarantee unique names; `FieldTable::new` rejects duplicates.
    pub(crate) fn push(&mut self, name: BoxStr, value: TelemetryValue) {
        self.entries.push((name, value));
    }

    /// Look up a decoded value by field name.
    pub fn get(&self, name: &str) -> Option<&TelemetryValue> {
        self.entries
            .iter()
            .find(|(key, _)| key.as_ref() == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in field table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TelemetryValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_ref(), value))
    }
}

impl Serialize for TelemetryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name.as_ref(), value)?;
        }
        map.end()
    }
}
