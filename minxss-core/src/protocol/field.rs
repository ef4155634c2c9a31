use std::collections::HashSet;

use serde::Deserialize;

use super::{
    DomainError, FIELD_LENGTHS, INT_WIDTHS, ParseError, ParseResult, TableError, decode_int,
    thermistor,
};
use crate::{Placeholder, TelemetryValue};

type BoxStr = Box<str>;
type BoxList<T> = Box<[T]>;

/// How the bytes of a field turn into a [`TelemetryValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConversionKind {
    /// Copy the bytes out unchanged.
    #[serde(rename = "raw")]
    RawPassthrough,
    /// Two's-complement integer built from the first `width` bytes.
    #[serde(rename = "signed")]
    SignedInt { width: usize },
    /// Unsigned integer built from the first `width` bytes.
    #[serde(rename = "unsigned")]
    UnsignedInt { width: usize },
    /// Degrees Celsius from the first two bytes, see [`thermistor`].
    #[serde(rename = "thermistor")]
    ThermistorTemperature,
    /// No calibration formula; always yields the placeholder.
    Unimplemented {
        #[serde(default)]
        placeholder: Placeholder,
    },
}

impl ConversionKind {
    fn apply(&self, bytes: &[u8]) -> Result<TelemetryValue, Conversion> {
        match *self {
            ConversionKind::RawPassthrough => Ok(TelemetryValue::Raw(bytes.into())),
            ConversionKind::SignedInt { width } => int_value(bytes, width, true),
            ConversionKind::UnsignedInt { width } => int_value(bytes, width, false),
            ConversionKind::ThermistorTemperature => match bytes {
                [a, b, ..] => thermistor::to_celsius([*a, *b])
                    .map(TelemetryValue::Celsius)
                    .map_err(Conversion::Domain),
                _ => Err(Conversion::Width(bytes.len())),
            },
            ConversionKind::Unimplemented { placeholder } => {
                Ok(TelemetryValue::Unimplemented(placeholder))
            }
        }
    }
}

enum Conversion {
    Width(usize),
    Domain(DomainError),
}

fn int_value(bytes: &[u8], width: usize, signed: bool) -> Result<TelemetryValue, Conversion> {
    let slice = bytes.get(..width).ok_or(Conversion::Width(width))?;
    decode_int(slice, signed)
        .map(TelemetryValue::Integer)
        .map_err(|err| Conversion::Width(err.0))
}

/// One named byte range of the packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDescriptor {
    pub name: BoxStr,
    /// Offset from the first byte of the start sync marker.
    pub offset: usize,
    pub length: usize,
    pub decode: ConversionKind,
}

impl FieldDescriptor {
    pub fn new(name: &str, offset: usize, length: usize, decode: ConversionKind) -> Self {
        Self {
            name: name.into(),
            offset,
            length,
            decode,
        }
    }

    /// One past the last byte of the field. Saturates for descriptors that
    /// never went through [`FieldTable::new`].
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Slice this field out of a reframed packet and convert it.
    pub fn decode_from(&self, frame: &[u8]) -> ParseResult<TelemetryValue> {
        let bytes = frame
            .get(self.offset..self.end())
            .ok_or_else(|| ParseError::FieldOutOfRange {
                field: self.name.clone(),
                offset: self.offset,
                length: self.length,
                available: frame.len(),
            })?;

        self.decode.apply(bytes).map_err(|err| match err {
            Conversion::Width(width) => ParseError::UnsupportedFieldWidth {
                field: self.name.clone(),
                width,
            },
            Conversion::Domain(source) => ParseError::Domain {
                field: self.name.clone(),
                source,
            },
        })
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.offset.checked_add(self.length).is_none() {
            return Err(TableError::OffsetOverflow {
                name: self.name.clone(),
                offset: self.offset,
                length: self.length,
            });
        }

        if !FIELD_LENGTHS.contains(&self.length) {
            return Err(TableError::UnsupportedLength {
                name: self.name.clone(),
                length: self.length,
            });
        }

        match self.decode {
            ConversionKind::SignedInt { width } | ConversionKind::UnsignedInt { width }
                if !INT_WIDTHS.contains(&width) || width > self.length =>
            {
                Err(TableError::UnsupportedWidth {
                    name: self.name.clone(),
                    width,
                    length: self.length,
                })
            }
            ConversionKind::ThermistorTemperature if self.length < 2 => {
                Err(TableError::ThermistorTooShort {
                    name: self.name.clone(),
                    length: self.length,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Ordered, immutable packet layout.
///
/// Ranges may overlap or leave gaps; only names, lengths and conversion
/// widths are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable {
    fields: BoxList<FieldDescriptor>,
    required_len: usize,
}

impl FieldTable {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, TableError> {
        {
            let mut seen = HashSet::with_capacity(fields.len());
            for field in &fields {
                field.validate()?;
                if !seen.insert(field.name.as_ref()) {
                    return Err(TableError::DuplicateName(field.name.clone()));
                }
            }
        }

        Ok(Self::from_fields(fields))
    }

    fn from_fields(fields: Vec<FieldDescriptor>) -> Self {
        let required_len = fields.iter().map(FieldDescriptor::end).max().unwrap_or(0);
        Self {
            fields: fields.into_boxed_slice(),
            required_len,
        }
    }

    /// Layout of the MinXSS housekeeping packet.
    pub fn minxss() -> Self {
        Self::from_fields(
            MINXSS_LAYOUT
                .iter()
                .map(|&(name, offset, length, decode)| {
                    FieldDescriptor::new(name, offset, length, decode)
                })
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name.as_ref() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Bytes a reframed packet must hold for every field to decode.
    pub fn required_len(&self) -> usize {
        self.required_len
    }
}

impl<'a> IntoIterator for &'a FieldTable {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

const EMPTY: ConversionKind = ConversionKind::Unimplemented {
    placeholder: Placeholder::Empty,
};
const ONE: ConversionKind = ConversionKind::Unimplemented {
    placeholder: Placeholder::One,
};
const TEMP: ConversionKind = ConversionKind::ThermistorTemperature;

// (name, offset, length, conversion), in downlink order.
const MINXSS_LAYOUT: &[(&str, usize, usize, ConversionKind)] = &[
    // C&DH
    ("Time Stamp", 0, 5, EMPTY),
    ("Commands Received", 5, 4, EMPTY),
    ("Last Command Received", 9, 2, EMPTY),
    ("Temperature", 11, 2, TEMP),
    // Mode, eclipse and BT_Enable bits
    ("C&DH Primary Data", 13, 1, EMPTY),
    ("Rejected CIP Packets", 14, 4, EMPTY),
    ("Last Downlinked HK Sector", 18, 4, EMPTY),
    ("Last downlinked Science Sector", 22, 4, EMPTY),
    ("Last downlinked ADCS Sector", 26, 4, EMPTY),
    // EPS
    ("Battery Voltage", 29, 2, ConversionKind::SignedInt { width: 2 }),
    ("Battery Current", 31, 2, EMPTY),
    ("Battery SOC", 33, 2, EMPTY),
    ("Battery Temperature", 35, 8, TEMP),
    ("Solar Panel Voltage", 43, 6, EMPTY),
    ("Solar Panel Current", 49, 5, EMPTY),
    // Interface
    ("Interface Board Temperature", 54, 2, TEMP),
    // EPS rails
    ("EPS Board Temperature", 56, 2, TEMP),
    ("CIP Voltage", 58, 2, ONE),
    ("CIP Current", 60, 2, ONE),
    ("ADCS Voltage", 62, 2, ONE),
    ("ADCS Current", 64, 2, ONE),
    ("S-Band Voltage", 66, 2, ONE),
    ("S-Band Current", 68, 2, ONE),
    ("UHF Voltage", 70, 2, ONE),
    ("UHF Current", 72, 2, ONE),
    ("C&DH Voltage", 74, 2, ONE),
    ("C&DH Current", 76, 2, ONE),
    ("GPS 3.3 Voltage", 78, 2, ONE),
    ("GPS 3.3 Current", 80, 2, ONE),
    ("GPS 12 Voltage", 82, 6, ONE),
    ("GPS 12 Current", 88, 6, ONE),
    ("Battery Heater Current", 94, 2, ONE),
    // CIP
    ("General Information", 96, 4, ONE),
    ("CIP Temperature", 100, 6, ONE),
    // UHF
    ("System Check Temperature", 106, 2, ONE),
    ("System Check Current Channel", 108, 1, ONE),
    ("Shell Temperature", 109, 2, ONE),
    ("Check Sum Counter", 111, 2, ONE),
    ("Configuration Status", 113, 1, ONE),
    // S-Band: scrambler status, PA gain and status register
    ("SBandByte", 114, 1, ONE),
    // ADCS
    ("Command Status", 115, 1, ONE),
    ("Command Reject Count", 116, 1, ONE),
    ("Command Accept Count", 117, 1, ONE),
    ("Time Valid", 118, 1, ONE),
    ("Time Now", 119, 4, ONE),
    ("Refs Valid", 123, 1, ONE),
    ("Attitude Valid", 123, 1, ONE),
    ("ADCS Mode", 124, 1, ONE),
    ("Recommend Sun Point", 125, 1, ONE),
    ("Sun Point State", 126, 1, ONE),
    ("Star Tracker Temperature", 127, 1, ONE),
    ("Wheel Temperatures", 128, 6, ONE),
    ("Digital Bus Voltage", 134, 2, ONE),
    ("Sun Vector", 136, 6, ONE),
    ("Wheel Est Drag", 142, 6, ONE),
    ("Wheel Measured Speed", 148, 6, ONE),
    ("Body Frame Rate", 154, 12, ONE),
];
