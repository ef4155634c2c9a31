type BoxStr = Box<str>;

pub type ParseResult<T> = core::result::Result<T, ParseError>;

/// Failure to turn a raw buffer into a telemetry record.
///
/// None of these are fatal to the caller: log, drop the buffer and move on to
/// the next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no start sync marker in {available}-byte buffer")]
    FrameNotFound { available: usize },

    #[error("field {field:?} needs {length} bytes at offset {offset} but the frame holds {available}")]
    FieldOutOfRange {
        field: BoxStr,
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("field {field:?} cannot combine {width} bytes into an integer")]
    UnsupportedFieldWidth { field: BoxStr, width: usize },

    #[error("field {field:?} is outside the thermistor model")]
    Domain {
        field: BoxStr,
        #[source]
        source: DomainError,
    },
}

/// The byte decoder was handed a slice it cannot combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported integer width: {0} bytes (expected 1, 2 or 4)")]
pub struct UnsupportedWidth(pub usize);

/// The thermistor formula has no real answer for this reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DomainError {
    #[error("divider voltage {vraw} equals the supply, divisor is zero")]
    ZeroDivisor { vraw: u16 },

    #[error("divider voltage {vraw} yields a non-positive resistance")]
    NonPositiveResistance { vraw: u16 },

    #[error("divider voltage {vraw} yields a non-finite temperature")]
    NonFinite { vraw: u16 },
}

/// A field table that cannot be used for decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("duplicate field name {0:?}")]
    DuplicateName(BoxStr),

    #[error("field {name:?} has unsupported length {length}")]
    UnsupportedLength { name: BoxStr, length: usize },

    #[error("field {name:?} decodes {width} bytes out of a {length}-byte field")]
    UnsupportedWidth {
        name: BoxStr,
        width: usize,
        length: usize,
    },

    #[error("field {name:?} is {length} bytes, the thermistor needs at least 2")]
    ThermistorTooShort { name: BoxStr, length: usize },

    #[error("field {name:?} ends past the addressable range ({length} bytes at offset {offset})")]
    OffsetOverflow {
        name: BoxStr,
        offset: usize,
        length: usize,
    },
}
