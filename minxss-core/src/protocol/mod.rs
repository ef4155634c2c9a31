mod bytes;
mod error;
mod field;
mod packet;
pub mod reference;
mod sync;
pub mod thermistor;

pub use bytes::decode_int;
pub use error::{DomainError, ParseError, ParseResult, TableError, UnsupportedWidth};
pub use field::{ConversionKind, FieldDescriptor, FieldTable};
pub use packet::{DomainPolicy, PacketParser};
pub use sync::{FrameLocator, SyncMarker};

pub const SYNC_SIZE: usize = 2;
pub const START_SYNC: SyncMarker = SyncMarker([0x08, 0x19]);
pub const STOP_SYNC: SyncMarker = SyncMarker([0xA5, 0xA5]);

/// Field lengths the packet layout is allowed to use.
pub const FIELD_LENGTHS: [usize; 7] = [1, 2, 4, 5, 6, 8, 12];
/// Byte counts the integer decoder can combine.
pub const INT_WIDTHS: [usize; 3] = [1, 2, 4];
