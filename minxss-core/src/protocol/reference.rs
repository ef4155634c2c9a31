//! Housekeeping packet captured from the MinXSS downlink.
//!
//! The buffer is framed the way the serial KISS reader delivers it, with `0xC0`
//! delimiters at both ends and the AX.25 header ahead of the start sync marker
//! at index 18. The stop marker sits at index 270.

pub const REFERENCE_PACKET: [u8; 273] = [
    0xC0, 0x00, 0x9A, 0x92, 0x00, 0xB0, 0xA6, 0x64, 0x60, 0x86,
    0xA2, 0x40, 0x40, 0x40, 0x40, 0xE1, 0x03, 0xF0, 0x08, 0x19,
    0xC1, 0x6F, 0x00, 0xF7, 0xF1, 0x34, 0xD6, 0x45, 0x47, 0x02,
    0x0A, 0x86, 0x4B, 0x00, 0x0C, 0x00, 0x01, 0x00, 0x2E, 0x74,
    0x01, 0x03, 0x30, 0x03, 0x00, 0x03, 0x79, 0x00, 0x00, 0x01,
    0xFA, 0xC7, 0x10, 0x01, 0x03, 0x00, 0x00, 0x01, 0x5A, 0x80,
    0x04, 0x01, 0x00, 0x00, 0x00, 0x92, 0x00, 0x00, 0x00, 0x21,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00,
    0x00, 0x01, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x5F, 0x00,
    0x47, 0x13, 0x00, 0x00, 0x0A, 0x80, 0xF6, 0x01, 0xE2, 0x03,
    0xD3, 0x0B, 0x06, 0x08, 0x90, 0x18, 0x05, 0x04, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
    0x00, 0x00, 0x8E, 0x01, 0x13, 0x00, 0x6D, 0x00, 0x00, 0x64,
    0x88, 0x01, 0x00, 0x00, 0xAC, 0x25, 0x01, 0x00, 0x07, 0x0B,
    0x20, 0x17, 0x40, 0x15, 0x90, 0x15, 0x80, 0x17, 0x40, 0x18,
    0xE0, 0xCE, 0x58, 0x61, 0x08, 0x00, 0x78, 0x07, 0x08, 0x00,
    0x80, 0x06, 0x08, 0x00, 0x30, 0x06, 0x18, 0x00, 0x50, 0x20,
    0x30, 0x01, 0x90, 0x0D, 0x18, 0x00, 0x78, 0x13, 0x4D, 0x05,
    0x44, 0x05, 0x51, 0x05, 0x09, 0x08, 0x14, 0x00, 0x9E, 0x05,
    0x6C, 0x00, 0xA0, 0x05, 0xF3, 0x01, 0x5C, 0x00, 0x4F, 0x02,
    0x52, 0x02, 0x53, 0x01, 0x53, 0x01, 0x33, 0x01, 0x00, 0x00,
    0x08, 0x01, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0xCD, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0xC7, 0x2F, 0x20, 0x12, 0xD8, 0x00, 0x00, 0x00,
    0x05, 0x07, 0x02, 0x00, 0x00, 0x00, 0x27, 0x06, 0x00, 0x00,
    0x09, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFC, 0xFF,
    0xFD, 0xFF, 0x07, 0x00, 0x07, 0x49, 0x00, 0x00, 0xE5, 0xF9,
    0xA5, 0xA5, 0xC0,
];
