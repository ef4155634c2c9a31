use tracing::debug;

use super::UnsupportedWidth;

/// Rebuild a little-endian integer from 1, 2 or 4 bytes.
///
/// With `signed` set, the last byte carries the two's-complement sign of a
/// 16- or 32-bit value. A single byte is always returned as-is.
pub fn decode_int(bytes: &[u8], signed: bool) -> Result<i64, UnsupportedWidth> {
    match (bytes, signed) {
        ([byte], _) => Ok(i64::from(*byte)),
        ([lo, hi], false) => Ok(i64::from(u16::from_le_bytes([*lo, *hi]))),
        ([lo, hi], true) => Ok(i64::from(i16::from_le_bytes([*lo, *hi]))),
        ([b0, b1, b2, b3], false) => Ok(i64::from(u32::from_le_bytes([*b0, *b1, *b2, *b3]))),
        ([b0, b1, b2, b3], true) => Ok(i64::from(i32::from_le_bytes([*b0, *b1, *b2, *b3]))),
        _ => {
            debug!(len = bytes.len(), "More bytes than the integer decoder accepts");
            Err(UnsupportedWidth(bytes.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_byte_is_never_sign_extended() {
        assert_eq!(decode_int(&[0xFF], true), Ok(255));
        assert_eq!(decode_int(&[0xFF], false), Ok(255));
        assert_eq!(decode_int(&[0x00], true), Ok(0));
    }

    #[test]
    fn two_bytes_little_endian() {
        assert_eq!(decode_int(&[0x34, 0x12], false), Ok(0x1234));
        assert_eq!(decode_int(&[0x34, 0x12], true), Ok(0x1234));
        assert_eq!(decode_int(&[0xFF, 0xFF], true), Ok(-1));
        assert_eq!(decode_int(&[0x00, 0x80], true), Ok(-32768));
        assert_eq!(decode_int(&[0xFF, 0xFF], false), Ok(65535));
    }

    #[test]
    fn four_bytes_little_endian() {
        assert_eq!(decode_int(&[0x78, 0x56, 0x34, 0x12], false), Ok(0x1234_5678));
        assert_eq!(decode_int(&[0xFE, 0xFF, 0xFF, 0xFF], true), Ok(-2));
        assert_eq!(decode_int(&[0xFE, 0xFF, 0xFF, 0xFF], false), Ok(0xFFFF_FFFE));
        assert_eq!(decode_int(&[0x00, 0x00, 0x00, 0x80], true), Ok(i64::from(i32::MIN)));
    }

    #[test]
    fn other_widths_are_rejected() {
        for len in [0usize, 3, 5, 6, 8, 12] {
            let bytes = vec![0u8; len];
            assert_eq!(decode_int(&bytes, false), Err(UnsupportedWidth(len)));
            assert_eq!(decode_int(&bytes, true), Err(UnsupportedWidth(len)));
        }
    }

    #[test]
    fn every_two_byte_input_unsigned() {
        for lo in 0..=u8::MAX {
            for hi in 0..=u8::MAX {
                let value = decode_int(&[lo, hi], false).unwrap();
                assert_eq!(value, i64::from(lo) | (i64::from(hi) << 8));
                assert!((0..=65535).contains(&value));
            }
        }
    }

    proptest! {
        #[test]
        fn high_sign_bit_is_negative(lo in any::<u8>(), hi in 0x80u8..=0xFF) {
            prop_assert!(decode_int(&[lo, hi], true).unwrap() < 0);
        }

        #[test]
        fn four_byte_ranges(bytes in any::<[u8; 4]>()) {
            let unsigned = decode_int(&bytes, false).unwrap();
            let signed = decode_int(&bytes, true).unwrap();

            prop_assert!((0..=i64::from(u32::MAX)).contains(&unsigned));
            prop_assert!((i64::from(i32::MIN)..=i64::from(i32::MAX)).contains(&signed));

            if bytes[3] & 0x80 == 0 {
                prop_assert_eq!(unsigned & 0x7FFF_FFFF, signed & 0x7FFF_FFFF);
                prop_assert_eq!(unsigned, signed);
            } else {
                prop_assert!(signed < 0);
            }
        }
    }
}
