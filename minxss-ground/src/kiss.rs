//! KISS deframing of the byte stream coming off the radio's serial line.

use tracing::warn;

pub const FEND: u8 = 0xC0;
pub const FESC: u8 = 0xDB;
pub const TFEND: u8 = 0xDC;
pub const TFESC: u8 = 0xDD;

/// Frames longer than this are dropped; a MinXSS downlink frame is under 300 bytes.
pub const MAX_FRAME_LEN: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KissError {
    #[error("invalid escape sequence FESC {0:#04X}")]
    InvalidEscape(u8),

    #[error("frame exceeds the maximum KISS frame length")]
    FrameTooLong,
}

/// Splits an arbitrary sequence of chunks into unescaped KISS frames.
///
/// Frame content is returned as-is, including the KISS command byte.
#[derive(Debug, Default)]
pub struct KissDeframer {
    frame: Vec<u8>,
    escaped: bool,
    error: Option<KissError>,
}

impl KissDeframer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes in, get every frame completed by them back.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<Vec<u8>, KissError>> {
        let mut frames = Vec::new();

        for &byte in chunk {
            if byte == FEND {
                if let Some(frame) = self.finish_frame() {
                    frames.push(frame);
                }
                continue;
            }

            if self.error.is_some() {
                continue;
            }

            let byte = if self.escaped {
                self.escaped = false;
                match byte {
                    TFEND => FEND,
                    TFESC => FESC,
                    other => {
                        self.error = Some(KissError::InvalidEscape(other));
                        continue;
                    }
                }
            } else if byte == FESC {
                self.escaped = true;
                continue;
            } else {
                byte
            };

            if self.frame.len() == MAX_FRAME_LEN {
                self.error = Some(KissError::FrameTooLong);
                continue;
            }
            self.frame.push(byte);
        }

        frames
    }

    /// Flush a trailing frame that never saw its closing `FEND`.
    ///
    /// Used at end of input so raw captures without KISS delimiters still
    /// come through as one frame.
    pub fn finish(&mut self) -> Option<Result<Vec<u8>, KissError>> {
        self.finish_frame()
    }

    fn finish_frame(&mut self) -> Option<Result<Vec<u8>, KissError>> {
        if std::mem::take(&mut self.escaped) {
            self.error.get_or_insert(KissError::InvalidEscape(FEND));
        }
        if let Some(err) = self.error.take() {
            self.frame.clear();
            warn!(error = %err, "Discarding corrupt KISS frame");
            return Some(Err(err));
        }
        if self.frame.is_empty() {
            return None;
        }
        Some(Ok(std::mem::take(&mut self.frame)))
    }
}
