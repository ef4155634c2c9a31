use std::io::Write;

use minxss_core::{PacketParser, ParseError, TelemetryRecord};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use ulid::Ulid;

/// Unique identifier for a decoded downlink frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameId(pub Ulid);

/// A decoded frame as reported by the ground station.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedFrame {
    pub id: FrameId,
    /// When the frame came off the source.
    pub received_at: jiff::Timestamp,
    pub telemetry: TelemetryRecord,
}

/// Running totals for one ground station session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationStats {
    pub decoded: u64,
    /// Frames without a start sync marker.
    pub unsynced: u64,
    /// Frames that were found but failed to decode.
    pub rejected: u64,
}

/// Decodes frames and keeps count; a bad frame never stops the station.
pub struct GroundStation {
    parser: PacketParser,
    stats: StationStats,
}

impl GroundStation {
    pub fn new(parser: PacketParser) -> Self {
        Self {
            parser,
            stats: StationStats::default(),
        }
    }

    pub fn parser(&self) -> &PacketParser {
        &self.parser
    }

    pub fn stats(&self) -> StationStats {
        self.stats
    }

    pub fn decode(&mut self, frame: &[u8]) -> Option<DecodedFrame> {
        let received_at = jiff::Timestamp::now();

        match self.parser.parse_packet(frame) {
            Ok(telemetry) => {
                self.stats.decoded += 1;
                Some(DecodedFrame {
                    id: FrameId(Ulid::new()),
                    received_at,
                    telemetry,
                })
            }
            Err(ParseError::FrameNotFound { .. }) => {
                // Already logged by the parser.
                self.stats.unsynced += 1;
                None
            }
            Err(e) => {
                warn!(error = %e, len = frame.len(), "Discarding malformed packet");
                self.stats.rejected += 1;
                None
            }
        }
    }

    /// Decode every frame from `frames` until the channel closes or `cancel`
    /// fires, writing one JSON document per decoded frame to `out`.
    #[instrument(name = "decode_loop", skip_all)]
    pub async fn run<W>(
        mut self,
        mut frames: mpsc::Receiver<Vec<u8>>,
        cancel: CancellationToken,
        mut out: W,
        pretty: bool,
    ) -> StationStats
    where
        W: Write + Send,
    {
        info!(fields = self.parser.table().len(), "Decoder started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Decoder shutting down");
                    break;
                }
                frame = frames.recv() => {
                    let Some(frame) = frame else {
                        info!("Frame source closed");
                        break;
                    };
                    let Some(decoded) = self.decode(&frame) else {
                        continue;
                    };
                    if let Err(e) = write_frame(&mut out, &decoded, pretty) {
                        error!(error = %e, frame_id = %decoded.id.0, "Failed to write decoded frame");
                    }
                }
            }
        }

        let stats = self.stats;
        info!(
            decoded = stats.decoded,
            unsynced = stats.unsynced,
            rejected = stats.rejected,
            "Decoder stopped"
        );
        stats
    }
}

pub fn write_frame<W: Write>(out: &mut W, frame: &DecodedFrame, pretty: bool) -> std::io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, frame)?;
    } else {
        serde_json::to_writer(&mut *out, frame)?;
    }
    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minxss_core::{DomainPolicy, protocol::reference::REFERENCE_PACKET};

    #[test]
    fn counts_each_outcome() {
        let mut station =
            GroundStation::new(PacketParser::default().with_domain_policy(DomainPolicy::Record));

        assert!(station.decode(&REFERENCE_PACKET).is_some());
        assert!(station.decode(&[0x01, 0x02, 0x03]).is_none());
        assert!(station.decode(&REFERENCE_PACKET[..40]).is_none());

        assert_eq!(
            station.stats(),
            StationStats {
                decoded: 1,
                unsynced: 1,
                rejected: 1,
            }
        );
    }

    #[test]
    fn strict_policy_rejects_reference_packet() {
        let mut station = GroundStation::new(PacketParser::default());

        assert!(station.decode(&REFERENCE_PACKET).is_none());
        assert_eq!(station.stats().rejected, 1);
    }

    #[test]
    fn frame_serializes_as_one_line() {
        let mut station =
            GroundStation::new(PacketParser::default().with_domain_policy(DomainPolicy::Record));
        let frame = station.decode(&REFERENCE_PACKET).unwrap();

        let mut out = Vec::new();
        write_frame(&mut out, &frame, false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let interface = json["telemetry"]["Interface Board Temperature"].as_f64().unwrap();
        assert!((interface - 25.0).abs() < 1e-9);
        assert_eq!(json["telemetry"]["Battery Voltage"], 0);
        assert!(json["telemetry"]["Time Stamp"].is_null());
        assert!(json["received_at"].is_string());
    }
}
