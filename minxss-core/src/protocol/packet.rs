use std::sync::{Arc, LazyLock};

use serde::Deserialize;
use tracing::{debug, error, info};

use super::{FieldTable, FrameLocator, ParseError, ParseResult};
use crate::{TelemetryRecord, TelemetryValue};

static MINXSS_TABLE: LazyLock<Arc<FieldTable>> = LazyLock::new(|| Arc::new(FieldTable::minxss()));

/// What to do when a thermistor reading falls outside the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainPolicy {
    /// Fail the whole packet, like every other field error.
    #[default]
    Abort,
    /// Keep the error as [`TelemetryValue::Undefined`] and continue.
    Record,
}

/// Turns raw downlink buffers into [`TelemetryRecord`]s.
///
/// The parser holds only read-only configuration, so one instance can be
/// shared across threads and tasks.
#[derive(Debug, Clone)]
pub struct PacketParser {
    table: Arc<FieldTable>,
    locator: FrameLocator,
    domain_policy: DomainPolicy,
}

impl PacketParser {
    pub fn new(table: Arc<FieldTable>) -> Self {
        Self {
            table,
            locator: FrameLocator::default(),
            domain_policy: DomainPolicy::default(),
        }
    }

    pub fn with_locator(mut self, locator: FrameLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_domain_policy(mut self, policy: DomainPolicy) -> Self {
        self.domain_policy = policy;
        self
    }

    pub fn table(&self) -> &FieldTable {
        &self.table
    }

    pub fn locator(&self) -> &FrameLocator {
        &self.locator
    }

    pub fn domain_policy(&self) -> DomainPolicy {
        self.domain_policy
    }

    /// Decode one packet.
    ///
    /// Offsets are relative to the start sync marker; anything before it is
    /// dropped. The stop marker is not consulted. The first failing field aborts
    /// the whole decode.
    pub fn parse_packet(&self, buffer: &[u8]) -> ParseResult<TelemetryRecord> {
        let Some(start) = self.locator.find_start(buffer) else {
            error!(len = buffer.len(), "No start sync bytes found, discarding buffer");
            return Err(ParseError::FrameNotFound {
                available: buffer.len(),
            });
        };

        let frame = &buffer[start..];
        debug!(start, frame_len = frame.len(), "Reframed packet at start sync");

        let mut record = TelemetryRecord::with_capacity(self.table.len());
        for field in self.table.iter() {
            let value = match field.decode_from(frame) {
                Ok(value) => value,
                Err(ParseError::Domain { field: name, source })
                    if self.domain_policy == DomainPolicy::Record =>
                {
                    debug!(field = %name, error = %source, "Recording out-of-domain reading");
                    TelemetryValue::Undefined(source)
                }
                Err(e) => return Err(e),
            };
            record.push(field.name.clone(), value);
        }

        info!(start, fields = record.len(), "Decoded telemetry packet");
        debug!(?record, "Telemetry");

        Ok(record)
    }
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new(Arc::clone(&MINXSS_TABLE))
    }
}
