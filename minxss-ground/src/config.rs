use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minxss_core::{
    DomainPolicy, FieldDescriptor, FieldTable, FrameLocator, PacketParser, START_SYNC, STOP_SYNC,
    SyncMarker, TableError,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub framing: FramingConfig,
    #[serde(default)]
    pub decode: DecodeConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Replacement packet layout. The built-in MinXSS table is used when absent.
    pub fields: Option<Vec<FieldDescriptor>>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Marker at the first byte of every packet
    pub start_sync: SyncMarker,
    /// Marker after the last byte of every packet
    pub stop_sync: SyncMarker,
}

#[derive(Debug, Default, Deserialize)]
pub struct DecodeConfig {
    #[serde(default)]
    pub on_domain_error: DomainPolicy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    #[default]
    Stdin,
    File {
        path: PathBuf,
    },
    /// Serial-to-TCP bridge in front of the radio
    Tcp {
        addr: SocketAddr,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print records instead of one JSON object per line
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn field_table(&self) -> Result<FieldTable, TableError> {
        match &self.fields {
            Some(fields) => FieldTable::new(fields.clone()),
            None => Ok(FieldTable::minxss()),
        }
    }

    pub fn parser(&self) -> Result<PacketParser, TableError> {
        let table = self.field_table()?;
        Ok(PacketParser::new(Arc::new(table))
            .with_locator(FrameLocator::new(
                self.framing.start_sync,
                self.framing.stop_sync,
            ))
            .with_domain_policy(self.decode.on_domain_error))
    }
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            start_sync: START_SYNC,
            stop_sync: STOP_SYNC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.framing.start_sync, START_SYNC);
        assert_eq!(config.framing.stop_sync, STOP_SYNC);
        assert_eq!(config.decode.on_domain_error, DomainPolicy::Abort);
        assert!(matches!(config.source, SourceConfig::Stdin));
        assert!(!config.output.pretty);
        assert_eq!(config.field_table().unwrap(), FieldTable::minxss());
    }

    #[test]
    fn full_config() {
        let config: Config = toml::from_str(
            r#"
            [framing]
            start_sync = [0xEB, 0x90]
            stop_sync = [0xC5, 0xC5]

            [decode]
            on_domain_error = "record"

            [source]
            type = "tcp"
            addr = "127.0.0.1:4001"

            [output]
            pretty = true

            [[fields]]
            name = "Bus Voltage"
            offset = 2
            length = 2
            decode = { kind = "unsigned", width = 2 }

            [[fields]]
            name = "Board Temperature"
            offset = 4
            length = 2
            decode = { kind = "thermistor" }
            "#,
        )
        .unwrap();

        assert_eq!(config.framing.start_sync, SyncMarker([0xEB, 0x90]));
        assert!(matches!(
            config.source,
            SourceConfig::Tcp { addr } if addr.port() == 4001
        ));
        assert!(config.output.pretty);

        let parser = config.parser().unwrap();
        assert_eq!(parser.domain_policy(), DomainPolicy::Record);
        assert_eq!(parser.locator().start, SyncMarker([0xEB, 0x90]));
        assert_eq!(parser.table().len(), 2);
        assert_eq!(parser.table().required_len(), 6);
    }

    #[test]
    fn invalid_field_table_is_reported() {
        let config: Config = toml::from_str(
            r#"
            [[fields]]
            name = "Twice"
            offset = 0
            length = 1
            decode = { kind = "raw" }

            [[fields]]
            name = "Twice"
            offset = 1
            length = 1
            decode = { kind = "raw" }
            "#,
        )
        .unwrap();

        assert_eq!(
            config.parser().unwrap_err(),
            TableError::DuplicateName("Twice".into())
        );
    }
}
