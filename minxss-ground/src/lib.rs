pub mod config;
pub mod kiss;
pub mod source;
pub mod station;

pub use config::{Config, DecodeConfig, FramingConfig, OutputConfig, SourceConfig};
pub use kiss::{KissDeframer, KissError};
pub use source::{FileSource, PacketSource, StdinSource, TcpSource};
pub use station::{DecodedFrame, FrameId, GroundStation, StationStats, write_frame};
