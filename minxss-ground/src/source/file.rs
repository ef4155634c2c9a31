use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{fs::File, io, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use super::{FRAME_CHANNEL_CAPACITY, PacketSource, PumpEnd, flush_frames, pump_frames};
use crate::kiss::KissDeframer;

/// Replays a capture of the serial byte stream.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PacketSource for FileSource {
    type Error = io::Error;

    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<Vec<u8>>, Self::Error> {
        let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let file = File::open(&self.path).await?;
        info!(path = ?self.path, "Replaying capture file");

        tokio::spawn(replay(file, tx, cancel));

        Ok(rx)
    }
}

#[instrument(name = "file_replay", skip_all)]
async fn replay(file: File, tx: mpsc::Sender<Vec<u8>>, cancel: CancellationToken) {
    let mut deframer = KissDeframer::new();

    match pump_frames(file, &mut deframer, &tx, &cancel).await {
        PumpEnd::Eof => {
            flush_frames(&mut deframer, &tx).await;
            info!("Capture file exhausted");
        }
        PumpEnd::Cancelled => info!("Replay cancelled"),
        PumpEnd::ReceiverClosed => info!("Decoder stopped, ending replay"),
        PumpEnd::Io(e) => error!(error = %e, "Failed to read capture file"),
    }
}
