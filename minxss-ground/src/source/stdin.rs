use async_trait::async_trait;
use tokio::{io, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use super::{FRAME_CHANNEL_CAPACITY, PacketSource, PumpEnd, flush_frames, pump_frames};
use crate::kiss::KissDeframer;

/// Reads the serial byte stream piped into the process.
#[derive(Debug, Default)]
pub struct StdinSource;

#[async_trait]
impl PacketSource for StdinSource {
    type Error = io::Error;

    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<Vec<u8>>, Self::Error> {
        let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        info!("Reading frames from stdin");

        tokio::spawn(read_stdin(tx, cancel));

        Ok(rx)
    }
}

#[instrument(name = "stdin_reader", skip_all)]
async fn read_stdin(tx: mpsc::Sender<Vec<u8>>, cancel: CancellationToken) {
    let mut deframer = KissDeframer::new();

    match pump_frames(io::stdin(), &mut deframer, &tx, &cancel).await {
        PumpEnd::Eof => {
            flush_frames(&mut deframer, &tx).await;
            info!("stdin closed");
        }
        PumpEnd::Cancelled => info!("stdin reader cancelled"),
        PumpEnd::ReceiverClosed => info!("Decoder stopped, ending stdin reader"),
        PumpEnd::Io(e) => error!(error = %e, "Failed to read stdin"),
    }
}
