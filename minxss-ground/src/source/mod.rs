pub mod file;
pub mod stdin;
pub mod tcp;

pub use file::FileSource;
pub use stdin::StdinSource;
pub use tcp::TcpSource;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::kiss::KissDeframer;

/// Capacity of the frame channel between a source and the decoder.
pub const FRAME_CHANNEL_CAPACITY: usize = 64;

const READ_CHUNK: usize = 512;

/// Something that yields raw downlink frames.
///
/// Implementations spawn a background task that deframes the incoming byte
/// stream and sends every frame to the returned channel. The task stops when
/// the input ends or the cancellation token fires, closing the channel.
#[async_trait]
pub trait PacketSource: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<Vec<u8>>, Self::Error>;
}

/// Why [`pump_frames`] returned.
#[derive(Debug)]
pub(crate) enum PumpEnd {
    Eof,
    Cancelled,
    ReceiverClosed,
    Io(std::io::Error),
}

/// Read `reader` until it ends, forwarding every complete KISS frame.
pub(crate) async fn pump_frames<R>(
    mut reader: R,
    deframer: &mut KissDeframer,
    tx: &mpsc::Sender<Vec<u8>>,
    cancel: &CancellationToken,
) -> PumpEnd
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = tokio::select! {
            _ = cancel.cancelled() => return PumpEnd::Cancelled,
            read = reader.read(&mut chunk) => match read {
                Ok(0) => return PumpEnd::Eof,
                Ok(n) => n,
                Err(e) => return PumpEnd::Io(e),
            },
        };

        for frame in deframer.push(&chunk[..n]) {
            match frame {
                Ok(frame) => {
                    debug!(len = frame.len(), "KISS frame received");
                    if tx.send(frame).await.is_err() {
                        return PumpEnd::ReceiverClosed;
                    }
                }
                Err(e) => warn!(error = %e, "Dropped KISS frame"),
            }
        }
    }
}

/// Forward the frame left in `deframer` once the input has ended.
pub(crate) async fn flush_frames(deframer: &mut KissDeframer, tx: &mpsc::Sender<Vec<u8>>) {
    match deframer.finish() {
        Some(Ok(frame)) => {
            debug!(len = frame.len(), "Flushing unterminated frame at end of input");
            if tx.send(frame).await.is_err() {
                debug!("Decoder already stopped, dropping final frame");
            }
        }
        Some(Err(e)) => warn!(error = %e, "Dropped KISS frame at end of input"),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flush_forwards_unterminated_frame() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut deframer = KissDeframer::new();
        assert!(deframer.push(&[0x08, 0x19, 0x2A]).is_empty());

        flush_frames(&mut deframer, &tx).await;

        assert_eq!(rx.recv().await, Some(vec![0x08, 0x19, 0x2A]));
        assert!(deframer.finish().is_none());
    }

    #[tokio::test]
    async fn flush_after_decoder_stopped_drops_frame() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut deframer = KissDeframer::new();
        assert!(deframer.push(&[0x08, 0x19, 0x2A]).is_empty());

        flush_frames(&mut deframer, &tx).await;

        assert!(tx.is_closed());
        assert!(deframer.finish().is_none());
    }
}
