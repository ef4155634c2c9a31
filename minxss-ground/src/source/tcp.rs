use std::{net::SocketAddr, time::Duration};

use async_trait::async_trait;
use tokio::{io, net::TcpStream, sync::mpsc, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use super::{FRAME_CHANNEL_CAPACITY, PacketSource, PumpEnd, pump_frames};
use crate::kiss::KissDeframer;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Reads the serial byte stream from a serial-to-TCP bridge.
///
/// The first connection must succeed. After that the source reconnects with
/// exponential backoff whenever the bridge drops, until cancelled.
pub struct TcpSource {
    addr: SocketAddr,
}

impl TcpSource {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }
}

#[async_trait]
impl PacketSource for TcpSource {
    type Error = io::Error;

    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<Vec<u8>>, Self::Error> {
        let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let stream = TcpStream::connect(self.addr).await?;
        info!(addr = %self.addr, "Connected to serial bridge");

        tokio::spawn(run_bridge_loop(self.addr, stream, tx, cancel));

        Ok(rx)
    }
}

#[instrument(name = "serial_bridge", skip(stream, tx, cancel))]
async fn run_bridge_loop(
    addr: SocketAddr,
    stream: TcpStream,
    tx: mpsc::Sender<Vec<u8>>,
    cancel: CancellationToken,
) {
    let mut stream = Some(stream);
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let current = match stream.take() {
            Some(s) => s,
            None => {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = sleep(backoff) => {}
                }
                match TcpStream::connect(addr).await {
                    Ok(s) => {
                        info!("Reconnected to serial bridge");
                        backoff = INITIAL_BACKOFF;
                        s
                    }
                    Err(e) => {
                        backoff = (backoff * 2).min(MAX_BACKOFF);
                        warn!(error = %e, backoff_secs = backoff.as_secs(), "Serial bridge unreachable, will retry");
                        continue;
                    }
                }
            }
        };

        // A partial frame does not survive a reconnect.
        let mut deframer = KissDeframer::new();
        match pump_frames(current, &mut deframer, &tx, &cancel).await {
            PumpEnd::Eof => warn!("Serial bridge closed the connection"),
            PumpEnd::Io(e) => warn!(error = %e, "Serial bridge read failed"),
            PumpEnd::Cancelled => break,
            PumpEnd::ReceiverClosed => {
                info!("Decoder stopped, closing serial bridge");
                break;
            }
        }
    }

    info!("Serial bridge reader shut down");
}
