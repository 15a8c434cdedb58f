//! Writer task: the only code that writes to the transport.
//!
//! Every outbound frame passes through one queue, so frames reach the wire in
//! the order they were enqueued no matter which task produced them.

use futures::SinkExt;
use tokio::io::AsyncWrite;
use tokio::sync::{mpsc, oneshot};
use tokio_util::codec::FramedWrite;
use tracing::{debug, error, warn};

use crate::core::{Error, Result};
use crate::protocol::{Frame, FrameCodec};

pub(crate) struct Writer<W> {
    sink: FramedWrite<W, FrameCodec>,
    frames: mpsc::UnboundedReceiver<Frame>,
    shutdown: oneshot::Receiver<()>,
}

impl<W> Writer<W>
where
    W: AsyncWrite + Unpin,
{
    pub(crate) fn new(
        transport: W,
        frames: mpsc::UnboundedReceiver<Frame>,
        shutdown: oneshot::Receiver<()>,
    ) -> Self {
        Writer {
            sink: FramedWrite::new(transport, FrameCodec::new()),
            frames,
            shutdown,
        }
    }

    /// Writes frames until shut down, then drains the queue and closes the
    /// transport's write side.
    pub(crate) async fn run(mut self) -> Result<()> {
        loop {
            tokio::select! {
                frame = self.frames.recv() => match frame {
                    Some(frame) => self.write(frame).await?,
                    None => break,
                },
                _ = &mut self.shutdown => {
                    self.frames.close();
                    while let Some(frame) = self.frames.recv().await {
                        self.write(frame).await?;
                    }
                    break;
                }
            }
        }

        self.sink.close().await.map_err(|e| {
            error!(error = %e, "transport shutdown failed");
            e
        })?;
        debug!("writer stopped");
        Ok(())
    }

    async fn write(&mut self, frame: Frame) -> Result<()> {
        match self.sink.send(frame).await {
            Ok(()) => Ok(()),
            Err(Error::Codec(e)) => {
                // Nothing of the frame was written, so the stream is intact
                warn!(error = %e, "dropping unencodable frame");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "transport write failed");
                Err(e)
            }
        }
    }
}
