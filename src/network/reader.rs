use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio_util::codec::Decoder;
use tracing::{debug, error, trace, warn};

use super::registry::{Outbound, SharedRegistry};
use super::requests::Ack;
use crate::core::{CodecError, Error};
use crate::protocol::{Frame, FrameCodec};

/// Inbound half of a connection: decodes frames and applies them
pub(crate) struct Reader<R> {
    transport: R,
    codec: FrameCodec,
    recv_buffer: BytesMut,
    registry: SharedRegistry,
    outbound: Outbound,
    acks: mpsc::UnboundedSender<Ack>,
}

impl<R> Reader<R>
where
    R: AsyncRead + Unpin,
{
    pub(crate) fn new(
        transport: R,
        registry: SharedRegistry,
        outbound: Outbound,
        acks: mpsc::UnboundedSender<Ack>,
    ) -> Self {
        Reader {
            transport,
            codec: FrameCodec::new(),
            recv_buffer: BytesMut::with_capacity(4096),
            registry,
            outbound,
            acks,
        }
    }

    /// Reads until the transport fails or reaches end of stream
    pub(crate) async fn run(mut self) {
        loop {
            match self.transport.read_buf(&mut self.recv_buffer).await {
                Ok(0) => {
                    debug!("transport closed");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "transport read failed");
                    break;
                }
            }

            loop {
                match self.codec.decode(&mut self.recv_buffer) {
                    Ok(Some(frame)) => self.dispatch(frame),
                    Ok(None) => break,
                    Err(Error::Codec(CodecError::UnrecognizedCode(code))) => {
                        warn!(code, "skipping unrecognized byte");
                    }
                    Err(e) => {
                        warn!(error = %e, "malformed frame, stream may be out of sync");
                    }
                }
            }
        }
        debug!("reader stopped");
    }

    fn dispatch(&mut self, frame: Frame) {
        match frame {
            Frame::EntryData { key, value } => {
                let target = self.registry.lock().resolve_remote_key(key);
                let Some((table, name)) = target else {
                    trace!(key, "data for unknown key ignored");
                    return;
                };
                table.apply(&name, value);
                trace!(table = table.name(), key = %name, %value, "remote update applied");
                if self.outbound.send(Frame::Confirmation(1)).is_err() {
                    debug!("writer gone, confirmation dropped");
                }
            }

            Frame::TableAssignment { local, remote } => {
                if !self.registry.lock().bind_remote_table(local, remote) {
                    trace!(local, remote, "assignment for unknown table ignored");
                }
            }

            Frame::KeyAssignment { table, name, key } => {
                match self.registry.lock().bind_remote_key(table, &name, key) {
                    Ok(true) => trace!(table, key = %name, id = key, "remote key bound"),
                    Ok(false) => trace!(table, key = %name, "assignment for unknown table ignored"),
                    Err(e) => debug!(error = %e, "could not advertise new key"),
                }
            }

            Frame::Confirmation(count) => self.signal(Ack::Confirmed, count),
            Frame::Denial(count) => self.signal(Ack::Denied, count),

            Frame::TableRequest { .. } => {
                trace!("table request from peer ignored");
            }
        }
    }

    fn signal(&self, ack: Ack, count: u8) {
        for _ in 0..count {
            if self.acks.send(ack).is_err() {
                debug!(?ack, "coordinator gone, acknowledgement dropped");
                return;
            }
        }
    }
}
