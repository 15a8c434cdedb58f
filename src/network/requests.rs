//! Request coordinator: serves puts one at a time.
//!
//! A put sends its data frame and then waits for exactly one acknowledgement
//! from the reader. Serving puts strictly in sequence is what lets an
//! acknowledgement be attributed to the right put, since the peer's replies
//! carry no identifiers.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use super::registry::{Outbound, SharedRegistry};
use crate::core::{Entry, Error, Id, Result};
use crate::protocol::Frame;

/// Peer response to a pending data frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ack {
    Confirmed,
    Denied,
}

/// A caller's put, queued for the coordinator
#[derive(Debug)]
pub(crate) struct PutRequest {
    table: Id,
    key: String,
    value: Entry,
    reply: oneshot::Sender<Result<()>>,
}

/// Sending side of the put queue, shared by the client and its tables.
///
/// Closing it stops new puts from being accepted; puts already queued are
/// still served.
#[derive(Debug, Clone)]
pub(crate) struct RequestHandle {
    tx: Arc<Mutex<Option<mpsc::UnboundedSender<PutRequest>>>>,
}

impl RequestHandle {
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<PutRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = RequestHandle {
            tx: Arc::new(Mutex::new(Some(tx))),
        };
        (handle, rx)
    }

    /// Queues a put and waits for its outcome
    pub(crate) async fn put(&self, table: Id, key: String, value: Entry) -> Result<()> {
        let (reply, outcome) = oneshot::channel();
        let request = PutRequest {
            table,
            key,
            value,
            reply,
        };

        {
            let tx = self.tx.lock();
            let tx = tx.as_ref().ok_or(Error::ConnectionClosed)?;
            tx.send(request).map_err(|_| Error::ConnectionClosed)?;
        }

        outcome.await.map_err(|_| Error::ConnectionClosed)?
    }

    /// Stops accepting puts
    pub(crate) fn close(&self) {
        self.tx.lock().take();
    }
}

/// Task state for the request coordinator
pub(crate) struct Coordinator {
    registry: SharedRegistry,
    outbound: Outbound,
    requests: mpsc::UnboundedReceiver<PutRequest>,
    acks: mpsc::UnboundedReceiver<Ack>,
    put_timeout: Option<Duration>,
}

impl Coordinator {
    pub(crate) fn new(
        registry: SharedRegistry,
        outbound: Outbound,
        requests: mpsc::UnboundedReceiver<PutRequest>,
        acks: mpsc::UnboundedReceiver<Ack>,
        put_timeout: Option<Duration>,
    ) -> Self {
        Coordinator {
            registry,
            outbound,
            requests,
            acks,
            put_timeout,
        }
    }

    /// Runs until the put queue is closed and drained
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                Some(ack) = self.acks.recv() => {
                    warn!(?ack, "discarding acknowledgement with no put in flight");
                }

                request = self.requests.recv() => {
                    let Some(request) = request else { break };
                    let PutRequest { table, key, value, reply } = request;
                    let result = self.serve(table, &key, value).await;
                    if reply.send(result).is_err() {
                        trace!(table, key = %key, "put caller went away before the outcome");
                    }
                }
            }
        }
        debug!("request coordinator stopped");
    }

    async fn serve(&mut self, table_id: Id, key: &str, value: Entry) -> Result<()> {
        let (table, key_id) = {
            let mut registry = self.registry.lock();
            let table = registry
                .table_by_id(table_id)
                .ok_or_else(|| Error::protocol(format!("put on unknown table {}", table_id)))?;
            let key_id = registry.get_or_create_key_id(table_id, key)?;
            (table, key_id)
        };

        self.outbound.send(Frame::EntryData { key: key_id, value })?;
        trace!(table = table.name(), key, key_id, "put sent, awaiting acknowledgement");

        let ack = match self.put_timeout {
            Some(limit) => timeout(limit, self.acks.recv())
                .await
                .map_err(|_| Error::Timeout)?,
            None => self.acks.recv().await,
        };

        match ack {
            Some(Ack::Confirmed) => {
                table.apply(key, value);
                Ok(())
            }
            Some(Ack::Denied) => {
                debug!(table = table.name(), key, "put denied by peer");
                Err(Error::Denied)
            }
            None => Err(Error::ConnectionClosed),
        }
    }
}
