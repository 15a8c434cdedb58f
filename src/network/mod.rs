//! Connection management
//!
//! A [`Client`] owns one connection to a NetworkTables server. Three tasks
//! drive it for the connection's lifetime:
//!
//! - the reader decodes inbound frames and updates tables and the registry,
//! - the writer is the only task that writes to the transport,
//! - the request coordinator serves puts one at a time.
//!
//! They talk over unbounded channels; the registry and each table's cache are
//! guarded by separate locks that are never held across an `.await`.

mod connection;
pub(crate) mod reader;
pub(crate) mod registry;
pub(crate) mod requests;
pub(crate) mod writer;

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use self::reader::Reader;
use self::registry::{Outbound, Registry, SharedRegistry};
use self::requests::{Coordinator, RequestHandle};
use self::writer::Writer;
use crate::core::{ClientConfig, Error, Result};
use crate::table::Table;

/// A connection to a NetworkTables server
pub struct Client {
    registry: SharedRegistry,
    requests: RequestHandle,
    shutdown: oneshot::Sender<()>,
    reader: JoinHandle<()>,
    writer: JoinHandle<Result<()>>,
    coordinator: JoinHandle<()>,
}

impl Client {
    /// Starts a client on an established stream with the default configuration.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        Self::spawn(stream, &ClientConfig::default())
    }

    /// Starts a client on an established stream
    pub fn with_config<S>(stream: S, config: ClientConfig) -> Result<Self>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        config.validate()?;
        Ok(Self::spawn(stream, &config))
    }

    /// Connects to `host` on the default port
    pub async fn connect(host: &str) -> Result<Self> {
        Self::connect_with(host, ClientConfig::default()).await
    }

    /// Connects to `host` using the given configuration
    pub async fn connect_with(host: &str, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let stream = connection::open(host, &config).await?;
        Ok(Self::spawn(stream, &config))
    }

    fn spawn<S>(stream: S, config: &ClientConfig) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let (outbound, frames) = Outbound::channel();
        let (acks, ack_rx) = mpsc::unbounded_channel();
        let (requests, put_rx) = RequestHandle::new();
        let (shutdown, shutdown_rx) = oneshot::channel();
        let registry = Registry::shared(outbound.clone());

        let reader = Reader::new(read_half, registry.clone(), outbound.clone(), acks);
        let writer = Writer::new(write_half, frames, shutdown_rx);
        let coordinator = Coordinator::new(
            registry.clone(),
            outbound,
            put_rx,
            ack_rx,
            config.put_timeout,
        );

        Client {
            registry,
            requests,
            shutdown,
            reader: tokio::spawn(reader.run()),
            writer: tokio::spawn(writer.run()),
            coordinator: tokio::spawn(coordinator.run()),
        }
    }

    /// Returns the table called `name`.
    ///
    /// The first call for a name sends a table request to the server; later
    /// calls return the same table.
    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.registry.lock().table(name, &self.requests)
    }

    /// Shuts the connection down.
    ///
    /// Stops accepting puts, waits for queued puts and outbound frames to
    /// drain, closes the transport and stops the reader. A put still waiting
    /// on a silent peer without a timeout keeps this waiting as well.
    pub async fn close(self) -> Result<()> {
        self.requests.close();
        if let Err(e) = self.coordinator.await {
            warn!(error = %e, "request coordinator task failed");
        }

        // The writer drains whatever is queued once told to stop
        let _ = self.shutdown.send(());
        let written = match self.writer.await {
            Ok(result) => result,
            Err(e) => Err(Error::network(format!("Writer task failed: {}", e))),
        };

        self.reader.abort();
        debug!("connection closed");
        written
    }
}
