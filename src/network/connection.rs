use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;
use tracing::debug;

use crate::core::{ClientConfig, Error, Result};

/// Opens a TCP connection to `host` on the configured port
pub(crate) async fn open(host: &str, config: &ClientConfig) -> Result<TcpStream> {
    let stream = TcpStream::connect((host, config.port)).await.map_err(|e| {
        Error::network(format!("Failed to connect to {}:{}: {}", host, config.port, e))
    })?;

    configure(&stream, config)?;
    debug!(host, port = config.port, "connected");
    Ok(stream)
}

/// Applies socket options from the configuration
fn configure(stream: &TcpStream, config: &ClientConfig) -> Result<()> {
    stream
        .set_nodelay(config.nodelay)
        .map_err(|e| Error::network(format!("Failed to set TCP_NODELAY: {}", e)))?;

    if let Some(idle) = config.keepalive {
        let keepalive = TcpKeepalive::new().with_time(idle);
        SockRef::from(stream)
            .set_tcp_keepalive(&keepalive)
            .map_err(|e| Error::network(format!("Failed to enable keepalive: {}", e)))?;
    }
    Ok(())
}
