//! nettable: a client for the NetworkTables key-value synchronization protocol
//!
//! Peers share named tables of boolean, integer and floating-point entries over
//! a single TCP stream. Each side names tables and keys with its own compact
//! IDs and learns the other side's IDs through assignment frames. Reads are
//! served from a local cache; writes are proposed to the server and only take
//! effect locally once the server confirms them.
//!
//! ```no_run
//! # async fn demo() -> nettable::Result<()> {
//! let client = nettable::Client::connect("10.0.0.2").await?;
//! let table = client.table("SmartDashboard")?;
//! table.put("speed", 0.5).await?;
//! println!("{:?}", table.get("speed"));
//! client.close().await
//! # }
//! ```
pub mod core;
mod network;
pub mod protocol;
mod table;

// Re-export commonly used items
pub use crate::core::{ClientConfig, Entry, Error, Id, Result, DEFAULT_PORT};
pub use crate::network::Client;
pub use crate::table::Table;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
