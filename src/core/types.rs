use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// Identifier of a table or key within one peer's namespace
pub type Id = u32;

/// A value that can be stored in a table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Entry {
    /// Boolean entry
    Bool(bool),
    /// 32-bit signed integer entry
    Int(i32),
    /// Floating-point entry
    Double(f64),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Bool(b) => write!(f, "{}", b),
            Entry::Int(i) => write!(f, "{}", i),
            Entry::Double(n) => write!(f, "{}", n),
        }
    }
}

impl From<bool> for Entry {
    fn from(b: bool) -> Self {
        Entry::Bool(b)
    }
}

impl From<i32> for Entry {
    fn from(i: i32) -> Self {
        Entry::Int(i)
    }
}

impl From<f64> for Entry {
    fn from(n: f64) -> Self {
        Entry::Double(n)
    }
}

/// A key known to the local registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    /// Local ID of the owning table
    pub table_id: Id,
    /// Key name within the table
    pub name: String,
    /// Local key ID
    pub id: Id,
}

/// Configuration for a client connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server port used by `connect`
    pub port: u16,
    /// Disable Nagle's algorithm on TCP connections
    pub nodelay: bool,
    /// TCP keepalive idle time, or `None` to leave keepalive off
    #[serde(serialize_with = "super::serde::serialize_opt_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_opt_duration")]
    pub keepalive: Option<Duration>,
    /// Give up waiting for a confirmation after this long. `None` waits forever.
    #[serde(serialize_with = "super::serde::serialize_opt_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_opt_duration")]
    pub put_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            port: super::DEFAULT_PORT,
            nodelay: true,
            keepalive: Some(Duration::from_secs(60)),
            put_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Checks the configuration for values the client cannot use
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::config("port must be non-zero"));
        }
        if self.keepalive == Some(Duration::ZERO) {
            return Err(Error::config("keepalive must be non-zero when set"));
        }
        if self.put_timeout == Some(Duration::ZERO) {
            return Err(Error::config("put_timeout must be non-zero when set"));
        }
        Ok(())
    }
}
