//! Core types for the NetworkTables client
//!
//! This module contains the fundamental building blocks used throughout the library.

pub mod error;
pub mod serde;
pub mod types;

pub use self::error::{CodecError, Error, Result};
pub use self::types::{ClientConfig, Entry, Id, Key};

/// Default port for the NetworkTables protocol
pub const DEFAULT_PORT: u16 = 1735;
