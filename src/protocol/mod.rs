//! Protocol implementation module
//!
//! This module defines the NetworkTables wire primitives, the frames built from
//! them, and the stream codec used by the connection tasks.

pub mod codec;
pub mod message;
pub mod wire;

pub use self::codec::FrameCodec;
pub use self::message::Frame;

// Leading byte codes. 0-12 are control codes; the remaining ranges are
// distinguished by their high bits.
/// Entry tag for 32-bit integers
pub const CODE_INT: u8 = 0x01;
/// Entry tag for doubles
pub const CODE_DOUBLE: u8 = 0x02;
/// Table assignment frame
pub const CODE_TABLE_ASSIGNMENT: u8 = 0x03;
/// Entry tag for `false`
pub const CODE_BOOL_FALSE: u8 = 0x04;
/// Entry tag for `true`
pub const CODE_BOOL_TRUE: u8 = 0x05;
/// Key assignment frame
pub const CODE_ASSIGNMENT: u8 = 0x06;
/// Table request frame
pub const CODE_TABLE_REQUEST: u8 = 0x0c;
/// Key ID namespace mask; also marks entry data frames
pub const CODE_ID: u8 = 0x80;
/// Table ID namespace mask
pub const CODE_TABLE_ID: u8 = 0x40;
/// Confirmation frame base
pub const CODE_CONFIRMATION: u8 = 0x20;
/// Denial frame base
pub const CODE_DENIAL: u8 = 0x10;

/// Largest count a single confirmation byte can carry
pub const MAX_CONFIRMATIONS: u8 = CODE_CONFIRMATION - 1;
/// Largest count a single denial byte can carry
pub const MAX_DENIALS: u8 = CODE_DENIAL - 1;
