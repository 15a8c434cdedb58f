use bytes::{Buf, BufMut};

use super::wire::{get_entry, get_id, get_string, put_entry, put_id, put_string};
use super::{
    CODE_ASSIGNMENT, CODE_CONFIRMATION, CODE_DENIAL, CODE_ID, CODE_TABLE_ASSIGNMENT,
    CODE_TABLE_ID, CODE_TABLE_REQUEST, MAX_CONFIRMATIONS, MAX_DENIALS,
};
use crate::core::{CodecError, Entry, Id};

/// Protocol frames exchanged between peers
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Binds a key name in a table to the sender's key ID
    KeyAssignment {
        /// Sender's table ID
        table: Id,
        /// Key name
        name: String,
        /// Sender's key ID
        key: Id,
    },

    /// Server reply to a table request
    TableAssignment {
        /// The requester's table ID, echoed back
        local: Id,
        /// The server's ID for the same table
        remote: Id,
    },

    /// Asks the server for a table by name
    TableRequest {
        /// Table name
        name: String,
        /// Requester's table ID
        table: Id,
    },

    /// New value for a key, identified by the sender's key ID
    EntryData {
        /// Sender's key ID
        key: Id,
        /// The value
        value: Entry,
    },

    /// Accepts the given number of pending data frames
    Confirmation(u8),

    /// Rejects the given number of pending data frames
    Denial(u8),
}

impl Frame {
    /// Writes the frame to `dst`.
    ///
    /// On error some bytes may already have been written; callers that need
    /// all-or-nothing output truncate `dst` themselves.
    pub fn encode<B: BufMut>(&self, dst: &mut B) -> Result<(), CodecError> {
        match self {
            Frame::KeyAssignment { table, name, key } => {
                dst.put_u8(CODE_ASSIGNMENT);
                put_id(dst, CODE_TABLE_ID, *table);
                put_string(dst, name)?;
                put_id(dst, CODE_ID, *key);
            }
            Frame::TableAssignment { local, remote } => {
                dst.put_u8(CODE_TABLE_ASSIGNMENT);
                put_id(dst, CODE_TABLE_ID, *local);
                put_id(dst, CODE_TABLE_ID, *remote);
            }
            Frame::TableRequest { name, table } => {
                dst.put_u8(CODE_TABLE_REQUEST);
                put_string(dst, name)?;
                put_id(dst, CODE_TABLE_ID, *table);
            }
            Frame::EntryData { key, value } => {
                put_id(dst, CODE_ID, *key);
                put_entry(dst, value);
            }
            Frame::Confirmation(count) => {
                if *count > MAX_CONFIRMATIONS {
                    return Err(CodecError::CountOutOfRange(*count));
                }
                dst.put_u8(CODE_CONFIRMATION | count);
            }
            Frame::Denial(count) => {
                if *count > MAX_DENIALS {
                    return Err(CodecError::CountOutOfRange(*count));
                }
                dst.put_u8(CODE_DENIAL | count);
            }
        }
        Ok(())
    }

    /// Reads one inbound frame, dispatching on its leading byte.
    ///
    /// Table requests are never sent to a client, so their code is treated
    /// like any other unrecognized byte.
    pub fn decode<B: Buf>(src: &mut B) -> Result<Frame, CodecError> {
        if !src.has_remaining() {
            return Err(CodecError::Incomplete);
        }
        let code = src.chunk()[0];

        if code & CODE_ID != 0 {
            let key = get_id(src, CODE_ID)?;
            let value = get_entry(src)?;
            return Ok(Frame::EntryData { key, value });
        }

        src.advance(1);
        match code {
            CODE_TABLE_ASSIGNMENT => {
                let local = get_id(src, CODE_TABLE_ID)?;
                let remote = get_id(src, CODE_TABLE_ID)?;
                Ok(Frame::TableAssignment { local, remote })
            }
            CODE_ASSIGNMENT => {
                let table = get_id(src, CODE_TABLE_ID)?;
                let name = get_string(src)?;
                let key = get_id(src, CODE_ID)?;
                Ok(Frame::KeyAssignment { table, name, key })
            }
            c if c >= CODE_CONFIRMATION => {
                if c >= CODE_CONFIRMATION << 1 {
                    return Err(CodecError::BadConfirmation(c));
                }
                Ok(Frame::Confirmation(c & !CODE_CONFIRMATION))
            }
            c if c >= CODE_DENIAL => Ok(Frame::Denial(c & !CODE_DENIAL)),
            c => Err(CodecError::UnrecognizedCode(c)),
        }
    }
}
