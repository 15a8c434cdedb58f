use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::requests::RequestHandle;
use crate::core::{Error, Id, Key, Result};
use crate::protocol::wire::check_string;
use crate::protocol::Frame;
use crate::table::Table;

/// Registry shared between the client, the reader and the coordinator
pub(crate) type SharedRegistry = Arc<Mutex<Registry>>;

/// Queue of frames for the writer task
#[derive(Debug, Clone)]
pub(crate) struct Outbound {
    tx: mpsc::UnboundedSender<Frame>,
}

impl Outbound {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Outbound { tx }, rx)
    }

    /// Enqueues a frame; never waits
    pub(crate) fn send(&self, frame: Frame) -> Result<()> {
        self.tx.send(frame).map_err(|_| Error::ConnectionClosed)
    }
}

/// Local ID allocation and remote-to-local ID translation for one connection.
///
/// Remote mappings are only ever added; the protocol has no way to retract
/// them.
#[derive(Debug)]
pub(crate) struct Registry {
    next_table_id: Id,
    next_key_id: Id,
    /// Local key ID to key
    keys: HashMap<Id, Key>,
    /// (local table ID, name) to local key ID
    key_ids: HashMap<(Id, String), Id>,
    /// Local table ID to table
    tables: HashMap<Id, Arc<Table>>,
    /// Name to local table ID
    table_names: HashMap<String, Id>,
    /// Remote table ID to local table ID
    remote_tables: HashMap<Id, Id>,
    /// Remote key ID to local key ID
    remote_keys: HashMap<Id, Id>,
    outbound: Outbound,
}

impl Registry {
    pub(crate) fn new(outbound: Outbound) -> Self {
        Registry {
            next_table_id: 0,
            next_key_id: 0,
            keys: HashMap::new(),
            key_ids: HashMap::new(),
            tables: HashMap::new(),
            table_names: HashMap::new(),
            remote_tables: HashMap::new(),
            remote_keys: HashMap::new(),
            outbound,
        }
    }

    pub(crate) fn shared(outbound: Outbound) -> SharedRegistry {
        Arc::new(Mutex::new(Registry::new(outbound)))
    }

    /// Returns the table called `name`, requesting it from the peer on first use
    pub(crate) fn table(&mut self, name: &str, requests: &RequestHandle) -> Result<Arc<Table>> {
        if let Some(id) = self.table_names.get(name) {
            if let Some(table) = self.tables.get(id) {
                return Ok(Arc::clone(table));
            }
        }
        check_string(name)?;

        let id = self.next_table_id;
        self.next_table_id = id
            .checked_add(1)
            .ok_or_else(|| Error::protocol("table IDs exhausted"))?;

        let table = Arc::new(Table::new(name.to_string(), id, requests.clone()));
        self.table_names.insert(name.to_string(), id);
        self.tables.insert(id, Arc::clone(&table));
        debug!(name, id, "requesting table");

        self.outbound.send(Frame::TableRequest {
            name: name.to_string(),
            table: id,
        })?;
        Ok(table)
    }

    pub(crate) fn table_by_id(&self, id: Id) -> Option<Arc<Table>> {
        self.tables.get(&id).cloned()
    }

    /// Returns the local key ID for `name` in `table_id`, minting and
    /// advertising a new one if the key is not yet known.
    ///
    /// The assignment frame is queued while the registry is still locked, so
    /// it always reaches the wire before any data frame using the new ID.
    pub(crate) fn get_or_create_key_id(&mut self, table_id: Id, name: &str) -> Result<Id> {
        if let Some(&id) = self.key_ids.get(&(table_id, name.to_string())) {
            return Ok(id);
        }

        let key = Key {
            table_id,
            name: name.to_string(),
            id: self.next_key_id,
        };
        self.next_key_id = key
            .id
            .checked_add(1)
            .ok_or_else(|| Error::protocol("key IDs exhausted"))?;
        trace!(table_id, name, id = key.id, "minted key");

        self.key_ids.insert((table_id, key.name.clone()), key.id);
        self.keys.insert(key.id, key.clone());

        self.outbound.send(Frame::KeyAssignment {
            table: key.table_id,
            name: key.name,
            key: key.id,
        })?;
        Ok(key.id)
    }

    /// Records the peer's ID for one of our tables. Returns false if `local`
    /// names no table we know.
    pub(crate) fn bind_remote_table(&mut self, local: Id, remote: Id) -> bool {
        if !self.tables.contains_key(&local) {
            return false;
        }
        self.remote_tables.insert(remote, local);
        true
    }

    /// Records the peer's ID for a key, creating the key locally if needed.
    /// Returns `Ok(false)` if the peer's table ID is unknown.
    pub(crate) fn bind_remote_key(
        &mut self,
        remote_table: Id,
        name: &str,
        remote_key: Id,
    ) -> Result<bool> {
        let Some(&table_id) = self.remote_tables.get(&remote_table) else {
            return Ok(false);
        };

        let local = self.get_or_create_key_id(table_id, name)?;
        self.remote_keys.insert(remote_key, local);
        Ok(true)
    }

    /// Finds the table and key name the peer means by `remote_key`
    pub(crate) fn resolve_remote_key(&self, remote_key: Id) -> Option<(Arc<Table>, String)> {
        let local = self.remote_keys.get(&remote_key)?;
        let key = self.keys.get(local)?;
        let table = self.tables.get(&key.table_id)?;
        Some((Arc::clone(table), key.name.clone()))
    }
}
