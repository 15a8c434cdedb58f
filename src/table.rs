//! Locally cached view of a network table

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::{Entry, Id, Result};
use crate::network::requests::RequestHandle;
use crate::protocol::wire::check_string;

/// A network-synchronized key-value collection.
///
/// Obtain one through [`Client::table`](crate::Client::table). Reads are served
/// from the local cache; writes go through the connection and only land in the
/// cache once the peer confirms them.
#[derive(Debug)]
pub struct Table {
    name: String,
    id: Id,
    values: RwLock<HashMap<String, Entry>>,
    requests: RequestHandle,
}

impl Table {
    pub(crate) fn new(name: String, id: Id, requests: RequestHandle) -> Self {
        Table {
            name,
            id,
            values: RwLock::new(HashMap::new()),
            requests,
        }
    }

    /// Returns the table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns this side's ID for the table
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the last known value for `key`
    pub fn get(&self, key: &str) -> Option<Entry> {
        self.values.read().get(key).copied()
    }

    /// Returns the names of all keys with a cached value
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Proposes a new value for `key` and waits for the peer's answer.
    ///
    /// Returns [`Error::Denied`](crate::Error::Denied) if the peer changed the
    /// value first; the cache then keeps its previous value. Without a
    /// configured put timeout this waits for as long as the peer stays silent.
    pub async fn put(&self, key: &str, value: impl Into<Entry>) -> Result<()> {
        check_string(key)?;
        self.requests.put(self.id, key.to_string(), value.into()).await
    }

    /// Replaces the cached value for `key`
    pub(crate) fn apply(&self, key: &str, value: Entry) {
        self.values.write().insert(key.to_string(), value);
    }
}
