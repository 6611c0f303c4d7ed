//! In-memory table of connected devices and their transport handles.
//!
//! The registry is pure bookkeeping: no I/O, no locking of its own. Records
//! live in insertion order in a vector with an address-to-index map beside it;
//! removal compacts the vector and refreshes the map. Concurrent callers wrap
//! the registry in the [`SharedRegistry`] alias (single writer, multiple
//! readers) and each transport in a [`SharedHandle`] so that traffic on one
//! socket is serialized.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::core::address::BtAddress;
use crate::core::error::RegistryError;

/// A device transport under a per-handle lock.
pub type SharedHandle<T> = Arc<Mutex<T>>;

/// The registry under a single-writer/multiple-reader lock, holding shared
/// handles.
pub type SharedRegistry<T> = Arc<RwLock<DeviceRegistry<SharedHandle<T>>>>;

/// Create an empty [`SharedRegistry`].
pub fn shared<T>() -> SharedRegistry<T> {
    Arc::new(RwLock::new(DeviceRegistry::new()))
}

/// Opaque identifier assigned to a record on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(u64);

impl RecordId {
    /// The raw identifier value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Connection state of a record.
///
/// A record present in the registry is always `Connected`: disconnection
/// removes the record rather than retaining it offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// The device has an open transport.
    Connected,
    /// The device has no open transport.
    Disconnected,
}

/// One known device: its address, state, and transport handle.
#[derive(Debug)]
pub struct DeviceRecord<H> {
    id: RecordId,
    address: BtAddress,
    state: LinkState,
    handle: H,
}

impl<H> DeviceRecord<H> {
    /// The identifier assigned at registration.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// The device's hardware address.
    pub fn address(&self) -> BtAddress {
        self.address
    }

    /// The record's connection state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Borrow the transport handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

/// Insertion-ordered collection of device records, keyed by address.
#[derive(Debug)]
pub struct DeviceRegistry<H> {
    records: Vec<DeviceRecord<H>>,
    index: HashMap<BtAddress, usize>,
    connected: usize,
    next_id: u64,
}

impl<H> Default for DeviceRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> DeviceRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            connected: 0,
            next_id: 0,
        }
    }

    /// Add a connected device.
    ///
    /// Fails with [`RegistryError::DuplicateAddress`] if the address is already
    /// present; the registry is unchanged in that case.
    pub fn register(&mut self, address: BtAddress, handle: H) -> Result<RecordId, RegistryError> {
        if self.index.contains_key(&address) {
            return Err(RegistryError::DuplicateAddress(address));
        }
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.index.insert(address, self.records.len());
        self.records.push(DeviceRecord {
            id,
            address,
            state: LinkState::Connected,
            handle,
        });
        self.connected += 1;
        Ok(id)
    }

    /// Remove a device.
    ///
    /// Fails with [`RegistryError::NotFound`] if the address is absent, without
    /// touching the collection or the connected counter. Safe to call twice:
    /// the second call is the `NotFound` case.
    pub fn unregister(&mut self, address: BtAddress) -> Result<(), RegistryError> {
        let idx = self
            .index
            .remove(&address)
            .ok_or(RegistryError::NotFound(address))?;
        let record = self.records.remove(idx);
        // Compacting shifted every record after idx down by one.
        for i in idx..self.records.len() {
            let addr = self.records[i].address;
            self.index.insert(addr, i);
        }
        if record.state == LinkState::Connected {
            self.connected -= 1;
        }
        Ok(())
    }

    /// Whether the address is registered.
    pub fn contains(&self, address: BtAddress) -> bool {
        self.index.contains_key(&address)
    }

    /// Number of connected devices.
    pub fn connected_count(&self) -> usize {
        self.connected
    }

    /// Whether any device is connected.
    pub fn is_any_connected(&self) -> bool {
        self.connected > 0
    }

    /// Number of records present.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot of registered addresses, in insertion order.
    pub fn addresses(&self) -> Vec<BtAddress> {
        self.records.iter().map(|r| r.address).collect()
    }
}

impl<H: Clone> DeviceRegistry<H> {
    /// The transport handle registered for an address, if any.
    pub fn handle_of(&self, address: BtAddress) -> Option<H> {
        self.index
            .get(&address)
            .map(|&idx| self.records[idx].handle.clone())
    }

    /// Snapshot of the handles of all connected devices, in insertion order.
    pub fn connected_handles(&self) -> Vec<H> {
        self.records
            .iter()
            .filter(|r| r.state == LinkState::Connected)
            .map(|r| r.handle.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> BtAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = DeviceRegistry::new();
        let a = addr("00:16:53:00:00:01");
        let id = registry.register(a, 7u32).unwrap();

        assert!(registry.contains(a));
        assert_eq!(registry.handle_of(a), Some(7));
        assert_eq!(registry.connected_count(), 1);
        assert!(registry.is_any_connected());
        assert_ne!(id, registry.register(addr("00:16:53:00:00:02"), 8).unwrap());
    }

    #[test]
    fn test_duplicate_register_leaves_registry_unchanged() {
        let mut registry = DeviceRegistry::new();
        let a = addr("00:16:53:00:00:01");
        registry.register(a, 1u32).unwrap();

        assert_eq!(
            registry.register(a, 2),
            Err(RegistryError::DuplicateAddress(a))
        );
        assert_eq!(registry.connected_count(), 1);
        assert_eq!(registry.handle_of(a), Some(1));
    }

    #[test]
    fn test_duplicate_detection_is_case_insensitive() {
        let mut registry = DeviceRegistry::new();
        registry.register(addr("aa:bb:cc:11:22:33"), 1u32).unwrap();
        assert!(matches!(
            registry.register(addr("AA:BB:CC:11:22:33"), 2),
            Err(RegistryError::DuplicateAddress(_))
        ));
    }

    #[test]
    fn test_unregister_absent_is_not_found() {
        let mut registry = DeviceRegistry::<u32>::new();
        let a = addr("00:16:53:00:00:01");
        assert_eq!(registry.unregister(a), Err(RegistryError::NotFound(a)));
        assert_eq!(registry.connected_count(), 0);
    }

    #[test]
    fn test_unregister_twice_second_is_not_found() {
        let mut registry = DeviceRegistry::new();
        let a = addr("00:16:53:00:00:01");
        registry.register(a, 1u32).unwrap();

        registry.unregister(a).unwrap();
        assert_eq!(registry.unregister(a), Err(RegistryError::NotFound(a)));
        assert_eq!(registry.connected_count(), 0);
    }

    #[test]
    fn test_removal_compacts_and_preserves_order() {
        let mut registry = DeviceRegistry::new();
        let a = addr("00:16:53:00:00:01");
        let b = addr("00:16:53:00:00:02");
        let c = addr("00:16:53:00:00:03");
        registry.register(a, 1u32).unwrap();
        registry.register(b, 2).unwrap();
        registry.register(c, 3).unwrap();

        registry.unregister(b).unwrap();

        assert_eq!(registry.addresses(), vec![a, c]);
        assert_eq!(registry.connected_handles(), vec![1, 3]);
        // Lookups still hit after the compaction shifted indices.
        assert_eq!(registry.handle_of(c), Some(3));
        assert_eq!(registry.handle_of(b), None);
    }

    #[test]
    fn test_connected_count_tracks_record_count() {
        let mut registry = DeviceRegistry::new();
        let addrs: Vec<BtAddress> = (1..=5)
            .map(|i| addr(&format!("00:16:53:00:00:{i:02X}")))
            .collect();

        for (i, &a) in addrs.iter().enumerate() {
            registry.register(a, i as u32).unwrap();
            assert_eq!(registry.connected_count(), registry.len());
        }
        for &a in &addrs {
            registry.unregister(a).unwrap();
            assert_eq!(registry.connected_count(), registry.len());
        }
        assert!(registry.is_empty());
        assert!(!registry.is_any_connected());
    }
}
