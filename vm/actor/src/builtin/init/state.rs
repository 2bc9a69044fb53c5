// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::FIRST_NON_SINGLETON_ADDR;
use address::{Address, Protocol};
use cid::{Cid, Code::Blake2b256};
use encoding::tuple::*;
use ipld_blockstore::BlockStore;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use vm::ActorID;

/// Table from address byte form to the assigned actor ID, kept as its
/// own block so the init state stays small.
type AddressMap = BTreeMap<Vec<u8>, ActorID>;

/// State of the init actor: the address resolution table and the ID
/// allocation counter.
#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug)]
pub struct State {
    pub address_map: Cid,
    pub next_id: ActorID,
    pub network_name: String,
}

impl State {
    pub fn new<BS: BlockStore>(store: &BS, network_name: String) -> Result<Self, Box<dyn StdError>> {
        let address_map = store.put(&AddressMap::default(), Blake2b256)?;
        Ok(Self {
            address_map,
            next_id: FIRST_NON_SINGLETON_ADDR,
            network_name,
        })
    }

    /// Assigns next available ID and increments the next_id value from state.
    pub fn map_address_to_new_id<BS: BlockStore>(
        &mut self,
        store: &BS,
        addr: &Address,
    ) -> Result<Address, Box<dyn StdError>> {
        let id = self.next_id;
        self.next_id += 1;

        let mut map: AddressMap = store
            .get(&self.address_map)?
            .ok_or("failed to load init actor address map")?;
        map.insert(addr.to_bytes(), id);
        self.address_map = store.put(&map, Blake2b256)?;

        Ok(Address::new_id(id))
    }

    /// Resolves an address to an ID-address, if possible.
    ///
    /// Returns `None` if the address was not found in the mapping.
    /// ID-addresses are returned directly.
    pub fn resolve_address<BS: BlockStore>(
        &self,
        store: &BS,
        addr: &Address,
    ) -> Result<Option<Address>, Box<dyn StdError>> {
        if addr.protocol() == Protocol::ID {
            return Ok(Some(*addr));
        }

        let map: AddressMap = store
            .get(&self.address_map)?
            .ok_or("failed to load init actor address map")?;

        Ok(map.get(&addr.to_bytes()).map(|id| Address::new_id(*id)))
    }
}

impl encoding::Cbor for State {}

#[cfg(test)]
mod tests {
    use super::*;
    use db::MemoryDB;

    #[test]
    fn assign_and_resolve() {
        let store = MemoryDB::default();
        let mut state = State::new(&store, "test".to_owned()).unwrap();

        let addr = Address::new_actor(b"assign test");
        let id = state.map_address_to_new_id(&store, &addr).unwrap();
        assert_eq!(id, Address::new_id(FIRST_NON_SINGLETON_ADDR));

        let resolved = state.resolve_address(&store, &addr).unwrap();
        assert_eq!(resolved, Some(id));

        // IDs increase monotonically.
        let other = Address::new_actor(b"assign test 2");
        let id2 = state.map_address_to_new_id(&store, &other).unwrap();
        assert_eq!(id2, Address::new_id(FIRST_NON_SINGLETON_ADDR + 1));

        // Unknown addresses resolve to None.
        let unknown = Address::new_actor(b"unknown");
        assert_eq!(state.resolve_address(&store, &unknown).unwrap(), None);
    }
}
