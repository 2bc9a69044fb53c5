// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use actor::{init, INIT_ACTOR_ADDR};
use address::{Address, Protocol};
use cid::{Cid, Code::Blake2b256};
use ipld_blockstore::BlockStore;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::error::Error as StdError;
use vm::ActorState;

/// State tree implementation: a persistent map of ID-addresses to actor
/// records, fronted by a stack of snapshot layers. The bottom of the
/// stack is flushed to the block store as a single sorted-map block.
pub struct StateTree<'db, S> {
    store: &'db S,
    /// Records as of the last load or flush.
    base: HashMap<Address, ActorState>,
    /// Uncommitted writes, one layer per open snapshot.
    snaps: StateSnapshots,
}

/// Collection of state snapshots
struct StateSnapshots {
    layers: Vec<StateSnapLayer>,
}

/// State snap shot layer. An entry of `None` marks a deleted actor.
struct StateSnapLayer {
    actors: RwLock<HashMap<Address, Option<ActorState>>>,
    resolve_cache: RwLock<HashMap<Address, Address>>,
}

impl StateSnapLayer {
    fn new() -> Self {
        Self {
            actors: RwLock::new(HashMap::default()),
            resolve_cache: RwLock::new(HashMap::default()),
        }
    }
}

impl StateSnapshots {
    /// State snapshot constructor
    fn new() -> Self {
        Self {
            layers: vec![StateSnapLayer::new()],
        }
    }

    fn add_layer(&mut self) {
        self.layers.push(StateSnapLayer::new())
    }

    fn drop_layer(&mut self) -> Result<(), String> {
        self.layers.pop().ok_or_else(|| {
            "drop layer failed, no snapshot layers on the stack".to_string()
        })?;

        Ok(())
    }

    fn merge_last_layer(&mut self) -> Result<(), String> {
        if self.layers.len() < 2 {
            return Err(format!(
                "merging layers failed, layer count is {}",
                self.layers.len()
            ));
        }

        let top = self.layers.pop().expect("layer count checked above");
        let into = self.layers.last().expect("layer count checked above");
        into.actors.write().extend(top.actors.into_inner());
        into.resolve_cache
            .write()
            .extend(top.resolve_cache.into_inner());

        Ok(())
    }

    fn resolve_address(&self, addr: &Address) -> Option<Address> {
        for layer in self.layers.iter().rev() {
            if let Some(res_addr) = layer.resolve_cache.read().get(addr).cloned() {
                return Some(res_addr);
            }
        }

        None
    }

    fn cache_resolve_address(&self, addr: Address, resolve_addr: Address) {
        self.layers
            .last()
            .expect("snapshot stack is never empty")
            .resolve_cache
            .write()
            .insert(addr, resolve_addr);
    }

    /// Outer `None` means the address is untouched in every layer; inner
    /// `None` means the actor was deleted in a layer.
    fn get_actor(&self, addr: &Address) -> Option<Option<ActorState>> {
        for layer in self.layers.iter().rev() {
            if let Some(state) = layer.actors.read().get(addr) {
                return Some(state.clone());
            }
        }

        None
    }

    fn set_actor(&self, addr: Address, actor: ActorState) {
        self.layers
            .last()
            .expect("snapshot stack is never empty")
            .actors
            .write()
            .insert(addr, Some(actor));
    }

    fn delete_actor(&self, addr: Address) {
        self.layers
            .last()
            .expect("snapshot stack is never empty")
            .actors
            .write()
            .insert(addr, None);
    }
}

/// Byte-keyed sorted form the tree is persisted in.
type StateRoot = BTreeMap<Vec<u8>, ActorState>;

impl<'db, S> StateTree<'db, S>
where
    S: BlockStore,
{
    pub fn new(store: &'db S) -> Self {
        Self {
            store,
            base: HashMap::default(),
            snaps: StateSnapshots::new(),
        }
    }

    /// Constructor for a state tree given an IPLD store and a root to load.
    pub fn new_from_root(store: &'db S, root: &Cid) -> Result<Self, Box<dyn StdError>> {
        let map: StateRoot = store
            .get(root)?
            .ok_or_else(|| format!("failed to load state root {}", root))?;

        let mut base = HashMap::with_capacity(map.len());
        for (k, actor) in map {
            base.insert(Address::from_bytes(&k)?, actor);
        }

        Ok(Self {
            store,
            base,
            snaps: StateSnapshots::new(),
        })
    }

    /// Retrieve store reference to modify db.
    pub fn store(&self) -> &'db S {
        self.store
    }

    /// Get actor state from an address. Will be resolved to ID address.
    pub fn get_actor(&self, addr: &Address) -> Result<Option<ActorState>, Box<dyn StdError>> {
        let addr = match self.lookup_id(addr)? {
            Some(addr) => addr,
            None => return Ok(None),
        };

        // Check snapshot layers for the actor state, which also records
        // deletions that have not been flushed yet.
        if let Some(actor_state) = self.snaps.get_actor(&addr) {
            return Ok(actor_state);
        }

        Ok(self.base.get(&addr).cloned())
    }

    /// Set actor state for an address. Will set state at ID address.
    pub fn set_actor(
        &mut self,
        addr: &Address,
        actor: ActorState,
    ) -> Result<(), Box<dyn StdError>> {
        let addr = self
            .lookup_id(addr)?
            .ok_or_else(|| format!("Resolution lookup failed for {}", addr))?;

        self.snaps.set_actor(addr, actor);
        Ok(())
    }

    /// Get an ID address from any Address
    pub fn lookup_id(&self, addr: &Address) -> Result<Option<Address>, Box<dyn StdError>> {
        if addr.protocol() == Protocol::ID {
            return Ok(Some(*addr));
        }

        if let Some(res_address) = self.snaps.resolve_address(addr) {
            return Ok(Some(res_address));
        }

        let init_act = self
            .get_actor(&INIT_ACTOR_ADDR)?
            .ok_or("Init actor address could not be resolved")?;

        let state: init::State = self
            .store
            .get(&init_act.state)?
            .ok_or("Could not resolve init actor state")?;

        let a = match state.resolve_address(self.store(), addr)? {
            Some(a) => a,
            None => return Ok(None),
        };

        self.snaps.cache_resolve_address(*addr, a);

        Ok(Some(a))
    }

    /// Delete actor for an address. Will resolve to ID address to delete.
    pub fn delete_actor(&mut self, addr: &Address) -> Result<(), Box<dyn StdError>> {
        let addr = self
            .lookup_id(addr)?
            .ok_or_else(|| format!("Resolution lookup failed for {}", addr))?;

        self.snaps.delete_actor(addr);

        Ok(())
    }

    /// Mutate and set actor state for an Address.
    pub fn mutate_actor<F>(&mut self, addr: &Address, mutate: F) -> Result<(), Box<dyn StdError>>
    where
        F: FnOnce(&mut ActorState) -> Result<(), String>,
    {
        // Retrieve actor state from address
        let mut act: ActorState = self
            .get_actor(addr)?
            .ok_or(format!("Actor for address: {} does not exist", addr))?;

        // Apply function of actor state
        mutate(&mut act)?;
        // Set the actor
        self.set_actor(addr, act)
    }

    /// Register a new address through the init actor.
    pub fn register_new_address(&mut self, addr: &Address) -> Result<Address, Box<dyn StdError>> {
        let mut init_act: ActorState = self
            .get_actor(&INIT_ACTOR_ADDR)?
            .ok_or("Could not retrieve init actor")?;

        // Get init actor state from store
        let mut ias: init::State = self
            .store
            .get(&init_act.state)?
            .ok_or("Failed to retrieve init actor state")?;

        // Create new address with init actor state
        let new_addr = ias.map_address_to_new_id(self.store(), addr)?;

        // Set state for init actor in store and update root Cid
        init_act.state = self.store().put(&ias, Blake2b256)?;

        self.set_actor(&INIT_ACTOR_ADDR, init_act)?;

        self.snaps.cache_resolve_address(*addr, new_addr);

        Ok(new_addr)
    }

    /// Add snapshot layer to stack.
    pub fn snapshot(&mut self) -> Result<(), String> {
        self.snaps.add_layer();
        Ok(())
    }

    /// Merges last two snapshot layers, absorbing the changes made since
    /// the snapshot was taken.
    pub fn clear_snapshot(&mut self) -> Result<(), String> {
        self.snaps.merge_last_layer()
    }

    /// Revert state cache by removing the last snapshot layer.
    pub fn revert_to_snapshot(&mut self) -> Result<(), String> {
        self.snaps.drop_layer()?;
        self.snaps.add_layer();
        Ok(())
    }

    /// Flush state tree and return Cid root.
    pub fn flush(&mut self) -> Result<Cid, Box<dyn StdError>> {
        if self.snaps.layers.len() != 1 {
            return Err(format!(
                "tried to flush state tree with snapshots on the stack: {:?}",
                self.snaps.layers.len()
            )
            .into());
        }

        for (addr, sto) in self.snaps.layers[0].actors.write().drain() {
            match sto {
                None => {
                    self.base.remove(&addr);
                }
                Some(state) => {
                    self.base.insert(addr, state);
                }
            }
        }

        let mut map = StateRoot::new();
        for (addr, state) in self.base.iter() {
            map.insert(addr.to_bytes(), state.clone());
        }

        Ok(self.store.put(&map, Blake2b256)?)
    }
}
