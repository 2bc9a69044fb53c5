// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::gas_block_store::GasBlockStore;
use super::gas_tracker::{GasCharge, GasTracker, PriceList};
use super::vm::{resolve_to_key_addr, transfer};
use super::Rand;
use actor::{
    account, account_actor_code_id, actors_version_for_network, is_principal, INIT_ACTOR_ADDR,
    SYSTEM_ACTOR_ADDR,
};
use address::{Address, Protocol};
use byteorder::{BigEndian, WriteBytesExt};
use cid::{Cid, Code::Blake2b256};
use encoding::{to_vec, Cbor};
use ipld_blockstore::BlockStore;
use message::{Message, UnsignedMessage};
use num_traits::Zero;
use runtime::{MessageInfo, Runtime};
use state_tree::StateTree;
use std::cell::RefCell;
use std::rc::Rc;
use vm::{
    actor_error, ActorError, ActorState, ChainEpoch, DomainSeparationTag, MethodNum,
    NetworkVersion, Randomness, Serialized, TokenAmount, EMPTY_ARR_CID, METHOD_SEND,
};

/// Limit on the number of nested invocation frames a single message may
/// create, enforced from network version 6.
pub const MAX_CALL_DEPTH: u64 = 4096;

/// Bookkeeping for one top-level message, shared by every frame of its
/// invocation chain.
pub(crate) struct TopLevelContext {
    /// Stable (public key) address of the top-level message sender.
    pub originator_stable_address: Address,
    /// Call sequence number of the top-level message.
    pub originator_call_seq: u64,
    /// Count of calls to new_actor_address within this message.
    pub new_actor_address_count: u64,
}

/// The execution frame of a single message send: it resolves the target,
/// meters gas, transfers value, dispatches to the receiver's actor code
/// and guarantees atomic rollback on abort. Nested sends recurse with a
/// fresh frame sharing the same gas tank, state tree and top-level
/// context.
pub struct InvocationContext<'db, 'vm, 'r, DB, R> {
    state: &'vm mut StateTree<'db, DB>,
    store: GasBlockStore<'db, DB>,
    gas_tracker: Rc<RefCell<GasTracker>>,
    top_level: Rc<RefCell<TopLevelContext>>,
    /// The message being processed, with from/to normalized to ID form.
    msg: UnsignedMessage,
    /// The message as received, before address normalization.
    origin_msg: UnsignedMessage,
    network_version: NetworkVersion,
    epoch: ChainEpoch,
    price_list: PriceList,
    rand: &'r R,
    depth: u64,
    caller_validated: bool,
    allow_side_effects: bool,
}

impl<'db, 'vm, 'r, DB, R> InvocationContext<'db, 'vm, 'r, DB, R>
where
    DB: BlockStore,
    R: Rand,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        state: &'vm mut StateTree<'db, DB>,
        store: &'db DB,
        mut msg: UnsignedMessage,
        gas_tracker: Rc<RefCell<GasTracker>>,
        top_level: Rc<RefCell<TopLevelContext>>,
        network_version: NetworkVersion,
        epoch: ChainEpoch,
        price_list: PriceList,
        rand: &'r R,
        parent: Option<(u64, bool)>,
    ) -> Result<Self, ActorError> {
        if let Some((_, allow_side_effects)) = parent {
            if !allow_side_effects && network_version >= NetworkVersion::V7 {
                return Err(actor_error!(SysErrForbidden; "internal calls currently disabled"));
            }
        }
        let depth = match parent {
            Some((parent_depth, _)) => parent_depth + 1,
            None => 0,
        };
        if depth > MAX_CALL_DEPTH && network_version >= NetworkVersion::V6 {
            return Err(actor_error!(SysErrForbidden; "message execution exceeds call depth"));
        }

        let origin_msg = msg.clone();

        let from = state
            .lookup_id(msg.from())
            .map_err(|e| ActorError::new_fatal(e.to_string()))?
            .ok_or_else(
                || actor_error!(SysErrSenderInvalid; "resolve msg from address {} failed", msg.from()),
            )?;
        msg.from = from;

        if network_version > NetworkVersion::V3 {
            // May stay unresolved if the recipient doesn't exist yet.
            if let Some(to) = state
                .lookup_id(msg.to())
                .map_err(|e| ActorError::new_fatal(e.to_string()))?
            {
                msg.to = to;
            }
        }

        let gas_store = GasBlockStore {
            price_list,
            gas: Rc::clone(&gas_tracker),
            store,
        };

        Ok(Self {
            state,
            store: gas_store,
            gas_tracker,
            top_level,
            msg,
            origin_msg,
            network_version,
            epoch,
            price_list,
            rand,
            depth,
            caller_validated: false,
            allow_side_effects: true,
        })
    }

    /// Executes the message this frame was created for and converts every
    /// non-fatal failure into an exit-coded error after rolling back all
    /// state changes made by this frame and its children. Fatal errors
    /// propagate distinctly, they indicate storage corruption rather than
    /// message failure.
    pub fn invoke(&mut self) -> Result<Serialized, ActorError> {
        self.state
            .snapshot()
            .map_err(ActorError::new_fatal)?;

        let res = self.do_invoke();

        match res {
            Ok(ret) => {
                self.state
                    .clear_snapshot()
                    .map_err(ActorError::new_fatal)?;
                Ok(ret)
            }
            Err(e) => {
                self.state
                    .revert_to_snapshot()
                    .map_err(ActorError::new_fatal)?;
                self.state
                    .clear_snapshot()
                    .map_err(ActorError::new_fatal)?;
                if !e.is_fatal() {
                    log::warn!(
                        "Abort during actor execution. exit_code={} sender={} receiver={} method={} msg={}",
                        e.exit_code(),
                        self.origin_msg.from(),
                        self.origin_msg.to(),
                        self.origin_msg.method_num(),
                        e.msg()
                    );
                }
                Err(e)
            }
        }
    }

    fn do_invoke(&mut self) -> Result<Serialized, ActorError> {
        // The effective sender is normalized at construction; anything else
        // is a bug in the caller of the runtime.
        if self.msg.from().protocol() != Protocol::ID {
            return Err(actor_error!(fatal(
                "sender address MUST be an ID address at invocation time"
            )));
        }

        let (to_actor, to_id_addr) = self.resolve_target()?;
        if self.network_version > NetworkVersion::V3 {
            self.msg.to = to_id_addr;
        }

        self.charge_gas(
            self.price_list
                .on_method_invocation(self.origin_msg.value(), self.origin_msg.method_num()),
        )?;

        if !self.origin_msg.value().is_zero() {
            transfer(
                self.state,
                &self.msg.from,
                &to_id_addr,
                self.origin_msg.value(),
            )?;
        }

        // Method zero is a pure value transfer.
        if self.origin_msg.method_num() == METHOD_SEND {
            return Ok(Serialized::default());
        }

        let method = self.origin_msg.method_num();
        let params = self.origin_msg.params().clone();
        let ret = match actor::invoke_code(&to_actor.code, self, method, &params) {
            Some(ret) => ret?,
            None => {
                return Err(actor_error!(SysErrInvalidMethod;
                    "no code registered for actor at {}", to_id_addr));
            }
        };

        if !self.caller_validated {
            return Err(actor_error!(SysErrorIllegalActor;
                "Caller MUST be validated during method execution"));
        }

        Ok(ret)
    }

    /// Resolves the target address into an actor record and its ID form,
    /// implicitly creating an account actor when a public key address has
    /// not been seen before.
    fn resolve_target(&mut self) -> Result<(ActorState, Address), ActorError> {
        let target = *self.origin_msg.to();

        let init_actor = self
            .state
            .get_actor(&INIT_ACTOR_ADDR)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?
            .ok_or_else(|| actor_error!(SysErrSenderInvalid; "init actor not found"))?;
        if target == *INIT_ACTOR_ADDR {
            return Ok((init_actor, target));
        }

        let found = self
            .state
            .get_actor(&target)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?;

        if let Some(actor) = found {
            let id_addr = self
                .state
                .lookup_id(&target)
                .map_err(|e| ActorError::new_fatal(e.to_string()))?
                .ok_or_else(|| {
                    ActorError::new_fatal(format!(
                        "unreachable: actor is supposed to exist but it does not, addr: {}",
                        target
                    ))
                })?;
            return Ok((actor, id_addr));
        }

        // The target does not exist: implicitly create an account actor,
        // which is only allowed for public key addresses.
        self.charge_gas(self.price_list.on_create_actor())?;

        let target_id_addr = self
            .state
            .register_new_address(&target)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?;

        if target.protocol() != Protocol::Secp256k1 && target.protocol() != Protocol::BLS {
            return Err(actor_error!(SysErrInvalidReceiver;
                "cannot create account actor for address {} without an associated key", target));
        }

        let version = actors_version_for_network(self.network_version);
        let code = *account_actor_code_id(version);
        self.create_actor_record(code, target_id_addr)?;

        // Run the account constructor as a system-originated send carrying
        // the original key address by reference. A construction failure
        // propagates with the constructor's exit code.
        let constructor_msg = UnsignedMessage {
            version: 0,
            from: *SYSTEM_ACTOR_ADDR,
            to: target_id_addr,
            sequence: 0,
            value: TokenAmount::default(),
            gas_limit: self.gas_available(),
            gas_fee_cap: TokenAmount::default(),
            gas_premium: TokenAmount::default(),
            method_num: account::Method::Constructor as MethodNum,
            params: Serialized::serialize(&target)?,
        };
        let mut new_ctx = InvocationContext::new(
            self.state,
            self.store.store,
            constructor_msg,
            Rc::clone(&self.gas_tracker),
            Rc::clone(&self.top_level),
            self.network_version,
            self.epoch,
            self.price_list,
            self.rand,
            Some((self.depth, self.allow_side_effects)),
        )?;
        new_ctx.invoke()?;

        let target_actor = self
            .state
            .get_actor(&target)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?
            .ok_or_else(|| {
                ActorError::new_fatal(format!(
                    "failed to load newly created actor for {}",
                    target
                ))
            })?;

        Ok((target_actor, target_id_addr))
    }

    /// Installs a fresh actor record at the given address.
    fn create_actor_record(&mut self, code: Cid, addr: Address) -> Result<(), ActorError> {
        let mut actor = ActorState::new(code, *EMPTY_ARR_CID, TokenAmount::default(), 0);
        actor.delegated_address = Some(addr);
        self.state
            .set_actor(&addr, actor)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?;
        Ok(())
    }

    /// Adds to amount of gas used within the invocation chain.
    pub fn charge_gas(&self, charge: GasCharge) -> Result<(), ActorError> {
        self.gas_tracker.borrow_mut().charge_gas(charge)
    }

    /// Returns gas used by the whole message so far.
    pub fn gas_used(&self) -> i64 {
        self.gas_tracker.borrow().gas_used()
    }

    fn gas_available(&self) -> i64 {
        self.gas_tracker.borrow().gas_available()
    }

    fn abort_if_already_validated(&mut self) -> Result<(), ActorError> {
        if self.caller_validated {
            Err(actor_error!(SysErrorIllegalActor;
                    "Method must validate caller identity exactly once"))
        } else {
            self.caller_validated = true;
            Ok(())
        }
    }

    /// Loads the receiver's state object along with its current head. The
    /// actor record is re-read from the state tree every time because a
    /// nested call may have replaced the state through its own handle.
    fn state_load<C: Cbor>(&self) -> Result<(C, Cid), ActorError> {
        let actor = self.load_actor_state()?;
        if actor.state == *EMPTY_ARR_CID {
            return Err(actor_error!(SysErrorIllegalActor;
                "failed to load undefined state, must construct first"));
        }
        let obj: C = self
            .store
            .get(&actor.state)
            .map_err(|e| ActorError::downcast_fatal(e, "storage get in state load"))?
            .ok_or_else(|| {
                ActorError::new_fatal(format!(
                    "failed to load state for actor {}, CID {}",
                    self.origin_msg.to(),
                    actor.state
                ))
            })?;
        Ok((obj, actor.state))
    }

    fn load_actor_state(&self) -> Result<ActorState, ActorError> {
        self.state
            .get_actor(self.origin_msg.to())
            .map_err(|e| ActorError::new_fatal(e.to_string()))?
            .ok_or_else(|| {
                ActorError::new_fatal(format!(
                    "failed to find actor {} for state",
                    self.origin_msg.to()
                ))
            })
    }

    fn store_actor_state(&mut self, actor: ActorState) -> Result<(), ActorError> {
        self.state
            .set_actor(self.origin_msg.to(), actor)
            .map_err(|e| ActorError::new_fatal(e.to_string()))
    }
}

/// Frame-scoped view over the receiver's state enforcing the
/// create/load/replace discipline. Holds a non-owning borrow of its
/// invocation frame and must never outlive it.
struct StateHandle<'a, 'db, 'vm, 'r, DB, R> {
    ctx: &'a mut InvocationContext<'db, 'vm, 'r, DB, R>,
}

impl<'a, 'db, 'vm, 'r, DB, R> StateHandle<'a, 'db, 'vm, 'r, DB, R>
where
    DB: BlockStore,
    R: Rand,
{
    fn new(ctx: &'a mut InvocationContext<'db, 'vm, 'r, DB, R>) -> Self {
        Self { ctx }
    }

    /// Stores the initial state of the receiver. Aborts if the state was
    /// already constructed.
    fn create<C: Cbor>(&mut self, obj: &C) -> Result<Cid, ActorError> {
        let mut actor = self.ctx.load_actor_state()?;
        if actor.state != *EMPTY_ARR_CID {
            return Err(actor_error!(SysErrorIllegalActor;
                "failed to construct actor state: already initialized"));
        }
        let c = self
            .ctx
            .store
            .put(obj, Blake2b256)
            .map_err(|e| ActorError::downcast_fatal(e, "storage put in create"))?;
        actor.state = c;
        self.ctx.store_actor_state(actor)?;
        Ok(c)
    }

    /// Loads the state of the receiver, see [`InvocationContext::state_load`].
    fn load<C: Cbor>(&self) -> Result<(C, Cid), ActorError> {
        self.ctx.state_load()
    }

    /// Stores a new state for the receiver, checking the state head has
    /// not moved underneath the caller through a nested send.
    fn replace<C: Cbor>(&mut self, expected: &Cid, obj: &C) -> Result<Cid, ActorError> {
        let mut actor = self.ctx.load_actor_state()?;
        if &actor.state != expected {
            return Err(actor_error!(SysErrorIllegalActor;
                "unexpected prior state {} for actor {}, expected {}",
                actor.state, self.ctx.origin_msg.to(), expected));
        }
        let c = self
            .ctx
            .store
            .put(obj, Blake2b256)
            .map_err(|e| ActorError::downcast_fatal(e, "storage put in replace"))?;
        actor.state = c;
        self.ctx.store_actor_state(actor)?;
        Ok(c)
    }

    /// Toggles the frame's side-effect lock around a compute-then-write
    /// critical section.
    fn allow_side_effects(&mut self, allow: bool) {
        self.ctx.allow_side_effects = allow;
    }
}

impl<'db, 'vm, 'r, DB, R> Runtime<GasBlockStore<'db, DB>> for InvocationContext<'db, 'vm, 'r, DB, R>
where
    DB: BlockStore,
    R: Rand,
{
    fn network_version(&self) -> NetworkVersion {
        self.network_version
    }

    fn message(&self) -> &dyn MessageInfo {
        &self.msg
    }

    fn curr_epoch(&self) -> ChainEpoch {
        self.epoch
    }

    fn validate_immediate_caller_accept_any(&mut self) -> Result<(), ActorError> {
        self.abort_if_already_validated()
    }

    fn validate_immediate_caller_is<'a, I>(&mut self, addresses: I) -> Result<(), ActorError>
    where
        I: IntoIterator<Item = &'a Address>,
    {
        self.abort_if_already_validated()?;

        let imm = self.message().caller();

        // Check if there is at least one match
        if !addresses.into_iter().any(|a| *a == imm) {
            return Err(actor_error!(SysErrForbidden;
                "caller {} is not one of supported", imm
            ));
        }
        Ok(())
    }

    fn validate_immediate_caller_type<'a, I>(&mut self, types: I) -> Result<(), ActorError>
    where
        I: IntoIterator<Item = &'a Cid>,
    {
        self.abort_if_already_validated()?;

        let caller = self.message().caller();
        let caller_cid = self
            .get_actor_code_cid(&caller)?
            .ok_or_else(|| ActorError::new_fatal("failed to lookup code cid for caller".into()))?;
        if !types.into_iter().any(|c| *c == caller_cid) {
            return Err(actor_error!(SysErrForbidden;
                    "caller cid type {} not one of supported", caller_cid));
        }
        Ok(())
    }

    fn validate_immediate_caller_signable(&mut self) -> Result<(), ActorError> {
        self.abort_if_already_validated()?;

        let caller = self.message().caller();
        let caller_cid = self
            .get_actor_code_cid(&caller)?
            .ok_or_else(|| ActorError::new_fatal("failed to lookup code cid for caller".into()))?;
        if !is_principal(&caller_cid) {
            return Err(actor_error!(SysErrForbidden;
                "caller cid type {} cannot represent a signing party", caller_cid));
        }
        Ok(())
    }

    fn current_balance(&self) -> Result<TokenAmount, ActorError> {
        Ok(self
            .state
            .get_actor(self.origin_msg.to())
            .map_err(|e| ActorError::new_fatal(e.to_string()))?
            .map(|act| act.balance)
            .unwrap_or_default())
    }

    fn resolve_address(&self, address: &Address) -> Result<Option<Address>, ActorError> {
        self.state
            .lookup_id(address)
            .map_err(|e| ActorError::new_fatal(e.to_string()))
    }

    fn get_actor_code_cid(&self, addr: &Address) -> Result<Option<Cid>, ActorError> {
        Ok(self
            .state
            .get_actor(addr)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?
            .map(|act| act.code))
    }

    fn get_randomness(
        &self,
        personalization: DomainSeparationTag,
        rand_epoch: ChainEpoch,
        entropy: &[u8],
    ) -> Result<Randomness, ActorError> {
        let r = self
            .rand
            .get_chain_randomness(personalization, rand_epoch, entropy)
            .map_err(|e| ActorError::new_fatal(format!("could not get randomness: {}", e)))?;

        Ok(Randomness(r.to_vec()))
    }

    fn create<C: Cbor>(&mut self, obj: &C) -> Result<(), ActorError> {
        StateHandle::new(self).create(obj)?;
        Ok(())
    }

    fn state<C: Cbor>(&self) -> Result<C, ActorError> {
        let (obj, _) = self.state_load()?;
        Ok(obj)
    }

    fn replace<C: Cbor>(&mut self, expected: &Cid, obj: &C) -> Result<Cid, ActorError> {
        StateHandle::new(self).replace(expected, obj)
    }

    fn transaction<C, RT, F>(&mut self, f: F) -> Result<RT, ActorError>
    where
        C: Cbor,
        F: FnOnce(&mut C, &mut Self) -> Result<RT, ActorError>,
    {
        let (mut st, head): (C, Cid) = StateHandle::new(self).load()?;

        // Hold the side-effect lock while the mutation runs; a nested send
        // attempted inside the critical section aborts.
        StateHandle::new(self).allow_side_effects(false);
        let res = f(&mut st, self);
        StateHandle::new(self).allow_side_effects(true);

        let ret = res?;
        StateHandle::new(self).replace(&head, &st)?;
        Ok(ret)
    }

    fn store(&self) -> &GasBlockStore<'db, DB> {
        &self.store
    }

    fn send(
        &mut self,
        to: Address,
        method: MethodNum,
        params: Serialized,
        value: TokenAmount,
    ) -> Result<Serialized, ActorError> {
        if !self.allow_side_effects {
            return Err(actor_error!(SysErrorIllegalActor;
                "Calling send() is not allowed during side-effect lock"));
        }

        let msg = UnsignedMessage {
            version: 0,
            from: *self.msg.to(),
            to,
            sequence: 0,
            value,
            gas_limit: self.gas_available(),
            gas_fee_cap: TokenAmount::default(),
            gas_premium: TokenAmount::default(),
            method_num: method,
            params,
        };

        let mut new_ctx = InvocationContext::new(
            self.state,
            self.store.store,
            msg,
            Rc::clone(&self.gas_tracker),
            Rc::clone(&self.top_level),
            self.network_version,
            self.epoch,
            self.price_list,
            self.rand,
            Some((self.depth, self.allow_side_effects)),
        )?;
        let ret = new_ctx.invoke()?;
        let _ = self
            .gas_tracker
            .borrow_mut()
            .try_charge_gas(self.price_list.on_actor_exec());
        Ok(ret)
    }

    fn new_actor_address(&mut self) -> Result<Address, ActorError> {
        let origin_addr = self.top_level.borrow().originator_stable_address;
        let oa = resolve_to_key_addr(self.state, self.store.store, &origin_addr)?;
        let mut b = to_vec(&oa).map_err(|e| {
            actor_error!(ErrSerialization;
                "Could not serialize address in new_actor_address: {}", e)
        })?;
        b.write_u64::<BigEndian>(self.top_level.borrow().originator_call_seq)
            .map_err(|e| {
                actor_error!(ErrSerialization; "Writing call seq into a buffer: {}", e)
            })?;
        b.write_u64::<BigEndian>(self.top_level.borrow().new_actor_address_count)
            .map_err(|e| {
                actor_error!(ErrSerialization;
                    "Writing number of actors created into a buffer: {}", e)
            })?;
        let addr = Address::new_actor(&b);
        self.top_level.borrow_mut().new_actor_address_count += 1;
        Ok(addr)
    }

    fn create_actor(&mut self, code_id: Cid, address: &Address) -> Result<(), ActorError> {
        if address.is_undef() && self.network_version >= NetworkVersion::V7 {
            return Err(actor_error!(SysErrorIllegalArgument; "CreateActor with Undef address"));
        }

        log::debug!("creating actor, code: {}, addr: {}", code_id, address);

        let existing = self
            .state
            .get_actor(address)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?;
        if existing.is_some() {
            return Err(actor_error!(SysErrorIllegalArgument; "Actor address already exists"));
        }

        self.create_actor_record(code_id, *address)?;

        let _ = self
            .gas_tracker
            .borrow_mut()
            .try_charge_gas(self.price_list.on_actor_exec());
        Ok(())
    }

    fn delete_actor(&mut self, beneficiary: &Address) -> Result<(), ActorError> {
        let receiver = *self.origin_msg.to();
        self.charge_gas(self.price_list.on_delete_actor())?;

        let receiver_actor = self
            .state
            .get_actor(&receiver)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?
            .ok_or_else(
                || actor_error!(SysErrorIllegalActor; "delete non-existent actor {}", receiver),
            )?;

        if !receiver_actor.balance.is_zero() {
            if self.network_version >= NetworkVersion::V7 {
                let receiver_id = self
                    .state
                    .lookup_id(&receiver)
                    .map_err(|e| ActorError::new_fatal(e.to_string()))?
                    .ok_or_else(|| {
                        ActorError::new_fatal(format!("failed to resolve receiver {}", receiver))
                    })?;
                let beneficiary_id = self
                    .state
                    .lookup_id(beneficiary)
                    .map_err(|e| ActorError::new_fatal(e.to_string()))?
                    .ok_or_else(
                        || actor_error!(SysErrorIllegalArgument; "beneficiary doesn't exist"),
                    )?;

                if beneficiary_id == receiver_id {
                    return Err(
                        actor_error!(SysErrorIllegalArgument; "benefactor cannot be beneficiary"),
                    );
                }
            }

            // Transfer the executing actor's balance to the beneficiary
            transfer(self.state, &receiver, beneficiary, &receiver_actor.balance)?;
        }

        self.state
            .delete_actor(&receiver)
            .map_err(|e| ActorError::new_fatal(e.to_string()))?;

        let _ = self
            .gas_tracker
            .borrow_mut()
            .try_charge_gas(self.price_list.on_actor_exec());
        Ok(())
    }
}
