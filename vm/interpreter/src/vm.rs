// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::gas_tracker::{price_list_by_network_version, GasTracker};
use super::invocation::{InvocationContext, TopLevelContext};
use super::Rand;
use actor::{account, is_account_actor};
use address::{Address, Protocol};
use cid::Cid;
use ipld_blockstore::BlockStore;
use message::{Message, UnsignedMessage};
use num_traits::Signed;
use state_tree::StateTree;
use std::cell::RefCell;
use std::error::Error as StdError;
use std::rc::Rc;
use vm::{
    actor_error, ActorError, ChainEpoch, ExitCode, NetworkVersion, Serialized, TokenAmount,
};

/// Interpreter which handles execution of state transitioning messages
/// against the actor state tree.
///
/// The VM exclusively owns the state tree for the duration of a tipset;
/// the outer applier drives it one message at a time and settles fees
/// from the returned results.
pub struct VM<'db, 'r, DB, R, N> {
    state: StateTree<'db, DB>,
    store: &'db DB,
    epoch: ChainEpoch,
    rand: &'r R,
    network_version_getter: N,
}

/// Result of applying one message: what the outer applier needs to build
/// a receipt.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    /// Return value of the invoked method, empty on failure.
    pub return_data: Serialized,
    /// Exit code of the invocation.
    pub exit_code: ExitCode,
    /// Gas consumed by the message, including all nested sends.
    pub gas_used: i64,
    /// The error the invocation was terminated with, if any.
    pub act_error: Option<ActorError>,
}

impl<'db, 'r, DB, R, N> VM<'db, 'r, DB, R, N>
where
    DB: BlockStore,
    R: Rand,
    N: Fn(ChainEpoch) -> NetworkVersion,
{
    pub fn new(
        root: &Cid,
        store: &'db DB,
        epoch: ChainEpoch,
        rand: &'r R,
        network_version_getter: N,
    ) -> Result<Self, Box<dyn StdError>> {
        let state = StateTree::new_from_root(store, root)?;
        Ok(VM {
            state,
            store,
            epoch,
            rand,
            network_version_getter,
        })
    }

    /// Flush stores in VM and return state root.
    pub fn flush(&mut self) -> Result<Cid, Box<dyn StdError>> {
        self.state.flush()
    }

    /// Returns the epoch the VM is initialized with.
    pub fn epoch(&self) -> ChainEpoch {
        self.epoch
    }

    /// Returns a reference to the VM's state tree.
    pub fn state(&self) -> &StateTree<'db, DB> {
        &self.state
    }

    fn network_version(&self) -> NetworkVersion {
        (self.network_version_getter)(self.epoch)
    }

    /// Executes a message against the state tree, returning its return
    /// value, exit code and gas consumption. All state changes of a failed
    /// invocation are rolled back before this returns.
    ///
    /// Fatal errors indicate storage corruption rather than message
    /// failure and surface as `Err`, never as an exit code.
    pub fn execute_message(
        &mut self,
        msg: &UnsignedMessage,
    ) -> Result<ExecutionResult, Box<dyn StdError>> {
        check_message(msg)?;

        let network_version = self.network_version();
        let price_list = price_list_by_network_version(network_version);
        let gas_tracker = Rc::new(RefCell::new(GasTracker::new(msg.gas_limit(), 0)));
        let top_level = Rc::new(RefCell::new(TopLevelContext {
            originator_stable_address: *msg.from(),
            originator_call_seq: msg.sequence(),
            new_actor_address_count: 0,
        }));

        let res = InvocationContext::new(
            &mut self.state,
            self.store,
            msg.clone(),
            Rc::clone(&gas_tracker),
            top_level,
            network_version,
            self.epoch,
            price_list,
            self.rand,
            None,
        )
        .and_then(|mut ctx| ctx.invoke());

        // The delete-actor refund can leave the counter negative.
        let gas_used = gas_tracker.borrow().gas_used().max(0);

        match res {
            Ok(return_data) => Ok(ExecutionResult {
                return_data,
                exit_code: ExitCode::Ok,
                gas_used,
                act_error: None,
            }),
            Err(e) if e.is_fatal() => Err(format!(
                "[from={}, to={}, seq={}, m={}, h={}] fatal error: {}",
                msg.from(),
                msg.to(),
                msg.sequence(),
                msg.method_num(),
                self.epoch,
                e
            )
            .into()),
            Err(e) => {
                log::debug!(
                    "[from={}, to={}, seq={}, m={}] send error: {}",
                    msg.from(),
                    msg.to(),
                    msg.sequence(),
                    msg.method_num(),
                    e
                );
                Ok(ExecutionResult {
                    return_data: Serialized::default(),
                    exit_code: e.exit_code(),
                    gas_used,
                    act_error: Some(e),
                })
            }
        }
    }
}

/// Transfers funds from one Actor to another Actor. A transfer between an
/// actor and itself is a no-op; negative amounts are forbidden.
pub(crate) fn transfer<DB: BlockStore>(
    state: &mut StateTree<DB>,
    from: &Address,
    to: &Address,
    value: &TokenAmount,
) -> Result<(), ActorError> {
    if from == to {
        return Ok(());
    }
    if value.is_negative() {
        return Err(actor_error!(SysErrForbidden; "attempt to transfer negative value"));
    }

    let mut f = state
        .get_actor(from)
        .map_err(|e| ActorError::new_fatal(e.to_string()))?
        .ok_or_else(
            || actor_error!(SysErrSenderInvalid; "transfer failed to retrieve sender actor"),
        )?;
    let mut t = state
        .get_actor(to)
        .map_err(|e| ActorError::new_fatal(e.to_string()))?
        .ok_or_else(
            || actor_error!(SysErrInvalidReceiver; "transfer failed to retrieve receiver actor"),
        )?;

    f.deduct_funds(value)
        .map_err(|e| actor_error!(SysErrInsufficientFunds; e))?;
    t.deposit_funds(value);

    state
        .set_actor(from, f)
        .map_err(|e| ActorError::new_fatal(e.to_string()))?;
    state
        .set_actor(to, t)
        .map_err(|e| ActorError::new_fatal(e.to_string()))?;

    Ok(())
}

/// Returns the public key type of address (`BLS`/`SECP256K1`) of an
/// actor, resolving through the account actor's state if needed.
pub fn resolve_to_key_addr<BS, S>(
    st: &StateTree<'_, S>,
    store: &BS,
    addr: &Address,
) -> Result<Address, ActorError>
where
    BS: BlockStore,
    S: BlockStore,
{
    if addr.protocol() == Protocol::BLS || addr.protocol() == Protocol::Secp256k1 {
        return Ok(*addr);
    }

    let act = st
        .get_actor(addr)
        .map_err(|e| ActorError::new_fatal(e.to_string()))?
        .ok_or_else(|| actor_error!(SysErrSenderInvalid; "failed to retrieve actor: {}", addr))?;

    if !is_account_actor(&act.code) {
        return Err(ActorError::new_fatal(format!(
            "address was not found for an account actor: {}",
            addr
        )));
    }
    let acc_st: account::State = store
        .get(&act.state)
        .map_err(|e| {
            ActorError::new_fatal(format!(
                "failed to get account actor state for: {}, e: {}",
                addr, e
            ))
        })?
        .ok_or_else(|| {
            ActorError::new_fatal(format!(
                "address was not found for an account actor: {}",
                addr
            ))
        })?;

    Ok(acc_st.address)
}

/// Does some basic checks on the Message to see if the fields are valid.
fn check_message(msg: &UnsignedMessage) -> Result<(), &'static str> {
    if msg.gas_limit() == 0 {
        return Err("Message has no gas limit set");
    }
    if msg.gas_limit() < 0 {
        return Err("Message has negative gas limit");
    }

    Ok(())
}
