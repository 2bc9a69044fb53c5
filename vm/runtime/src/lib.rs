// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod actor_code;

pub use self::actor_code::*;

use address::Address;
use cid::Cid;
use encoding::Cbor;
use ipld_blockstore::BlockStore;
use vm::{
    ActorError, ChainEpoch, DomainSeparationTag, MethodNum, NetworkVersion, Randomness, Serialized,
    TokenAmount,
};

/// Runtime is the VM's internal runtime object.
/// this is everything that is accessible to actors, beyond parameters.
pub trait Runtime<BS: BlockStore> {
    /// The network version active for the current tipset.
    fn network_version(&self) -> NetworkVersion;

    /// Information related to the current message being executed.
    fn message(&self) -> &dyn MessageInfo;

    /// The current chain epoch number. The genesis block has epoch zero.
    fn curr_epoch(&self) -> ChainEpoch;

    /// Validates the caller against some predicate.
    /// Exported actor methods must invoke exactly one caller validation before returning.
    fn validate_immediate_caller_accept_any(&mut self) -> Result<(), ActorError>;
    fn validate_immediate_caller_is<'a, I>(&mut self, addresses: I) -> Result<(), ActorError>
    where
        I: IntoIterator<Item = &'a Address>;
    fn validate_immediate_caller_type<'a, I>(&mut self, types: I) -> Result<(), ActorError>
    where
        I: IntoIterator<Item = &'a Cid>;
    /// Validates that the caller is an actor that can represent an external
    /// signing party (an account or multisig style actor).
    fn validate_immediate_caller_signable(&mut self) -> Result<(), ActorError>;

    /// The balance of the receiver.
    fn current_balance(&self) -> Result<TokenAmount, ActorError>;

    /// Resolves an address of any protocol to an ID address (via the Init actor's table).
    /// This allows resolution of externally-provided SECP, BLS, or actor addresses to the canonical form.
    /// If the argument is an ID address it is returned directly.
    fn resolve_address(&self, address: &Address) -> Result<Option<Address>, ActorError>;

    /// Look up the code ID at an actor address.
    fn get_actor_code_cid(&self, addr: &Address) -> Result<Option<Cid>, ActorError>;

    /// Randomness returns a (pseudo)random byte array drawing from the
    /// chain randomness source at a given epoch and incorporating requisite entropy.
    fn get_randomness(
        &self,
        personalization: DomainSeparationTag,
        rand_epoch: ChainEpoch,
        entropy: &[u8],
    ) -> Result<Randomness, ActorError>;

    /// Initializes the state object.
    /// This is only valid in a constructor function and when the state has not yet been initialized.
    fn create<C: Cbor>(&mut self, obj: &C) -> Result<(), ActorError>;

    /// Loads a readonly copy of the state of the receiver into the argument.
    ///
    /// Any modification to the state is illegal and will not be persisted.
    fn state<C: Cbor>(&self) -> Result<C, ActorError>;

    /// Replaces the receiver's state, checking that the state head has not
    /// moved since `expected` was read. Returns the new state head.
    fn replace<C: Cbor>(&mut self, expected: &Cid, obj: &C) -> Result<Cid, ActorError>;

    /// Loads a mutable version of the state into the `obj` argument and protects
    /// the execution from side effects (including message send).
    ///
    /// The second argument is a function which allows the caller to mutate the state.
    /// The return value from that function will be returned from the call to transaction().
    ///
    /// If the state head moved underneath the transaction (through a nested
    /// call), committing the mutated state aborts.
    fn transaction<C, RT, F>(&mut self, f: F) -> Result<RT, ActorError>
    where
        C: Cbor,
        F: FnOnce(&mut C, &mut Self) -> Result<RT, ActorError>,
        Self: Sized;

    /// Returns reference to blockstore used by the runtime, charged per operation.
    fn store(&self) -> &BS;

    /// Sends a message to another actor, returning the return value envelope.
    /// If the invoked method does not return successfully, its state changes (and that of any messages it sent in turn)
    /// will be rolled back; the error carries the child's exit code.
    fn send(
        &mut self,
        to: Address,
        method: MethodNum,
        params: Serialized,
        value: TokenAmount,
    ) -> Result<Serialized, ActorError>;

    /// Computes an address for a new actor. The returned address is intended to uniquely refer to
    /// the actor even in the event of a chain re-org (whereas an ID-address might refer to a
    /// different actor after messages are re-ordered).
    /// Always an ActorExec address.
    fn new_actor_address(&mut self) -> Result<Address, ActorError>;

    /// Creates an actor with code `code_id` and address `address`, with empty state.
    /// May only be called by Init actor.
    fn create_actor(&mut self, code_id: Cid, address: &Address) -> Result<(), ActorError>;

    /// Deletes the executing actor from the state tree, transferring any
    /// remaining balance to the beneficiary.
    /// May only be called by the actor itself.
    fn delete_actor(&mut self, beneficiary: &Address) -> Result<(), ActorError>;
}

/// Message information available to the actor about the executing message.
pub trait MessageInfo {
    /// The address of the immediate calling actor. Always an ID-address.
    fn caller(&self) -> Address;

    /// The address of the actor receiving the message. Always an ID-address.
    fn receiver(&self) -> Address;

    /// The value attached to the message being processed, implicitly added
    /// to current_balance() before method invocation.
    fn value_received(&self) -> TokenAmount;
}

impl MessageInfo for message::UnsignedMessage {
    fn caller(&self) -> Address {
        self.from
    }
    fn receiver(&self) -> Address {
        self.to
    }
    fn value_received(&self) -> TokenAmount {
        self.value.clone()
    }
}
