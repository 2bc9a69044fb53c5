// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! An actor that wilfully breaks VM invariants, used to exercise the
//! runtime's enforcement paths from integration tests. Never deployed
//! outside of test networks.

mod state;
mod types;

use crate::check_empty_params;
use crate::dispatch::{self, Exports, MethodDescriptor};
use address::Address;
use ipld_blockstore::BlockStore;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use runtime::{ActorCode, Runtime};
pub use state::*;
pub use types::*;
use vm::{
    actor_error, ActorError, ExitCode, MethodNum, Serialized, TokenAmount, METHOD_CONSTRUCTOR,
    METHOD_SEND,
};

// Caller validation branches
pub const CALLER_VALIDATION_BRANCH_NONE: i64 = 0;
pub const CALLER_VALIDATION_BRANCH_TWICE: i64 = 1;
pub const CALLER_VALIDATION_BRANCH_ADDR_NIL_SET: i64 = 2;
pub const CALLER_VALIDATION_BRANCH_TYPE_NIL_SET: i64 = 3;

// Mutate state branches
pub const MUTATE_IN_TRANSACTION: i64 = 0;
pub const MUTATE_SEND_IN_TRANSACTION: i64 = 1;

/// Chaos actor methods available
#[derive(FromPrimitive)]
#[repr(u64)]
pub enum Method {
    Constructor = METHOD_CONSTRUCTOR,
    CallerValidation = 2,
    CreateActor = 3,
    ResolveAddress = 4,
    DeleteActor = 5,
    Send = 6,
    MutateState = 7,
    AbortWith = 8,
    Recurse = 9,
}

/// Exported methods of the chaos actor.
pub const EXPORTS: Exports = &[
    None,
    Some(MethodDescriptor {
        name: "Constructor",
        params: "EmptyValue",
        ret: "EmptyValue",
    }),
    Some(MethodDescriptor {
        name: "CallerValidation",
        params: "i64",
        ret: "EmptyValue",
    }),
    Some(MethodDescriptor {
        name: "CreateActor",
        params: "CreateActorArgs",
        ret: "EmptyValue",
    }),
    Some(MethodDescriptor {
        name: "ResolveAddress",
        params: "Address",
        ret: "ResolveAddressResponse",
    }),
    Some(MethodDescriptor {
        name: "DeleteActor",
        params: "Address",
        ret: "EmptyValue",
    }),
    Some(MethodDescriptor {
        name: "Send",
        params: "SendArgs",
        ret: "SendReturn",
    }),
    Some(MethodDescriptor {
        name: "MutateState",
        params: "MutateStateArgs",
        ret: "EmptyValue",
    }),
    Some(MethodDescriptor {
        name: "AbortWith",
        params: "AbortWithArgs",
        ret: "EmptyValue",
    }),
    Some(MethodDescriptor {
        name: "Recurse",
        params: "RecurseArgs",
        ret: "EmptyValue",
    }),
];

/// Chaos Actor
pub struct Actor;

impl Actor {
    /// Constructor stores an empty state so the actor can be created
    /// through the init actor in tests.
    pub fn constructor<BS, RT>(rt: &mut RT) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;
        rt.create(&State::default())?;
        Ok(())
    }

    /// Sends a message to the given address and reflects the outcome
    /// back to the caller instead of propagating it.
    pub fn send<BS, RT>(rt: &mut RT, arg: SendArgs) -> Result<SendReturn, ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;
        match rt.send(arg.to, arg.method, arg.params, arg.value) {
            Ok(return_value) => Ok(SendReturn {
                return_value,
                code: ExitCode::Ok,
            }),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => Ok(SendReturn {
                return_value: Serialized::default(),
                code: e.exit_code(),
            }),
        }
    }

    /// CallerValidation violates VM call validation constraints.
    ///
    ///  CALLER_VALIDATION_BRANCH_NONE performs no validation.
    ///  CALLER_VALIDATION_BRANCH_TWICE validates twice.
    ///  CALLER_VALIDATION_BRANCH_ADDR_NIL_SET validates against an empty caller
    ///  address set.
    ///  CALLER_VALIDATION_BRANCH_TYPE_NIL_SET validates against an empty caller type set.
    pub fn caller_validation<BS, RT>(rt: &mut RT, branch: i64) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        match branch {
            x if x == CALLER_VALIDATION_BRANCH_NONE => {}
            x if x == CALLER_VALIDATION_BRANCH_TWICE => {
                rt.validate_immediate_caller_accept_any()?;
                rt.validate_immediate_caller_accept_any()?;
            }
            x if x == CALLER_VALIDATION_BRANCH_ADDR_NIL_SET => {
                rt.validate_immediate_caller_is(&[])?;
            }
            x if x == CALLER_VALIDATION_BRANCH_TYPE_NIL_SET => {
                rt.validate_immediate_caller_type(&[])?;
            }
            _ => return Err(actor_error!(ErrIllegalArgument; "invalid branch passed to CallerValidation")),
        }
        Ok(())
    }

    /// Creates an actor with the supplied CID and address.
    pub fn create_actor<BS, RT>(rt: &mut RT, arg: CreateActorArgs) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;
        let actor_cid = if arg.undef_cid {
            Default::default()
        } else {
            arg.cid
        };
        let actor_address = if arg.undef_address {
            Default::default()
        } else {
            arg.address
        };

        rt.create_actor(actor_cid, &actor_address)
    }

    /// Resolves address, and returns the resolved address (defaulting to 0 ID) and success boolean.
    pub fn resolve_address<BS, RT>(
        rt: &mut RT,
        args: Address,
    ) -> Result<ResolveAddressResponse, ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;
        let resolved = rt.resolve_address(&args)?;
        Ok(ResolveAddressResponse {
            address: resolved.unwrap_or_else(|| Address::new_id(0)),
            success: resolved.is_some(),
        })
    }

    /// Deletes the executing actor, sending remaining funds to the beneficiary.
    pub fn delete_actor<BS, RT>(rt: &mut RT, beneficiary: Address) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;
        rt.delete_actor(&beneficiary)
    }

    /// Mutates state under the branch's discipline.
    ///
    ///  MUTATE_IN_TRANSACTION mutates the state within a well-formed transaction.
    ///  MUTATE_SEND_IN_TRANSACTION attempts a nested send while the
    ///  side-effect lock is held.
    pub fn mutate_state<BS, RT>(rt: &mut RT, arg: MutateStateArgs) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;

        match arg.branch {
            x if x == MUTATE_IN_TRANSACTION => rt.transaction(|s: &mut State, _| {
                s.value = arg.value;
                Ok(())
            }),
            x if x == MUTATE_SEND_IN_TRANSACTION => {
                let receiver = rt.message().receiver();
                rt.transaction(|s: &mut State, rt| {
                    s.value = arg.value;
                    rt.send(
                        receiver,
                        METHOD_SEND,
                        Serialized::default(),
                        TokenAmount::default(),
                    )?;
                    Ok(())
                })
            }
            _ => Err(actor_error!(ErrIllegalArgument; "Invalid mutate state command given")),
        }
    }

    /// Aborts with the given exit code and message, or with a fatal error
    /// when `uncontrolled` is set.
    pub fn abort_with<BS, RT>(rt: &mut RT, arg: AbortWithArgs) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;
        if arg.uncontrolled {
            return Err(ActorError::new_fatal(arg.message));
        }
        Err(ActorError::new(arg.code, arg.message))
    }

    /// Sends to itself until `remaining` frames have been created.
    pub fn recurse<BS, RT>(rt: &mut RT, arg: RecurseArgs) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;
        if arg.remaining == 0 {
            return Ok(());
        }
        let receiver = rt.message().receiver();
        let params = Serialized::serialize(&RecurseArgs {
            remaining: arg.remaining - 1,
        })?;
        rt.send(
            receiver,
            Method::Recurse as MethodNum,
            params,
            TokenAmount::default(),
        )?;
        Ok(())
    }
}

impl ActorCode for Actor {
    fn invoke_method<BS, RT>(
        &self,
        rt: &mut RT,
        method: MethodNum,
        params: &Serialized,
    ) -> Result<Serialized, ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        let nv = rt.network_version();
        match FromPrimitive::from_u64(method) {
            Some(Method::Constructor) => {
                check_empty_params(params)?;
                Self::constructor(rt)?;
                Ok(Serialized::default())
            }
            Some(Method::CallerValidation) => {
                let branch = dispatch::decode_params(nv, params)?;
                Self::caller_validation(rt, branch)?;
                Ok(Serialized::default())
            }
            Some(Method::CreateActor) => {
                Self::create_actor(rt, dispatch::decode_params(nv, params)?)?;
                Ok(Serialized::default())
            }
            Some(Method::ResolveAddress) => {
                let res = Self::resolve_address(rt, dispatch::decode_params(nv, params)?)?;
                dispatch::serialize_return(&res)
            }
            Some(Method::DeleteActor) => {
                Self::delete_actor(rt, dispatch::decode_params(nv, params)?)?;
                Ok(Serialized::default())
            }
            Some(Method::Send) => {
                let res = Self::send(rt, dispatch::decode_params(nv, params)?)?;
                dispatch::serialize_return(&res)
            }
            Some(Method::MutateState) => {
                Self::mutate_state(rt, dispatch::decode_params(nv, params)?)?;
                Ok(Serialized::default())
            }
            Some(Method::AbortWith) => {
                Self::abort_with(rt, dispatch::decode_params(nv, params)?)?;
                Ok(Serialized::default())
            }
            Some(Method::Recurse) => {
                Self::recurse(rt, dispatch::decode_params(nv, params)?)?;
                Ok(Serialized::default())
            }
            None => Err(actor_error!(SysErrInvalidMethod; "Invalid method")),
        }
    }
}
