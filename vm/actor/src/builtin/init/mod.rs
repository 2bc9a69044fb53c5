// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod state;

pub use self::state::State;

use crate::dispatch::{self, Exports, MethodDescriptor};
use crate::{is_builtin_actor, is_singleton_actor, SYSTEM_ACTOR_ADDR};
use address::Address;
use cid::Cid;
use encoding::tuple::*;
use ipld_blockstore::BlockStore;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use runtime::{ActorCode, Runtime};
use vm::{actor_error, ActorError, MethodNum, Serialized, METHOD_CONSTRUCTOR};

/// Init actor methods available
#[derive(FromPrimitive)]
#[repr(u64)]
pub enum Method {
    Constructor = METHOD_CONSTRUCTOR,
    Exec = 2,
}

/// Exported methods of the init actor.
pub const EXPORTS: Exports = &[
    None,
    Some(MethodDescriptor {
        name: "Constructor",
        params: "ConstructorParams",
        ret: "EmptyValue",
    }),
    Some(MethodDescriptor {
        name: "Exec",
        params: "ExecParams",
        ret: "ExecReturn",
    }),
];

/// Init actor constructor parameters.
#[derive(Serialize_tuple, Deserialize_tuple, Default, Debug)]
pub struct ConstructorParams {
    pub network_name: String,
}

/// Exec parameters: the code of the actor to instantiate along with the
/// encoded parameters for its constructor.
#[derive(Serialize_tuple, Deserialize_tuple, Default, Debug)]
pub struct ExecParams {
    pub code_cid: Cid,
    pub constructor_params: Serialized,
}

/// Exec return value: the canonical ID address of the new actor and the
/// re-org safe address it may also be reached by.
#[derive(Serialize_tuple, Deserialize_tuple, Debug)]
pub struct ExecReturn {
    pub id_address: Address,
    pub robust_address: Address,
}

/// Init actor
pub struct Actor;

impl Actor {
    /// Init actor constructor
    pub fn constructor<BS, RT>(rt: &mut RT, params: ConstructorParams) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_is(std::iter::once(&*SYSTEM_ACTOR_ADDR))?;
        let state = State::new(rt.store(), params.network_name)
            .map_err(|e| actor_error!(ErrIllegalState; "failed to construct state: {}", e))?;
        rt.create(&state)?;
        Ok(())
    }

    /// Creates a new actor: assigns it the next ID address, installs an
    /// empty actor record at that address, and invokes its constructor
    /// with the value received.
    pub fn exec<BS, RT>(rt: &mut RT, params: ExecParams) -> Result<ExecReturn, ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;

        if !can_exec(&params.code_cid) {
            return Err(
                actor_error!(ErrForbidden; "cannot exec actor of type {}", params.code_cid),
            );
        }

        // Compute the re-org safe address before touching state.
        let robust_address = rt.new_actor_address()?;

        // Allocate an ID for the new actor and map the robust address to it.
        let id_address = rt.transaction(|s: &mut State, rt| {
            s.map_address_to_new_id(rt.store(), &robust_address)
                .map_err(|e| actor_error!(ErrIllegalState; "failed to allocate ID address: {}", e))
        })?;

        rt.create_actor(params.code_cid, &id_address)?;

        // Invoke the constructor, passing on any value received.
        let value = rt.message().value_received();
        rt.send(
            id_address,
            METHOD_CONSTRUCTOR,
            params.constructor_params,
            value,
        )
        .map_err(|e| e.wrap("constructor failed"))?;

        Ok(ExecReturn {
            id_address,
            robust_address,
        })
    }
}

// Singleton actors are wired in at genesis and can never be instantiated
// by messages.
fn can_exec(code: &Cid) -> bool {
    is_builtin_actor(code) && !is_singleton_actor(code)
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
        match FromPrimitive::from_u64(method) {
            Some(Method::Constructor) => {
                let params = dispatch::decode_params(rt.network_version(), params)?;
                Self::constructor(rt, params)?;
                Ok(Serialized::default())
            }
            Some(Method::Exec) => {
                let params = dispatch::decode_params(rt.network_version(), params)?;
                let res = Self::exec(rt, params)?;
                dispatch::serialize_return(&res)
            }
            None => Err(actor_error!(SysErrInvalidMethod; "Invalid method")),
        }
    }
}
