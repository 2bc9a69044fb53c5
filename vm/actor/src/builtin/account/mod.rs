// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod state;

pub use self::state::State;

use crate::dispatch::{self, Exports, MethodDescriptor};
use crate::{check_empty_params, SYSTEM_ACTOR_ADDR};
use address::{Address, Protocol};
use ipld_blockstore::BlockStore;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use runtime::{ActorCode, Runtime};
use vm::{actor_error, ActorError, MethodNum, Serialized, METHOD_CONSTRUCTOR};

/// Account actor methods available
#[derive(FromPrimitive)]
#[repr(u64)]
pub enum Method {
    Constructor = METHOD_CONSTRUCTOR,
    PubkeyAddress = 2,
}

/// Exported methods of the account actor.
pub const EXPORTS: Exports = &[
    None,
    Some(MethodDescriptor {
        name: "Constructor",
        params: "Address",
        ret: "EmptyValue",
    }),
    Some(MethodDescriptor {
        name: "PubkeyAddress",
        params: "EmptyValue",
        ret: "Address",
    }),
];

/// Account Actor
pub struct Actor;

impl Actor {
    /// Constructor for Account actor
    pub fn constructor<BS, RT>(rt: &mut RT, address: Address) -> Result<(), ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_is(std::iter::once(&*SYSTEM_ACTOR_ADDR))?;
        match address.protocol() {
            Protocol::Secp256k1 | Protocol::BLS => {}
            protocol => {
                return Err(
                    actor_error!(ErrIllegalArgument; "address must use BLS or SECP protocol, got {}", protocol),
                );
            }
        }
        rt.create(&State { address })?;
        Ok(())
    }

    /// Fetches the pubkey-type address from this actor.
    pub fn pubkey_address<BS, RT>(rt: &mut RT) -> Result<Address, ActorError>
    where
        BS: BlockStore,
        RT: Runtime<BS>,
    {
        rt.validate_immediate_caller_accept_any()?;
        let st: State = rt.state()?;
        Ok(st.address)
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
        match FromPrimitive::from_u64(method) {
            Some(Method::Constructor) => {
                let params = dispatch::decode_params(rt.network_version(), params)?;
                Self::constructor(rt, params)?;
                Ok(Serialized::default())
            }
            Some(Method::PubkeyAddress) => {
                check_empty_params(params)?;
                let addr = Self::pubkey_address(rt)?;
                dispatch::serialize_return(&addr)
            }
            None => Err(actor_error!(SysErrInvalidMethod; "Invalid method")),
        }
    }
}
