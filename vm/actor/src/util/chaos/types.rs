// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use address::Address;
use cid::Cid;
use encoding::tuple::*;
use vm::{bigint_ser, ExitCode, MethodNum, Serialized, TokenAmount};

/// CreateActorArgs are the arguments to CreateActor.
#[derive(Serialize_tuple, Deserialize_tuple, Default, Debug)]
pub struct CreateActorArgs {
    pub undef_cid: bool,
    pub cid: Cid,
    pub undef_address: bool,
    pub address: Address,
}

/// Holds the response of a call to runtime.ResolveAddress
#[derive(Serialize_tuple, Deserialize_tuple, Debug)]
pub struct ResolveAddressResponse {
    pub address: Address,
    pub success: bool,
}

/// Send args for the chaos actor's reflecting send.
#[derive(Serialize_tuple, Deserialize_tuple, Default, Debug)]
pub struct SendArgs {
    pub to: Address,
    #[serde(with = "bigint_ser")]
    pub value: TokenAmount,
    pub method: MethodNum,
    pub params: Serialized,
}

/// SendReturn is the return values for the Send method.
#[derive(Serialize_tuple, Deserialize_tuple, Debug)]
pub struct SendReturn {
    pub return_value: Serialized,
    pub code: ExitCode,
}

/// MutateStateArgs specify how to mutate the chaos actor's state.
#[derive(Serialize_tuple, Deserialize_tuple, Default, Debug)]
pub struct MutateStateArgs {
    pub value: String,
    pub branch: i64,
}

/// AbortWithArgs specify the exit code and message of the abort.
#[derive(Serialize_tuple, Deserialize_tuple, Debug)]
pub struct AbortWithArgs {
    pub code: ExitCode,
    pub message: String,
    pub uncontrolled: bool,
}

impl Default for AbortWithArgs {
    fn default() -> Self {
        Self {
            code: ExitCode::Ok,
            message: String::new(),
            uncontrolled: false,
        }
    }
}

/// RecurseArgs set how many more frames of self-sends to create.
#[derive(Serialize_tuple, Deserialize_tuple, Default, Debug)]
pub struct RecurseArgs {
    pub remaining: u64,
}
