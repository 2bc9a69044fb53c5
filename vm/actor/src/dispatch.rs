// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Typed method dispatch support. Each actor carries a static exports
//! table indexed by method number; entries record the declared parameter
//! and return types for tooling, while decoding and encoding follow the
//! consensus rules for the active network version.

use encoding::{de::DeserializeOwned, ser::Serialize};
use vm::{actor_error, ActorError, ExitCode, MethodNum, NetworkVersion, Serialized};

/// Describes one exported actor method: its name and the declared
/// parameter and return types. Undefined method numbers hold `None` in
/// the exports table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub params: &'static str,
    pub ret: &'static str,
}

/// Exports table of an actor, indexed by method number. Method number 0
/// is the reserved value transfer method and is never exported.
pub type Exports = &'static [Option<MethodDescriptor>];

/// Returns the declared signature for a method without executing it.
pub fn signature(exports: Exports, method: MethodNum) -> Result<MethodDescriptor, ActorError> {
    exports
        .get(method as usize)
        .copied()
        .flatten()
        .ok_or_else(|| actor_error!(SysErrInvalidMethod; "Method undefined: {}", method))
}

/// Decodes raw parameter bytes into the method's declared parameter type.
/// Empty bytes supply the type's nil value. A decode failure maps to
/// `ErrSerialization` from network version 7, and to the generic exit
/// code 1 before that.
pub fn decode_params<T: DeserializeOwned + Default>(
    nv: NetworkVersion,
    params: &Serialized,
) -> Result<T, ActorError> {
    if params.is_empty() {
        return Ok(T::default());
    }
    params.deserialize().map_err(|e| {
        let code = if nv < NetworkVersion::V7 {
            ExitCode::SysErrSenderInvalid
        } else {
            ExitCode::ErrSerialization
        };
        ActorError::new(code, format!("failed to decode parameters: {}", e))
    })
}

/// Encodes a method return value. An encode failure surfaces as
/// `SysErrSenderStateInvalid`, matching the dispatch contract.
pub fn serialize_return<T: Serialize>(value: &T) -> Result<Serialized, ActorError> {
    Serialized::serialize(value).map_err(|e| {
        actor_error!(SysErrSenderStateInvalid; "failed to marshal return value: {}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORTS: Exports = &[
        None,
        Some(MethodDescriptor {
            name: "Constructor",
            params: "ConstructorParams",
            ret: "EmptyValue",
        }),
        None,
        Some(MethodDescriptor {
            name: "PubkeyAddress",
            params: "EmptyValue",
            ret: "Address",
        }),
    ];

    #[test]
    fn signature_lookup() {
        assert_eq!(signature(EXPORTS, 1).unwrap().name, "Constructor");
        assert_eq!(signature(EXPORTS, 3).unwrap().ret, "Address");
        for missing in [0, 2, 4, 100] {
            assert_eq!(
                signature(EXPORTS, missing).unwrap_err().exit_code(),
                ExitCode::SysErrInvalidMethod
            );
        }
    }

    #[test]
    fn decode_failure_codes_by_version() {
        let garbage = Serialized::new(vec![0xff, 0xff]);
        let pre = decode_params::<u64>(NetworkVersion::V6, &garbage).unwrap_err();
        assert_eq!(pre.exit_code(), ExitCode::SysErrSenderInvalid);
        let post = decode_params::<u64>(NetworkVersion::V7, &garbage).unwrap_err();
        assert_eq!(post.exit_code(), ExitCode::ErrSerialization);
    }

    #[test]
    fn nil_params_use_default() {
        let v: u64 = decode_params(NetworkVersion::V7, &Serialized::default()).unwrap();
        assert_eq!(v, 0);
    }
}
