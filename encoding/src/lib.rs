// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod bytes;
mod cbor;
mod errors;
mod hash;

pub use self::bytes::*;
pub use self::cbor::*;
pub use self::errors::*;
pub use self::hash::*;

pub use serde::{de, ser};
pub use serde_bytes;

use serde::{de::DeserializeOwned, ser::Serialize};

/// Serializes an object into canonical CBOR bytes.
pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    serde_cbor::to_vec(value).map_err(|e| Error::Marshalling {
        description: e.to_string(),
        protocol: CodecProtocol::Cbor,
    })
}

/// Deserializes an object from canonical CBOR bytes.
pub fn from_slice<T: DeserializeOwned>(bz: &[u8]) -> Result<T, Error> {
    serde_cbor::from_slice(bz).map_err(|e| Error::Unmarshalling {
        description: e.to_string(),
        protocol: CodecProtocol::Cbor,
    })
}

pub mod tuple {
    pub use serde_tuple::{self, Deserialize_tuple, Serialize_tuple};
}

pub mod repr {
    pub use serde_repr::{Deserialize_repr, Serialize_repr};
}
