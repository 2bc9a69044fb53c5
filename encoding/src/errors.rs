// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt;
use thiserror::Error;

/// Error type for encoding and decoding data through any helios supported protocol.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Could not decode in format {protocol}: {description}")]
    Unmarshalling {
        description: String,
        protocol: CodecProtocol,
    },
    #[error("Could not encode in format {protocol}: {description}")]
    Marshalling {
        description: String,
        protocol: CodecProtocol,
    },
}

/// CodecProtocol defines the protocol in which the data is encoded or decoded
///
/// This is used with the encoding errors, to detail the encoding protocol or any other
/// information about how the data was encoded or decoded
#[derive(Debug, PartialEq, Eq)]
pub enum CodecProtocol {
    Cbor,
}

impl fmt::Display for CodecProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CodecProtocol::Cbor => write!(f, "Cbor"),
        }
    }
}
