// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{BLS_PUB_LEN, SECP_PUB_LEN};
use thiserror::Error;

/// Address error
#[derive(Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unknown address network")]
    UnknownNetwork,
    #[error("Unknown address protocol")]
    UnknownProtocol,
    #[error("Invalid address payload")]
    InvalidPayload,
    #[error("Invalid address length")]
    InvalidLength,
    #[error("Invalid payload length, wanted hash length or {BLS_PUB_LEN} got: {0}")]
    InvalidPayloadLength(usize),
    #[error("Invalid BLS pub key length, wanted: {BLS_PUB_LEN} got: {0}")]
    InvalidBLSLength(usize),
    #[error("Invalid SECP pub key length, wanted: {SECP_PUB_LEN} got: {0}")]
    InvalidSECPLength(usize),
    #[error("Invalid address checksum")]
    InvalidChecksum,
    #[error("Decoding for address failed: {0}")]
    Base32Decoding(String),
    #[error("Cannot get id from non id address")]
    NonIDAddress,
}
