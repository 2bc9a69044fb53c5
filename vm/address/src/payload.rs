// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::errors::Error;
use super::protocol::Protocol;
use super::{BLS_PUB_LEN, MAX_SUBADDRESS_LEN, PAYLOAD_HASH_LEN};

/// A delegated address: an actor namespace together with a sub-address
/// interpreted by the namespace's manager actor.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub struct DelegatedAddress {
    namespace: u64,
    length: usize,
    buffer: [u8; MAX_SUBADDRESS_LEN],
}

impl DelegatedAddress {
    pub(super) fn new(namespace: u64, subaddress: &[u8]) -> Self {
        let mut buffer = [0u8; MAX_SUBADDRESS_LEN];
        buffer[..subaddress.len()].copy_from_slice(subaddress);
        Self {
            namespace,
            length: subaddress.len(),
            buffer,
        }
    }

    /// The namespace the sub-address belongs to.
    pub fn namespace(&self) -> u64 {
        self.namespace
    }

    /// The sub-address bytes.
    pub fn subaddress(&self) -> &[u8] {
        &self.buffer[..self.length]
    }
}

/// Payload of an Address, a tagged union over all address protocols.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord)]
pub enum Payload {
    /// ID protocol address, the canonical state tree key form
    ID(u64),
    /// SECP256K1 key address, 20 byte hash of the public key
    Secp256k1([u8; PAYLOAD_HASH_LEN]),
    /// Actor protocol address, 20 byte hash of deterministic seed data
    Actor([u8; PAYLOAD_HASH_LEN]),
    /// BLS key address, full 48 byte public key
    BLS([u8; BLS_PUB_LEN]),
    /// Namespaced delegated address
    Delegated(DelegatedAddress),
    /// The undefined address carries no payload
    Undef,
}

impl Payload {
    /// Returns encoded bytes of payload without the protocol tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::ID(id) => {
                let mut buf = unsigned_varint::encode::u64_buffer();
                unsigned_varint::encode::u64(*id, &mut buf).to_vec()
            }
            Payload::Secp256k1(payload) | Payload::Actor(payload) => payload.to_vec(),
            Payload::BLS(key) => key.to_vec(),
            Payload::Delegated(addr) => {
                let mut buf = unsigned_varint::encode::u64_buffer();
                let mut bz = unsigned_varint::encode::u64(addr.namespace, &mut buf).to_vec();
                bz.extend_from_slice(addr.subaddress());
                bz
            }
            Payload::Undef => Vec::new(),
        }
    }

    /// Parses a payload for the given protocol from its encoded bytes.
    pub fn from_bytes(protocol: Protocol, payload: &[u8]) -> Result<Self, Error> {
        let pl = match protocol {
            Protocol::ID => {
                let (id, rest) =
                    unsigned_varint::decode::u64(payload).map_err(|_| Error::InvalidPayload)?;
                if !rest.is_empty() {
                    return Err(Error::InvalidPayload);
                }
                Self::ID(id)
            }
            Protocol::Secp256k1 => {
                Self::Secp256k1(to_hash_payload(payload)?)
            }
            Protocol::Actor => Self::Actor(to_hash_payload(payload)?),
            Protocol::BLS => {
                if payload.len() != BLS_PUB_LEN {
                    return Err(Error::InvalidPayloadLength(payload.len()));
                }
                let mut key = [0u8; BLS_PUB_LEN];
                key.copy_from_slice(payload);
                Self::BLS(key)
            }
            Protocol::Delegated => {
                let (namespace, subaddress) =
                    unsigned_varint::decode::u64(payload).map_err(|_| Error::InvalidPayload)?;
                if subaddress.len() > MAX_SUBADDRESS_LEN {
                    return Err(Error::InvalidPayloadLength(subaddress.len()));
                }
                Self::Delegated(DelegatedAddress::new(namespace, subaddress))
            }
            Protocol::Unknown => return Err(Error::UnknownProtocol),
        };
        Ok(pl)
    }
}

fn to_hash_payload(payload: &[u8]) -> Result<[u8; PAYLOAD_HASH_LEN], Error> {
    if payload.len() != PAYLOAD_HASH_LEN {
        return Err(Error::InvalidPayloadLength(payload.len()));
    }
    let mut hash = [0u8; PAYLOAD_HASH_LEN];
    hash.copy_from_slice(payload);
    Ok(hash)
}
