// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod errors;
mod network;
mod payload;
mod protocol;

pub use self::errors::Error;
pub use self::network::Network;
pub use self::payload::{DelegatedAddress, Payload};
pub use self::protocol::Protocol;

#[allow(unused_imports)]
use data_encoding_macro::{internal_new_encoding, new_encoding};
use encoding::blake2b_variable;
use once_cell::sync::OnceCell;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Hash length of payload for Secp and Actor addresses.
pub const PAYLOAD_HASH_LEN: usize = 20;

/// Uncompressed secp public key used for validation of Secp addresses.
pub const SECP_PUB_LEN: usize = 65;

/// BLS public key length used for validation of BLS addresses.
pub const BLS_PUB_LEN: usize = 48;

/// Maximum length of a delegated address's sub-address.
pub const MAX_SUBADDRESS_LEN: usize = 54;

/// Length of the checksum hash for string encodings.
pub const CHECKSUM_HASH_LEN: usize = 4;

/// Network to use for string encoding when none is set explicitly.
pub static NETWORK_DEFAULT: OnceCell<Network> = OnceCell::new();

const ADDRESS_ENCODER: data_encoding::Encoding = new_encoding! {
    symbols: "abcdefghijklmnopqrstuvwxyz234567",
    padding: None,
};

/// Address of an actor on chain. The payload is the protocol-tagged union
/// from the address specification; the undefined address is a distinct
/// value that carries no payload and cannot be stored in the state tree.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Copy, PartialOrd, Ord)]
pub struct Address {
    payload: Payload,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            payload: Payload::Undef,
        }
    }
}

impl Address {
    /// Generates new address using ID protocol.
    pub fn new_id(id: u64) -> Self {
        Self {
            payload: Payload::ID(id),
        }
    }

    /// Generates new address using Secp256k1 pubkey.
    pub fn new_secp256k1(pubkey: &[u8]) -> Result<Self, Error> {
        if pubkey.len() != SECP_PUB_LEN {
            return Err(Error::InvalidSECPLength(pubkey.len()));
        }
        Ok(Self {
            payload: Payload::Secp256k1(address_hash(pubkey)),
        })
    }

    /// Generates new address using the Actor protocol.
    pub fn new_actor(data: &[u8]) -> Self {
        Self {
            payload: Payload::Actor(address_hash(data)),
        }
    }

    /// Generates new address using BLS pubkey.
    pub fn new_bls(pubkey: &[u8]) -> Result<Self, Error> {
        if pubkey.len() != BLS_PUB_LEN {
            return Err(Error::InvalidBLSLength(pubkey.len()));
        }
        let mut key = [0u8; BLS_PUB_LEN];
        key.copy_from_slice(pubkey);
        Ok(Self {
            payload: Payload::BLS(key),
        })
    }

    /// Generates a new delegated address from a namespace and a sub-address.
    pub fn new_delegated(namespace: u64, subaddress: &[u8]) -> Result<Self, Error> {
        if subaddress.len() > MAX_SUBADDRESS_LEN {
            return Err(Error::InvalidPayloadLength(subaddress.len()));
        }
        Ok(Self {
            payload: Payload::Delegated(DelegatedAddress::new(namespace, subaddress)),
        })
    }

    /// The undefined address, used where no address has been set.
    pub fn is_undef(&self) -> bool {
        self.payload == Payload::Undef
    }

    /// Returns protocol for the address.
    pub fn protocol(&self) -> Protocol {
        Protocol::from(&self.payload)
    }

    /// Returns the raw payload of the address.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the id of the address, errors for non ID protocols.
    pub fn id(&self) -> Result<u64, Error> {
        match self.payload {
            Payload::ID(id) => Ok(id),
            _ => Err(Error::NonIDAddress),
        }
    }

    /// Returns encoded bytes of Address, protocol tag followed by payload.
    /// The undefined address encodes as the empty byte string.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.is_undef() {
            return Vec::new();
        }
        let mut bz = self.payload.to_bytes();
        bz.insert(0, self.protocol() as u8);
        bz
    }

    /// Parses an address from the byte form produced by [`Address::to_bytes`].
    pub fn from_bytes(bz: &[u8]) -> Result<Self, Error> {
        if bz.len() < 2 {
            return Err(Error::InvalidLength);
        }
        let protocol = Protocol::from_byte(bz[0]).ok_or(Error::UnknownProtocol)?;
        Ok(Self {
            payload: Payload::from_bytes(protocol, &bz[1..])?,
        })
    }
}

/// Checksum calculates the 4 byte checksum hash
pub fn checksum(ingest: &[u8]) -> Vec<u8> {
    blake2b_variable(ingest, CHECKSUM_HASH_LEN)
}

/// Validates the checksum against the ingest data
pub fn validate_checksum(ingest: &[u8], expect: Vec<u8>) -> bool {
    let digest = checksum(ingest);
    digest == expect
}

/// Returns an address hash for given data
fn address_hash(ingest: &[u8]) -> [u8; PAYLOAD_HASH_LEN] {
    let digest = blake2b_variable(ingest, PAYLOAD_HASH_LEN);
    let mut hash = [0u8; PAYLOAD_HASH_LEN];
    hash.copy_from_slice(&digest);
    hash
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undef() {
            return write!(f, "<empty>");
        }
        let network = NETWORK_DEFAULT.get_or_init(|| Network::Mainnet);
        let prefix = network.to_prefix();
        let protocol = self.protocol();
        match self.payload {
            Payload::ID(id) => write!(f, "{}{}{}", prefix, protocol, id),
            _ => {
                let bz = self.to_bytes();
                let mut ingest = self.payload.to_bytes();
                let cksm = checksum(&bz);
                ingest.extend_from_slice(&cksm);
                write!(f, "{}{}{}", prefix, protocol, ADDRESS_ENCODER.encode(&ingest))
            }
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(addr: &str) -> Result<Self, Error> {
        if addr.len() < 3 {
            return Err(Error::InvalidLength);
        }
        let network = match addr.get(0..1) {
            Some("f") => Network::Mainnet,
            Some("t") => Network::Testnet,
            _ => return Err(Error::UnknownNetwork),
        };
        if NETWORK_DEFAULT.get_or_init(|| Network::Mainnet) != &network {
            return Err(Error::UnknownNetwork);
        }
        let protocol = match addr.get(1..2) {
            Some("0") => Protocol::ID,
            Some("1") => Protocol::Secp256k1,
            Some("2") => Protocol::Actor,
            Some("3") => Protocol::BLS,
            Some("4") => Protocol::Delegated,
            _ => return Err(Error::UnknownProtocol),
        };
        let raw = &addr[2..];

        if protocol == Protocol::ID {
            let id = raw.parse::<u64>().map_err(|_| Error::InvalidPayload)?;
            return Ok(Address::new_id(id));
        }

        let decoded = ADDRESS_ENCODER
            .decode(raw.as_bytes())
            .map_err(|e| Error::Base32Decoding(e.to_string()))?;
        if decoded.len() < CHECKSUM_HASH_LEN {
            return Err(Error::InvalidLength);
        }
        let (payload, cksm) = decoded.split_at(decoded.len() - CHECKSUM_HASH_LEN);
        let addr = Address {
            payload: Payload::from_bytes(protocol, payload)?,
        };
        if !validate_checksum(&addr.to_bytes(), cksm.to_vec()) {
            return Err(Error::InvalidChecksum);
        }
        Ok(addr)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let bz = self.to_bytes();
        serde_bytes::Bytes::new(&bz).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bz: serde_bytes::ByteBuf = Deserialize::deserialize(deserializer)?;
        Address::from_bytes(&bz).map_err(de::Error::custom)
    }
}

impl encoding::Cbor for Address {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_byte_form() {
        let addr = Address::new_id(100);
        assert_eq!(addr.to_bytes(), vec![0, 100]);
        assert_eq!(Address::from_bytes(&addr.to_bytes()).unwrap(), addr);
        assert_eq!(addr.id().unwrap(), 100);
    }

    #[test]
    fn actor_address_deterministic() {
        let a = Address::new_actor(b"some seed");
        let b = Address::new_actor(b"some seed");
        assert_eq!(a, b);
        assert_eq!(a.protocol(), Protocol::Actor);
        assert_ne!(a, Address::new_actor(b"other seed"));
    }

    #[test]
    fn bls_round_trip() {
        let key = [7u8; BLS_PUB_LEN];
        let addr = Address::new_bls(&key).unwrap();
        let parsed = Address::from_bytes(&addr.to_bytes()).unwrap();
        assert_eq!(parsed, addr);
        assert!(Address::new_bls(&[0u8; 10]).is_err());
    }

    #[test]
    fn string_round_trip() {
        let addr = Address::new_actor(b"string form");
        let s = addr.to_string();
        assert_eq!(Address::from_str(&s).unwrap(), addr);

        let id = Address::new_id(1024);
        assert_eq!(id.to_string(), "f01024");
        assert_eq!(Address::from_str("f01024").unwrap(), id);
    }

    #[test]
    fn cbor_form_is_byte_string() {
        let addr = Address::new_id(1);
        let bz = serde_cbor::to_vec(&addr).unwrap();
        // Major type 2 (byte string), length 2.
        assert_eq!(bz, vec![0x42, 0, 1]);
        let back: Address = serde_cbor::from_slice(&bz).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn undef_has_no_byte_form() {
        let undef = Address::default();
        assert!(undef.is_undef());
        assert!(undef.to_bytes().is_empty());
        assert!(Address::from_bytes(&[]).is_err());
    }
}
