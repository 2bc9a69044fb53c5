// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod mh_code;

pub use self::mh_code::Code;
pub use cid::{Cid, Error, Version};
pub use multihash;
use multihash::MultihashDigest;

/// Multicodec identifier for CBOR objects encoded in canonical form.
pub const DAG_CBOR: u64 = 0x71;

/// Multicodec identifier for raw (unstructured) bytes.
pub const RAW: u64 = 0x55;

/// Constructs a cid with bytes using default version and codec
pub fn new_from_cbor(bz: &[u8], code: Code) -> Cid {
    let hash = code.digest(bz);
    Cid::new_v1(DAG_CBOR, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbor_cids_deterministic() {
        let c1 = new_from_cbor(&[0x80], Code::Blake2b256);
        let c2 = new_from_cbor(&[0x80], Code::Blake2b256);
        assert_eq!(c1, c2);
        assert_ne!(c1, new_from_cbor(&[0x81], Code::Blake2b256));
    }

    #[test]
    fn serde_round_trip() {
        let cid = new_from_cbor(b"data", Code::Blake2b256);
        let bz = serde_cbor::to_vec(&cid).unwrap();
        let back: Cid = serde_cbor::from_slice(&bz).unwrap();
        assert_eq!(back, cid);
    }

    #[test]
    fn identity_cid_embeds_input() {
        let cid = Cid::new_v1(RAW, Code::Identity.digest(b"fil/1/system"));
        assert_eq!(cid.hash().digest(), b"fil/1/system");
    }
}
