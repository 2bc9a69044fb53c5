// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use num_bigint::BigInt;

/// Token type to be used within the VM.
pub type TokenAmount = BigInt;

/// Serde module for the canonical chain encoding of big integers: a byte
/// string holding a sign prefix (0 positive, 1 negative) followed by the
/// big-endian magnitude. Zero encodes as the empty byte string.
pub mod bigint_ser {
    use num_bigint::{BigInt, Sign};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    /// Wrapper for serializing big ints to match the chain serialization.
    #[derive(Serialize)]
    #[serde(transparent)]
    pub struct BigIntSer<'a>(#[serde(with = "self")] pub &'a BigInt);

    /// Wrapper for deserializing as BigInt from bytes.
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct BigIntDe(#[serde(with = "self")] pub BigInt);

    pub fn serialize<S>(int: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (sign, mut bz) = int.to_bytes_be();

        match sign {
            Sign::Plus => bz.insert(0, 0),
            Sign::Minus => bz.insert(0, 1),
            Sign::NoSign => bz = Vec::new(),
        }

        serde_bytes::Bytes::new(&bz).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bz: serde_bytes::ByteBuf = Deserialize::deserialize(deserializer)?;
        if bz.is_empty() {
            return Ok(BigInt::default());
        }
        let sign_byte = bz[0];
        let sign: Sign = match sign_byte {
            1 => Sign::Minus,
            0 => Sign::Plus,
            _ => {
                return Err(de::Error::custom(
                    "First byte must be valid sign (0, 1)".to_string(),
                ));
            }
        };
        Ok(BigInt::from_bytes_be(sign, &bz[1..]))
    }

}
