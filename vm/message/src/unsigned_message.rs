// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::Message;
use address::Address;
use derive_builder::Builder;
use encoding::tuple::*;
use encoding::Cbor;
use vm::{bigint_ser, MethodNum, Serialized, TokenAmount};

/// Default Unsigned VM message type which includes all data needed for a state transition.
///
/// Usage:
/// ```
/// use message::{UnsignedMessage, Message};
/// use vm::{TokenAmount, Serialized};
/// use address::Address;
///
/// // Use the builder pattern to generate a message
/// let message = UnsignedMessage::builder()
///     .to(Address::new_id(0))
///     .from(Address::new_id(1))
///     .sequence(0) // optional
///     .value(TokenAmount::from(0u8)) // optional
///     .method_num(0) // optional
///     .params(Serialized::default()) // optional
///     .gas_limit(0) // optional
///     .build()
///     .unwrap();
/// assert_eq!(message.sequence(), 0);
/// ```
#[derive(PartialEq, Clone, Debug, Builder, Serialize_tuple, Deserialize_tuple)]
#[builder(name = "MessageBuilder")]
pub struct UnsignedMessage {
    #[builder(default)]
    pub version: i64,
    pub to: Address,
    pub from: Address,
    #[builder(default)]
    pub sequence: u64,
    #[builder(default)]
    #[serde(with = "bigint_ser")]
    pub value: TokenAmount,
    #[builder(default)]
    pub gas_limit: i64,
    #[builder(default)]
    #[serde(with = "bigint_ser")]
    pub gas_fee_cap: TokenAmount,
    #[builder(default)]
    #[serde(with = "bigint_ser")]
    pub gas_premium: TokenAmount,
    #[builder(default)]
    pub method_num: MethodNum,
    #[builder(default)]
    pub params: Serialized,
}

impl UnsignedMessage {
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }
}

impl Message for UnsignedMessage {
    fn from(&self) -> &Address {
        &self.from
    }
    fn to(&self) -> &Address {
        &self.to
    }
    fn sequence(&self) -> u64 {
        self.sequence
    }
    fn value(&self) -> &TokenAmount {
        &self.value
    }
    fn method_num(&self) -> MethodNum {
        self.method_num
    }
    fn params(&self) -> &Serialized {
        &self.params
    }
    fn gas_limit(&self) -> i64 {
        self.gas_limit
    }
    fn gas_fee_cap(&self) -> &TokenAmount {
        &self.gas_fee_cap
    }
    fn gas_premium(&self) -> &TokenAmount {
        &self.gas_premium
    }
}

impl Cbor for UnsignedMessage {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let message = UnsignedMessage::builder()
            .to(Address::new_id(1))
            .from(Address::new_id(2))
            .build()
            .unwrap();
        assert_eq!(message.sequence(), 0);
        assert_eq!(message.method_num(), 0);
        assert!(message.params().is_empty());
        // Missing required field fails the build.
        assert!(UnsignedMessage::builder().to(Address::new_id(1)).build().is_err());
    }

    #[test]
    fn cbor_round_trip() {
        let message = UnsignedMessage::builder()
            .to(Address::new_id(1))
            .from(Address::new_id(2))
            .sequence(9)
            .value(TokenAmount::from(1_000u64))
            .method_num(3)
            .gas_limit(1 << 20)
            .build()
            .unwrap();
        let bz = message.marshal_cbor().unwrap();
        let back = UnsignedMessage::unmarshal_cbor(&bz).unwrap();
        assert_eq!(back, message);
    }
}
