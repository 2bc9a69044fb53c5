// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod message_receipt;
mod unsigned_message;

pub use message_receipt::MessageReceipt;
pub use unsigned_message::UnsignedMessage;

use address::Address;
use vm::{MethodNum, Serialized, TokenAmount};

/// Message interface to interact with a sign and unsigned state transition.
pub trait Message {
    /// Returns the from address of the message.
    fn from(&self) -> &Address;
    /// Returns the destination address of the message.
    fn to(&self) -> &Address;
    /// Returns the message sequence or nonce.
    fn sequence(&self) -> u64;
    /// Returns the amount sent in message.
    fn value(&self) -> &TokenAmount;
    /// Returns the method number to be called.
    fn method_num(&self) -> MethodNum;
    /// Returns the encoded parameters for the method call.
    fn params(&self) -> &Serialized;
    /// Returns the gas limit for the message.
    fn gas_limit(&self) -> i64;
    /// Returns the max price for a unit of gas the sender will pay.
    fn gas_fee_cap(&self) -> &TokenAmount;
    /// Returns the portion of the gas fee directed to the block producer.
    fn gas_premium(&self) -> &TokenAmount;
}
