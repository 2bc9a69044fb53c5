// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::GasCharge;
use num_traits::Zero;
use vm::{MethodNum, NetworkVersion, TokenAmount, METHOD_SEND};

/// Provides prices for operations in the VM.
#[derive(Clone, Copy, Debug)]
pub struct PriceList {
    /// Gas cost charged to the originator of an on-chain message (regardless of
    /// whether it succeeds or fails in application) is given by:
    ///   OnChainMessageBase + len(serialized message) * OnChainMessagePerByte
    pub on_chain_message_base: i64,
    pub on_chain_message_per_byte: i64,

    /// Gas cost charged to the originator of a non-nil return value produced
    /// by an on-chain message is given by:
    ///   len(return value) * OnChainReturnValuePerByte
    pub on_chain_return_value_per_byte: i64,

    /// Gas cost for any message send execution(including the top-level one
    /// initiated by an on-chain message).
    /// This accounts for the cost of loading sender and receiver actors and
    /// (for top-level messages) incrementing the sender's sequence number.
    /// Load and store of actor sub-state is charged separately.
    pub send_base: i64,

    /// Gas cost charged, in addition to SendBase, if a message send
    /// is accompanied by any nonzero currency amount.
    /// Accounts for writing receiver's new balance (the sender's state is
    /// already accounted for).
    pub send_transfer_funds: i64,

    /// Gas cost charged, in addition to SendBase, if a message invokes
    /// a method on the receiver.
    /// Accounts for the cost of loading receiver code and method dispatch.
    pub send_invoke_method: i64,

    /// Gas cost for any IPLD store read, independent of the object size.
    pub ipld_get_base: i64,

    /// Gas cost (Base + len*PerByte) for any IPLD store write.
    pub ipld_put_base: i64,
    pub ipld_put_per_byte: i64,

    /// Gas cost for creating a new actor (via InitActor's Exec method) or
    /// implicitly through the first send to a public key address.
    pub create_actor_compute: i64,
    pub create_actor_storage: i64,

    /// Gas cost for deleting an actor, refunding the storage it returns.
    pub delete_actor: i64,

    /// Gas cost for verifying a signature over a plaintext.
    pub verify_signature_base: i64,
    pub verify_signature_per_byte: i64,

    /// Gas cost for hashing a plaintext with the chain hash function.
    pub hashing_base: i64,
    pub hashing_per_byte: i64,
}

impl PriceList {
    /// Returns the gas required for storing a message of a given size in the chain.
    #[inline]
    pub fn on_chain_message(&self, msg_size: usize) -> GasCharge {
        GasCharge::new(
            "OnChainMessage",
            self.on_chain_message_base,
            self.on_chain_message_per_byte * msg_size as i64,
        )
    }

    /// Returns the gas required for storing the response of a message in the chain.
    #[inline]
    pub fn on_chain_return_value(&self, data_size: usize) -> GasCharge {
        GasCharge::new(
            "OnChainReturnValue",
            0,
            data_size as i64 * self.on_chain_return_value_per_byte,
        )
    }

    /// Returns the gas required when invoking a method.
    #[inline]
    pub fn on_method_invocation(&self, value: &TokenAmount, method_num: MethodNum) -> GasCharge {
        let mut ret = self.send_base;
        if !value.is_zero() {
            ret += self.send_transfer_funds;
        }
        if method_num != METHOD_SEND {
            ret += self.send_invoke_method;
        }
        GasCharge::new("OnMethodInvocation", ret, 0)
    }

    /// Returns the gas required for storing an object.
    #[inline]
    pub fn on_ipld_get(&self) -> GasCharge {
        GasCharge::new("OnIpldGet", self.ipld_get_base, 0)
    }

    /// Returns the gas required for storing an object.
    #[inline]
    pub fn on_ipld_put(&self, data_size: usize) -> GasCharge {
        GasCharge::new(
            "OnIpldPut",
            self.ipld_put_base,
            data_size as i64 * self.ipld_put_per_byte,
        )
    }

    /// Returns the gas required for creating an actor.
    #[inline]
    pub fn on_create_actor(&self) -> GasCharge {
        GasCharge::new(
            "OnCreateActor",
            self.create_actor_compute,
            self.create_actor_storage,
        )
    }

    /// Returns the gas required for deleting an actor.
    #[inline]
    pub fn on_delete_actor(&self) -> GasCharge {
        GasCharge::new("OnDeleteActor", 0, self.delete_actor)
    }

    /// Zero-cost bookkeeping charge recorded after an inter-actor operation.
    #[inline]
    pub fn on_actor_exec(&self) -> GasCharge {
        GasCharge::new("OnActorExec", 0, 0)
    }

    /// Returns gas required for signature verification.
    #[inline]
    pub fn on_verify_signature(&self, plaintext_size: usize) -> GasCharge {
        GasCharge::new(
            "OnVerifySignature",
            self.verify_signature_base + plaintext_size as i64 * self.verify_signature_per_byte,
            0,
        )
    }

    /// Returns gas required for hashing data.
    #[inline]
    pub fn on_hashing(&self, data_size: usize) -> GasCharge {
        GasCharge::new(
            "OnHashing",
            self.hashing_base + data_size as i64 * self.hashing_per_byte,
            0,
        )
    }
}

const BASE_PRICES: PriceList = PriceList {
    on_chain_message_base: 0,
    on_chain_message_per_byte: 2,
    on_chain_return_value_per_byte: 8,
    send_base: 5,
    send_transfer_funds: 5,
    send_invoke_method: 10,
    ipld_get_base: 10,
    ipld_put_base: 20,
    ipld_put_per_byte: 2,
    create_actor_compute: 40,
    create_actor_storage: 500,
    delete_actor: -500,
    verify_signature_base: 2,
    verify_signature_per_byte: 3,
    hashing_base: 5,
    hashing_per_byte: 2,
};

const CALICO_PRICES: PriceList = PriceList {
    on_chain_message_base: 38863,
    on_chain_message_per_byte: 36,
    on_chain_return_value_per_byte: 36,
    send_base: 29233,
    send_transfer_funds: 27500,
    send_invoke_method: -5377,
    ipld_get_base: 114617,
    ipld_put_base: 353640,
    ipld_put_per_byte: 1,
    create_actor_compute: 1108454,
    create_actor_storage: 36 + 40,
    delete_actor: -(36 + 40),
    verify_signature_base: 1637292,
    verify_signature_per_byte: 10,
    hashing_base: 31355,
    hashing_per_byte: 0,
};

/// Returns gas price list by network version for gas consumption.
pub fn price_list_by_network_version(nv: NetworkVersion) -> PriceList {
    if nv < NetworkVersion::V7 {
        BASE_PRICES
    } else {
        CALICO_PRICES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_invocation_pricing() {
        let pl = price_list_by_network_version(NetworkVersion::V0);
        let transfer_only = pl.on_method_invocation(&TokenAmount::from(1u8), METHOD_SEND);
        assert_eq!(transfer_only.total(), pl.send_base + pl.send_transfer_funds);

        let invoke_only = pl.on_method_invocation(&TokenAmount::default(), 2);
        assert_eq!(invoke_only.total(), pl.send_base + pl.send_invoke_method);
    }

    #[test]
    fn list_selection_by_version() {
        assert_eq!(
            price_list_by_network_version(NetworkVersion::V6).send_base,
            BASE_PRICES.send_base
        );
        assert_eq!(
            price_list_by_network_version(NetworkVersion::V7).send_base,
            CALICO_PRICES.send_base
        );
    }
}
