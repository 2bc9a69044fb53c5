// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod gas_block_store;
mod gas_tracker;
mod invocation;
mod rand;
mod vm;

pub use self::gas_tracker::{price_list_by_network_version, GasCharge, GasTracker, PriceList};
pub use self::invocation::{InvocationContext, MAX_CALL_DEPTH};
pub use self::rand::Rand;
pub use self::vm::{resolve_to_key_addr, ExecutionResult, VM};
