// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::util::unmarshallable::UnmarshallableCBOR;
use encoding::tuple::*;

/// Chaos actor state, a plain value cell plus a slot that can be made to
/// fail serialization.
#[derive(Serialize_tuple, Deserialize_tuple, Default)]
pub struct State {
    pub value: String,
    pub unmarshallable: Vec<UnmarshallableCBOR>,
}

impl encoding::Cbor for State {}
