// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use actor::{
    account, chaos, init, system, ActorState, ACCOUNT_ACTOR_CODE_ID, ACCOUNT_ACTOR_CODE_ID_V2,
    CHAOS_ACTOR_CODE_ID, CHAOS_ACTOR_CODE_ID_V2, INIT_ACTOR_ADDR, INIT_ACTOR_CODE_ID,
    SYSTEM_ACTOR_ADDR, SYSTEM_ACTOR_CODE_ID,
};
use address::{Address, BLS_PUB_LEN};
use cid::{Cid, Code::Blake2b256};
use db::MemoryDB;
use interpreter::{Rand, VM};
use ipld_blockstore::BlockStore;
use message::UnsignedMessage;
use state_tree::StateTree;
use std::error::Error as StdError;
use vm::{
    ChainEpoch, DomainSeparationTag, ExitCode, MethodNum, NetworkVersion, Serialized, TokenAmount,
};

const GAS_LIMIT: i64 = 1_000_000_000;
const SENDER_BALANCE: u64 = 1_000_000_000_000;

struct TestRand;

impl Rand for TestRand {
    fn get_chain_randomness(
        &self,
        _: DomainSeparationTag,
        _: ChainEpoch,
        _: &[u8],
    ) -> Result<[u8; 32], Box<dyn StdError>> {
        Ok([8u8; 32])
    }
    fn get_beacon_randomness(
        &self,
        _: DomainSeparationTag,
        _: ChainEpoch,
        _: &[u8],
    ) -> Result<[u8; 32], Box<dyn StdError>> {
        Ok([9u8; 32])
    }
}

static RAND: TestRand = TestRand;

struct Harness {
    store: MemoryDB,
    root: Cid,
    sender_key: Address,
    sender_id: Address,
    chaos_id: Address,
}

fn sender_key_address() -> Address {
    Address::new_bls(&[7u8; BLS_PUB_LEN]).unwrap()
}

// Builds a genesis state with the system and init singletons, one funded
// account actor and one chaos actor.
fn setup() -> Harness {
    let store = MemoryDB::default();
    let sender_key = sender_key_address();
    let chaos_key = Address::new_actor(b"chaos");

    let (root, sender_id, chaos_id) = {
        let mut tree = StateTree::new(&store);

        let sys_head = store.put(&system::State::new(), Blake2b256).unwrap();
        tree.set_actor(
            &SYSTEM_ACTOR_ADDR,
            ActorState::new(*SYSTEM_ACTOR_CODE_ID, sys_head, TokenAmount::default(), 0),
        )
        .unwrap();

        let mut init_state = init::State::new(&store, "helios-test".to_owned()).unwrap();
        let sender_id = init_state
            .map_address_to_new_id(&store, &sender_key)
            .unwrap();
        let chaos_id = init_state.map_address_to_new_id(&store, &chaos_key).unwrap();
        let init_head = store.put(&init_state, Blake2b256).unwrap();
        tree.set_actor(
            &INIT_ACTOR_ADDR,
            ActorState::new(*INIT_ACTOR_CODE_ID, init_head, TokenAmount::default(), 0),
        )
        .unwrap();

        let acct_head = store
            .put(
                &account::State {
                    address: sender_key,
                },
                Blake2b256,
            )
            .unwrap();
        tree.set_actor(
            &sender_id,
            ActorState::new(
                *ACCOUNT_ACTOR_CODE_ID,
                acct_head,
                TokenAmount::from(SENDER_BALANCE),
                0,
            ),
        )
        .unwrap();

        let chaos_head = store.put(&chaos::State::default(), Blake2b256).unwrap();
        tree.set_actor(
            &chaos_id,
            ActorState::new(*CHAOS_ACTOR_CODE_ID, chaos_head, TokenAmount::default(), 0),
        )
        .unwrap();

        (tree.flush().unwrap(), sender_id, chaos_id)
    };

    Harness {
        store,
        root,
        sender_key,
        sender_id,
        chaos_id,
    }
}

fn message(h: &Harness, to: Address, method: MethodNum, params: Serialized, value: u64) -> UnsignedMessage {
    UnsignedMessage::builder()
        .from(h.sender_key)
        .to(to)
        .method_num(method)
        .params(params)
        .value(TokenAmount::from(value))
        .gas_limit(GAS_LIMIT)
        .build()
        .unwrap()
}

fn balance(store: &MemoryDB, root: &Cid, addr: &Address) -> TokenAmount {
    let tree = StateTree::new_from_root(store, root).unwrap();
    tree.get_actor(addr)
        .unwrap()
        .map(|a| a.balance)
        .unwrap_or_default()
}

fn execute(
    h: &Harness,
    nv: NetworkVersion,
    msg: &UnsignedMessage,
) -> (interpreter::ExecutionResult, Cid) {
    let mut vm = VM::new(&h.root, &h.store, 0, &RAND, move |_| nv).unwrap();
    let ret = vm.execute_message(msg).unwrap();
    let root = vm.flush().unwrap();
    (ret, root)
}

#[test]
fn value_transfer_with_sufficient_balance() {
    let h = setup();
    let msg = message(&h, *SYSTEM_ACTOR_ADDR, 0, Serialized::default(), 30);
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::Ok);
    assert!(ret.return_data.is_empty());
    assert!(ret.gas_used > 0);

    assert_eq!(
        balance(&h.store, &root, &h.sender_id),
        TokenAmount::from(SENDER_BALANCE - 30)
    );
    assert_eq!(
        balance(&h.store, &root, &SYSTEM_ACTOR_ADDR),
        TokenAmount::from(30u64)
    );

    // The runtime itself neither mints nor burns.
    let total = balance(&h.store, &root, &h.sender_id)
        + balance(&h.store, &root, &SYSTEM_ACTOR_ADDR)
        + balance(&h.store, &root, &h.chaos_id);
    assert_eq!(total, TokenAmount::from(SENDER_BALANCE));
}

#[test]
fn value_transfer_to_self_is_noop() {
    let h = setup();
    let msg = message(&h, h.sender_key, 0, Serialized::default(), 30);
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::Ok);
    assert_eq!(
        balance(&h.store, &root, &h.sender_id),
        TokenAmount::from(SENDER_BALANCE)
    );
}

#[test]
fn value_transfer_with_insufficient_balance() {
    let h = setup();
    let msg = message(
        &h,
        *SYSTEM_ACTOR_ADDR,
        0,
        Serialized::default(),
        SENDER_BALANCE + 1,
    );
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::SysErrInsufficientFunds);
    // Pre-state is fully restored.
    assert_eq!(root, h.root);
}

#[test]
fn implicit_account_creation_for_key_address() {
    let h = setup();
    let fresh_key = Address::new_bls(&[42u8; BLS_PUB_LEN]).unwrap();
    let msg = message(&h, fresh_key, 0, Serialized::default(), 1);
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::Ok);

    let tree = StateTree::new_from_root(&h.store, &root).unwrap();
    // Init actor assigned the next free ID.
    let id = tree.lookup_id(&fresh_key).unwrap().unwrap();
    assert_eq!(id, Address::new_id(102));

    // An account actor holding the transferred value now exists there,
    // constructed with the original key address.
    let act = tree.get_actor(&id).unwrap().unwrap();
    assert_eq!(act.code, *ACCOUNT_ACTOR_CODE_ID_V2);
    assert_eq!(act.balance, TokenAmount::from(1u8));
    let st: account::State = h.store.get(&act.state).unwrap().unwrap();
    assert_eq!(st.address, fresh_key);
}

#[test]
fn implicit_creation_rejected_for_non_key_address() {
    let h = setup();
    let fresh_actor_addr = Address::new_actor(b"never seen");
    let msg = message(&h, fresh_actor_addr, 0, Serialized::default(), 1);
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::SysErrInvalidReceiver);
    assert_eq!(root, h.root);
}

fn run_recursion(remaining: u64, nv: NetworkVersion) -> ExitCode {
    // Deep call chains are driven on a dedicated thread with a stack
    // large enough for the full recursion.
    std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(move || {
            let h = setup();
            let params =
                Serialized::serialize(&chaos::RecurseArgs { remaining }).unwrap();
            let msg = message(
                &h,
                h.chaos_id,
                chaos::Method::Recurse as MethodNum,
                params,
                0,
            );
            let (ret, _) = execute(&h, nv, &msg);
            ret.exit_code
        })
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn call_depth_bound_enforced_from_network_version_6() {
    assert_eq!(
        run_recursion(interpreter::MAX_CALL_DEPTH + 5, NetworkVersion::V6),
        ExitCode::SysErrForbidden
    );
}

#[test]
fn call_depth_unbounded_before_network_version_6() {
    assert_eq!(
        run_recursion(interpreter::MAX_CALL_DEPTH + 5, NetworkVersion::V5),
        ExitCode::Ok
    );
}

#[test]
fn missing_caller_validation_aborts() {
    let h = setup();
    let params = Serialized::serialize(&chaos::CALLER_VALIDATION_BRANCH_NONE).unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::CallerValidation as MethodNum,
        params,
        0,
    );
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::SysErrorIllegalActor);
    assert_eq!(root, h.root);
}

#[test]
fn double_caller_validation_aborts() {
    let h = setup();
    let params = Serialized::serialize(&chaos::CALLER_VALIDATION_BRANCH_TWICE).unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::CallerValidation as MethodNum,
        params,
        0,
    );
    let (ret, _) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::SysErrorIllegalActor);
}

#[test]
fn caller_validation_against_empty_sets_is_forbidden() {
    let h = setup();
    for branch in [
        chaos::CALLER_VALIDATION_BRANCH_ADDR_NIL_SET,
        chaos::CALLER_VALIDATION_BRANCH_TYPE_NIL_SET,
    ] {
        let params = Serialized::serialize(&branch).unwrap();
        let msg = message(
            &h,
            h.chaos_id,
            chaos::Method::CallerValidation as MethodNum,
            params,
            0,
        );
        let (ret, _) = execute(&h, NetworkVersion::V7, &msg);
        assert_eq!(ret.exit_code, ExitCode::SysErrForbidden);
    }
}

#[test]
fn gas_exhaustion_in_nested_send() {
    let h = setup();
    let params = Serialized::serialize(&chaos::RecurseArgs { remaining: 1 }).unwrap();
    let mut msg = message(
        &h,
        h.chaos_id,
        chaos::Method::Recurse as MethodNum,
        params,
        0,
    );
    // Enough for the parent's invocation charge but not the child's.
    msg.gas_limit = 25;

    let mut vm = VM::new(&h.root, &h.store, 0, &RAND, |_| NetworkVersion::V6).unwrap();
    let ret = vm.execute_message(&msg).unwrap();
    let root = vm.flush().unwrap();

    assert_eq!(ret.exit_code, ExitCode::SysErrOutOfGas);
    // Gas is fully consumed and nothing was persisted.
    assert_eq!(ret.gas_used, msg.gas_limit);
    assert_eq!(root, h.root);
}

#[test]
fn mutate_state_in_transaction_persists() {
    let h = setup();
    let params = Serialized::serialize(&chaos::MutateStateArgs {
        value: "in transaction".to_owned(),
        branch: chaos::MUTATE_IN_TRANSACTION,
    })
    .unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::MutateState as MethodNum,
        params,
        0,
    );
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::Ok);
    let tree = StateTree::new_from_root(&h.store, &root).unwrap();
    let act = tree.get_actor(&h.chaos_id).unwrap().unwrap();
    let st: chaos::State = h.store.get(&act.state).unwrap().unwrap();
    assert_eq!(st.value, "in transaction");
}

#[test]
fn send_during_transaction_violates_side_effect_lock() {
    let h = setup();
    let params = Serialized::serialize(&chaos::MutateStateArgs {
        value: "locked".to_owned(),
        branch: chaos::MUTATE_SEND_IN_TRANSACTION,
    })
    .unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::MutateState as MethodNum,
        params,
        0,
    );
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::SysErrorIllegalActor);
    // The aborted mutation never reached the state tree.
    assert_eq!(root, h.root);
}

#[test]
fn delete_actor_pays_out_beneficiary() {
    let h = setup();

    // Fund the chaos actor first.
    let fund = message(&h, h.chaos_id, 0, Serialized::default(), 77);
    let mut vm = VM::new(&h.root, &h.store, 0, &RAND, |_| NetworkVersion::V7).unwrap();
    assert_eq!(
        vm.execute_message(&fund).unwrap().exit_code,
        ExitCode::Ok
    );

    let params = Serialized::serialize(&h.sender_id).unwrap();
    let mut del = message(
        &h,
        h.chaos_id,
        chaos::Method::DeleteActor as MethodNum,
        params,
        0,
    );
    del.sequence = 1;
    assert_eq!(
        vm.execute_message(&del).unwrap().exit_code,
        ExitCode::Ok
    );
    let root = vm.flush().unwrap();

    let tree = StateTree::new_from_root(&h.store, &root).unwrap();
    assert_eq!(tree.get_actor(&h.chaos_id).unwrap(), None);
    assert_eq!(
        balance(&h.store, &root, &h.sender_id),
        TokenAmount::from(SENDER_BALANCE)
    );
}

#[test]
fn delete_actor_rejects_self_beneficiary_from_version_7() {
    let h = setup();

    let fund = message(&h, h.chaos_id, 0, Serialized::default(), 77);
    let mut vm = VM::new(&h.root, &h.store, 0, &RAND, |_| NetworkVersion::V7).unwrap();
    assert_eq!(vm.execute_message(&fund).unwrap().exit_code, ExitCode::Ok);

    let params = Serialized::serialize(&h.chaos_id).unwrap();
    let mut del = message(
        &h,
        h.chaos_id,
        chaos::Method::DeleteActor as MethodNum,
        params,
        0,
    );
    del.sequence = 1;
    assert_eq!(
        vm.execute_message(&del).unwrap().exit_code,
        ExitCode::SysErrorIllegalArgument
    );
}

#[test]
fn abort_with_controlled_exit_code() {
    let h = setup();
    let params = Serialized::serialize(&chaos::AbortWithArgs {
        code: ExitCode::ErrIllegalState,
        message: "aborted deliberately".to_owned(),
        uncontrolled: false,
    })
    .unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::AbortWith as MethodNum,
        params,
        0,
    );
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::ErrIllegalState);
    assert_eq!(root, h.root);
}

#[test]
fn uncontrolled_abort_escalates_as_fatal() {
    let h = setup();
    let params = Serialized::serialize(&chaos::AbortWithArgs {
        code: ExitCode::Ok,
        message: "storage corrupted".to_owned(),
        uncontrolled: true,
    })
    .unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::AbortWith as MethodNum,
        params,
        0,
    );

    let mut vm = VM::new(&h.root, &h.store, 0, &RAND, |_| NetworkVersion::V7).unwrap();
    assert!(vm.execute_message(&msg).is_err());
}

#[test]
fn unknown_method_number_is_invalid() {
    let h = setup();
    let msg = message(&h, h.chaos_id, 99, Serialized::default(), 0);
    let (ret, _) = execute(&h, NetworkVersion::V7, &msg);
    assert_eq!(ret.exit_code, ExitCode::SysErrInvalidMethod);
}

#[test]
fn param_decode_failure_code_depends_on_network_version() {
    let h = setup();
    let garbage = Serialized::new(vec![0xff, 0xff, 0xff]);

    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::MutateState as MethodNum,
        garbage.clone(),
        0,
    );
    let (ret, _) = execute(&h, NetworkVersion::V7, &msg);
    assert_eq!(ret.exit_code, ExitCode::ErrSerialization);

    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::MutateState as MethodNum,
        garbage,
        0,
    );
    let (ret, _) = execute(&h, NetworkVersion::V6, &msg);
    assert_eq!(ret.exit_code, ExitCode::SysErrSenderInvalid);
}

#[test]
fn exec_through_init_actor_creates_and_constructs() {
    let h = setup();
    let params = Serialized::serialize(&init::ExecParams {
        code_cid: *CHAOS_ACTOR_CODE_ID_V2,
        constructor_params: Serialized::default(),
    })
    .unwrap();
    let msg = message(
        &h,
        *INIT_ACTOR_ADDR,
        init::Method::Exec as MethodNum,
        params,
        5,
    );
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::Ok);
    let exec_ret: init::ExecReturn = ret.return_data.deserialize().unwrap();
    assert_eq!(exec_ret.id_address, Address::new_id(102));

    let tree = StateTree::new_from_root(&h.store, &root).unwrap();
    // The robust address resolves to the assigned ID.
    assert_eq!(
        tree.lookup_id(&exec_ret.robust_address).unwrap(),
        Some(exec_ret.id_address)
    );
    // The constructor ran and received the attached value.
    let act = tree.get_actor(&exec_ret.id_address).unwrap().unwrap();
    assert_eq!(act.code, *CHAOS_ACTOR_CODE_ID_V2);
    assert_eq!(act.balance, TokenAmount::from(5u8));
    let st: chaos::State = h.store.get(&act.state).unwrap().unwrap();
    assert_eq!(st.value, "");

    // Value moved through init into the new actor, not into init itself.
    assert_eq!(
        balance(&h.store, &root, &INIT_ACTOR_ADDR),
        TokenAmount::default()
    );
}

#[test]
fn exec_rejects_singleton_codes() {
    let h = setup();
    let params = Serialized::serialize(&init::ExecParams {
        code_cid: *INIT_ACTOR_CODE_ID,
        constructor_params: Serialized::default(),
    })
    .unwrap();
    let msg = message(
        &h,
        *INIT_ACTOR_ADDR,
        init::Method::Exec as MethodNum,
        params,
        0,
    );
    let (ret, _) = execute(&h, NetworkVersion::V7, &msg);
    assert_eq!(ret.exit_code, ExitCode::ErrForbidden);
}

#[test]
fn nested_send_reflects_child_exit_code_to_parent() {
    let h = setup();
    // The chaos actor sends to itself with an unknown method; the child
    // aborts but the parent observes the code and completes normally.
    let inner_args = chaos::SendArgs {
        to: h.chaos_id,
        value: TokenAmount::default(),
        method: 99,
        params: Serialized::default(),
    };
    let params = Serialized::serialize(&inner_args).unwrap();
    let msg = message(&h, h.chaos_id, chaos::Method::Send as MethodNum, params, 0);
    let (ret, _) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::Ok);
    let send_ret: chaos::SendReturn = ret.return_data.deserialize().unwrap();
    assert_eq!(send_ret.code, ExitCode::SysErrInvalidMethod);
}

#[test]
fn resolve_address_through_runtime() {
    let h = setup();

    let params = Serialized::serialize(&h.sender_key).unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::ResolveAddress as MethodNum,
        params,
        0,
    );
    let (ret, _) = execute(&h, NetworkVersion::V7, &msg);
    assert_eq!(ret.exit_code, ExitCode::Ok);
    let res: chaos::ResolveAddressResponse = ret.return_data.deserialize().unwrap();
    assert!(res.success);
    assert_eq!(res.address, h.sender_id);

    let unknown = Address::new_actor(b"unregistered");
    let params = Serialized::serialize(&unknown).unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::ResolveAddress as MethodNum,
        params,
        0,
    );
    let (ret, _) = execute(&h, NetworkVersion::V7, &msg);
    assert_eq!(ret.exit_code, ExitCode::Ok);
    let res: chaos::ResolveAddressResponse = ret.return_data.deserialize().unwrap();
    assert!(!res.success);
}

#[test]
fn create_actor_rejects_occupied_address() {
    let h = setup();
    let params = Serialized::serialize(&chaos::CreateActorArgs {
        undef_cid: false,
        cid: *ACCOUNT_ACTOR_CODE_ID_V2,
        undef_address: false,
        address: h.sender_id,
    })
    .unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::CreateActor as MethodNum,
        params,
        0,
    );
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::SysErrorIllegalArgument);
    assert_eq!(root, h.root);
}

#[test]
fn create_actor_rejects_undef_address_from_version_7() {
    let h = setup();
    let params = Serialized::serialize(&chaos::CreateActorArgs {
        undef_cid: false,
        cid: *ACCOUNT_ACTOR_CODE_ID_V2,
        undef_address: true,
        address: h.sender_id,
    })
    .unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::CreateActor as MethodNum,
        params,
        0,
    );
    let (ret, _) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::SysErrorIllegalArgument);
}

#[test]
fn create_actor_installs_fresh_record() {
    let h = setup();
    let fresh = Address::new_id(999);
    let params = Serialized::serialize(&chaos::CreateActorArgs {
        undef_cid: false,
        cid: *ACCOUNT_ACTOR_CODE_ID_V2,
        undef_address: false,
        address: fresh,
    })
    .unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::CreateActor as MethodNum,
        params,
        0,
    );
    let (ret, root) = execute(&h, NetworkVersion::V7, &msg);

    assert_eq!(ret.exit_code, ExitCode::Ok);
    let tree = StateTree::new_from_root(&h.store, &root).unwrap();
    let act = tree.get_actor(&fresh).unwrap().unwrap();
    assert_eq!(act.code, *ACCOUNT_ACTOR_CODE_ID_V2);
    assert_eq!(act.balance, TokenAmount::default());
    assert_eq!(act.delegated_address, Some(fresh));
}

#[test]
fn gas_used_is_monotone_across_messages() {
    let h = setup();
    let msg = message(&h, *SYSTEM_ACTOR_ADDR, 0, Serialized::default(), 1);
    let (small, _) = execute(&h, NetworkVersion::V7, &msg);

    let params = Serialized::serialize(&chaos::MutateStateArgs {
        value: "gas probe".to_owned(),
        branch: chaos::MUTATE_IN_TRANSACTION,
    })
    .unwrap();
    let msg = message(
        &h,
        h.chaos_id,
        chaos::Method::MutateState as MethodNum,
        params,
        0,
    );
    let (larger, _) = execute(&h, NetworkVersion::V7, &msg);

    assert!(small.gas_used > 0);
    // A method invocation with state I/O costs more than a bare transfer.
    assert!(larger.gas_used > small.gas_used);
    assert!(larger.gas_used <= GAS_LIMIT);
}
