// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn second_operation_is_rejected_while_the_first_runs() {
    let gate = OperationGate::new();
    let _guard = gate.enter("teardown").unwrap();

    let err = gate.enter("remove svc").unwrap_err();

    assert_eq!(err, GateError::Busy { active: "teardown".to_string() });
    assert_eq!(err.to_string(), "another operation is in progress: teardown");
    assert_eq!(gate.active().as_deref(), Some("teardown"));
}

#[test]
fn dropping_the_guard_reopens_the_gate() {
    let gate = OperationGate::new();
    drop(gate.enter("teardown").unwrap());

    assert_eq!(gate.active(), None);
    assert!(gate.enter("remove svc").is_ok());
}

#[test]
fn clones_share_one_gate() {
    let gate = OperationGate::new();
    let other = gate.clone();
    let guard = gate.enter("teardown").unwrap();

    assert!(other.enter("teardown").is_err());
    drop(guard);
    assert!(other.enter("teardown").is_ok());
}
