use aigscope::{Edge, GateId, GateKind, Netlist, NtkError};

#[test]
fn created_gates_stay_stable_until_mutated() {
    let mut ntk = Netlist::new();
    let a = ntk
        .create_gate(GateKind::PrimaryInput, Some("a".to_owned()))
        .expect("create a");
    let b = ntk.create_gate(GateKind::And, None).expect("create b");

    assert_eq!(a, GateId(0));
    assert_eq!(b, GateId(1));

    let gate = ntk.gate(a).expect("lookup a");
    assert_eq!(gate.kind, GateKind::PrimaryInput);
    assert_eq!(gate.name.as_deref(), Some("a"));
    assert_eq!(gate.fanin().count(), 0);

    ntk.set_fanin(b, 0, Edge::to(a)).expect("fanin");
    let gate = ntk.gate(b).expect("lookup b");
    assert_eq!(gate.fanin_slot(0), Some(Edge::to(a)));
    assert_eq!(gate.fanin_slot(1), None);
}

#[test]
fn lookup_miss_is_none_not_error() {
    let ntk = Netlist::new();
    assert!(ntk.gate(GateId(7)).is_none());
}

#[test]
fn set_fanin_on_unknown_gate_errors_without_side_effects() {
    let mut ntk = Netlist::new();
    let err = ntk
        .set_fanin(GateId(3), 0, Edge::to(GateId(9)))
        .expect_err("unknown source");
    assert_eq!(err, NtkError::UnknownGate(GateId(3)));
    // the failed call must not have planted a placeholder for the target
    assert!(ntk.gate(GateId(9)).is_none());
}

#[test]
fn slot_must_fit_the_gate_kind() {
    let mut ntk = Netlist::new();
    let pi = ntk.create_gate(GateKind::PrimaryInput, None).expect("pi");
    let po = ntk.create_gate(GateKind::PrimaryOutput, None).expect("po");
    let and = ntk.create_gate(GateKind::And, None).expect("and");

    let err = ntk.set_fanin(pi, 0, Edge::to(and)).expect_err("pi fanin");
    assert_eq!(
        err,
        NtkError::SlotOutOfRange {
            id: pi,
            kind: GateKind::PrimaryInput,
            slot: 0
        }
    );

    let err = ntk.set_fanin(po, 1, Edge::to(and)).expect_err("po slot 1");
    assert_eq!(
        err,
        NtkError::SlotOutOfRange {
            id: po,
            kind: GateKind::PrimaryOutput,
            slot: 1
        }
    );

    ntk.set_fanin(po, 0, Edge::to(and)).expect("po slot 0");
    ntk.set_fanin(and, 1, Edge::to(pi)).expect("and slot 1");
}

#[test]
fn delete_refuses_while_referenced() {
    let mut ntk = Netlist::new();
    let a = ntk.create_gate(GateKind::PrimaryInput, None).expect("a");
    let g = ntk.create_gate(GateKind::And, None).expect("g");
    let po = ntk.create_gate(GateKind::PrimaryOutput, None).expect("po");
    ntk.set_fanin(g, 0, Edge::to(a)).expect("fanin");
    ntk.set_fanin(po, 0, Edge::to(g)).expect("fanin");

    let err = ntk.delete_gate(g, false).expect_err("in use");
    assert_eq!(err, NtkError::GateInUse { id: g, fanout: 1 });
    assert!(ntk.gate(g).is_some());

    // force mode is for passes that rewire dependents themselves
    ntk.delete_gate(g, true).expect("force delete");
    assert!(ntk.gate(g).is_none());
}

#[test]
fn ids_are_not_reissued_after_deletion() {
    let mut ntk = Netlist::new();
    let a = ntk.create_gate(GateKind::And, None).expect("a");
    ntk.delete_gate(a, false).expect("delete");
    let b = ntk.create_gate(GateKind::And, None).expect("b");
    assert_ne!(a, b);
    assert_eq!(b, GateId(1));
}

#[test]
fn define_gate_rejects_redefinition() {
    let mut ntk = Netlist::new();
    ntk.define_gate(GateId(4), GateKind::PrimaryInput, None)
        .expect("define");
    let err = ntk
        .define_gate(GateId(4), GateKind::And, None)
        .expect_err("redefine");
    assert_eq!(err, NtkError::DuplicateGate(GateId(4)));

    // fresh ids continue past explicit definitions
    let next = ntk.create_gate(GateKind::And, None).expect("create");
    assert_eq!(next, GateId(5));
}
