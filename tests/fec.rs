use aigscope::{Edge, GateId, GateKind, Netlist, NtkError, Stage};

/// Four AND gates 2..=5 over PIs 0 and 1, all consumed by PO 6.
fn chain() -> Netlist {
    let mut ntk = Netlist::new();
    let a = ntk.create_gate(GateKind::PrimaryInput, None).expect("a");
    let b = ntk.create_gate(GateKind::PrimaryInput, None).expect("b");
    let mut prev = a;
    for _ in 0..4 {
        let g = ntk.create_gate(GateKind::And, None).expect("and");
        ntk.set_fanin(g, 0, Edge::to(prev)).expect("fanin");
        ntk.set_fanin(g, 1, Edge::to(b)).expect("fanin");
        prev = g;
    }
    let po = ntk.create_gate(GateKind::PrimaryOutput, None).expect("po");
    ntk.set_fanin(po, 0, Edge::to(prev)).expect("fanin");
    ntk.finish_read().expect("read");
    ntk.mark_strashed().expect("strash");
    ntk
}

#[test]
fn pair_count_is_partition_size_minus_classes() {
    let mut ntk = chain();
    let partition = vec![
        vec![(GateId(2), false), (GateId(4), true)],
        vec![(GateId(3), false), (GateId(5), false)],
    ];
    ntk.ingest(&partition).expect("ingest");

    assert_eq!(ntk.stage(), Stage::Simulated);
    assert_eq!(ntk.num_classes().expect("classes"), 2);
    let pairs: Vec<_> = ntk.equiv_pairs().expect("pairs").collect();
    // 4 members - 2 classes
    assert_eq!(pairs.len(), 2);
    assert_eq!(
        pairs,
        vec![
            (GateId(2), GateId(4), true),
            (GateId(3), GateId(5), false)
        ]
    );
}

#[test]
fn reingesting_the_same_partition_is_idempotent() {
    let mut ntk = chain();
    let partition = vec![vec![(GateId(2), false), (GateId(3), false), (GateId(4), true)]];
    ntk.ingest(&partition).expect("first ingest");
    let first: Vec<_> = ntk.equiv_pairs().expect("pairs").collect();
    ntk.ingest(&partition).expect("second ingest");
    let second: Vec<_> = ntk.equiv_pairs().expect("pairs").collect();
    assert_eq!(first, second);
}

#[test]
fn class_lookup_reports_representative_and_polarity() {
    let mut ntk = chain();
    // listed out of order and relative to an inverted member
    let partition = vec![vec![(GateId(4), true), (GateId(2), false), (GateId(5), true)]];
    ntk.ingest(&partition).expect("ingest");

    assert_eq!(ntk.class_of(GateId(2)).expect("rep"), Some((GateId(2), false)));
    assert_eq!(ntk.class_of(GateId(4)).expect("member"), Some((GateId(2), true)));
    assert_eq!(ntk.class_of(GateId(5)).expect("member"), Some((GateId(2), true)));
    // implicit singleton
    assert_eq!(ntk.class_of(GateId(3)).expect("singleton"), None);
}

#[test]
fn failed_ingest_leaves_previous_partition_intact() {
    let mut ntk = chain();
    let good = vec![vec![(GateId(2), false), (GateId(3), false)]];
    ntk.ingest(&good).expect("ingest");

    let overlapping = vec![
        vec![(GateId(2), false), (GateId(4), false)],
        vec![(GateId(4), true), (GateId(5), false)],
    ];
    let err = ntk.ingest(&overlapping).expect_err("overlap");
    assert_eq!(err, NtkError::OverlappingClass(GateId(4)));

    let unknown = vec![vec![(GateId(2), false), (GateId(42), false)]];
    let err = ntk.ingest(&unknown).expect_err("unknown");
    assert_eq!(err, NtkError::UnknownGate(GateId(42)));

    let pairs: Vec<_> = ntk.equiv_pairs().expect("pairs").collect();
    assert_eq!(pairs, vec![(GateId(2), GateId(3), false)]);
}

#[test]
fn ingest_requires_the_strash_stage() {
    let mut ntk = Netlist::new();
    let g = ntk.create_gate(GateKind::And, None).expect("and");
    let h = ntk.create_gate(GateKind::And, None).expect("and");
    ntk.finish_read().expect("read");

    let partition = vec![vec![(g, false), (h, false)]];
    let err = ntk.ingest(&partition).expect_err("too early");
    assert_eq!(
        err,
        NtkError::NetlistNotReady {
            required: Stage::Strashed,
            current: Stage::Read
        }
    );

    ntk.mark_strashed().expect("strash");
    ntk.ingest(&partition).expect("ingest");
}

#[test]
fn structural_mutation_drops_stale_classes() {
    let mut ntk = chain();
    ntk.ingest(&[vec![(GateId(2), false), (GateId(3), false)]])
        .expect("ingest");
    assert_eq!(ntk.num_classes().expect("classes"), 1);

    ntk.delete_gate(GateId(6), false).expect("delete po");
    assert_eq!(ntk.num_classes().expect("classes"), 0);
    assert_eq!(ntk.class_of(GateId(2)).expect("lookup"), None);
}
