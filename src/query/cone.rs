use std::collections::HashSet;

use crate::error::{NtkError, Result};
use crate::ntk::gate::GateId;
use crate::ntk::table::GateTable;

/// Depth sentinel: walk the whole reachable DAG.
pub const UNBOUNDED: i32 = i32::MAX;

/// One reported gate in a cone walk.
///
/// `inverted` is the polarity of the edge traversed to reach the gate and
/// `depth` the frontier it was reached on; both are recorded at first
/// visit. A `revisit` entry marks a reconvergent path: the edge is
/// reported but the gate is not expanded again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConeEntry {
    pub gate: GateId,
    pub inverted: bool,
    pub depth: u32,
    pub revisit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConeReport {
    pub root: GateId,
    pub entries: Vec<ConeEntry>,
}

impl ConeReport {
    /// Distinct gates visited, root excluded.
    pub fn visited(&self) -> impl Iterator<Item = GateId> + '_ {
        self.entries.iter().filter(|e| !e.revisit).map(|e| e.gate)
    }
}

enum Direction {
    Fanin,
    Fanout,
}

/// Gates that transitively drive `root`, breadth first, out to `depth`
/// frontiers. Immediate fanins sit at depth 1; depth 0 reports only the
/// root. Siblings follow fanin slot order.
pub fn fanin_cone(table: &GateTable, root: GateId, depth: i32) -> Result<ConeReport> {
    walk(table, root, depth, Direction::Fanin)
}

/// Gates transitively driven by `root`. Siblings at the same depth come
/// back in ascending id order, since fanout has no intrinsic slot order.
pub fn fanout_cone(table: &GateTable, root: GateId, depth: i32) -> Result<ConeReport> {
    walk(table, root, depth, Direction::Fanout)
}

fn walk(table: &GateTable, root: GateId, depth: i32, dir: Direction) -> Result<ConeReport> {
    if depth < 0 {
        return Err(NtkError::NegativeDepth(depth));
    }
    if table.gate(root).is_none() {
        return Err(NtkError::UnknownGate(root));
    }

    // Visit marks are scoped to this call, so concurrent walks over the
    // same snapshot cannot interfere.
    let mut seen: HashSet<GateId> = HashSet::new();
    seen.insert(root);
    let mut frontier = vec![root];
    let mut entries = Vec::new();
    let mut d: u32 = 0;

    while !frontier.is_empty() && (i64::from(d)) < i64::from(depth) {
        d += 1;
        let mut next = Vec::new();
        for &id in &frontier {
            for (target, inverted) in neighbors(table, id, &dir) {
                let revisit = seen.contains(&target);
                entries.push(ConeEntry {
                    gate: target,
                    inverted,
                    depth: d,
                    revisit,
                });
                if !revisit {
                    seen.insert(target);
                    next.push(target);
                }
            }
        }
        frontier = next;
    }

    Ok(ConeReport { root, entries })
}

fn neighbors(table: &GateTable, id: GateId, dir: &Direction) -> Vec<(GateId, bool)> {
    let Some(gate) = table.gate(id) else {
        return Vec::new();
    };
    match dir {
        Direction::Fanin => gate
            .fanin()
            .filter(|e| table.gate(e.target).is_some())
            .map(|e| (e.target, e.inverted))
            .collect(),
        Direction::Fanout => table
            .fanout_of(id)
            .filter_map(|consumer| {
                let edge = table
                    .gate(consumer)
                    .and_then(|c| c.fanin().find(|e| e.target == id));
                edge.map(|e| (consumer, e.inverted))
            })
            .collect(),
    }
}
