use std::collections::{HashMap, VecDeque};

use crate::error::{NtkError, Result};
use crate::ntk::gate::{GateId, GateKind};
use crate::ntk::table::GateTable;

/// Topological levels for every gate in a table snapshot.
///
/// Level is the longest path in gates from any source (PI, constant,
/// undefined placeholder) to the gate; sources sit at level 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Levels {
    by_id: HashMap<GateId, u32>,
    max: u32,
}

impl Levels {
    pub fn level(&self, id: GateId) -> Option<u32> {
        self.by_id.get(&id).copied()
    }

    pub fn max_level(&self) -> u32 {
        self.max
    }
}

/// Assigns a level to every gate via a sources-first worklist pass.
///
/// Fails with `CyclicGraph` if any gate cannot be leveled. The acyclicity
/// invariant makes that unreachable for well-constructed netlists, but a
/// broken upstream builder can produce a back edge, so it is checked, not
/// assumed.
pub fn compute_levels(table: &GateTable) -> Result<Levels> {
    let mut remaining: HashMap<GateId, usize> = HashMap::with_capacity(table.len());
    let mut queue = VecDeque::new();
    for gate in table.iter() {
        // Edges to ids no longer in the table (possible after a forced
        // delete) do not gate the consumer.
        let unresolved = gate
            .fanin()
            .filter(|e| table.gate(e.target).is_some())
            .count();
        if unresolved == 0 {
            queue.push_back(gate.id);
        } else {
            remaining.insert(gate.id, unresolved);
        }
    }

    let mut levels = Levels::default();
    let mut pending: HashMap<GateId, u32> = HashMap::new();
    while let Some(id) = queue.pop_front() {
        let level = pending.get(&id).copied().unwrap_or(0);
        levels.by_id.insert(id, level);
        levels.max = levels.max.max(level);

        for consumer in table.fanout_of(id) {
            let Some(gate) = table.gate(consumer) else {
                continue;
            };
            let edges_from_id = gate.fanin().filter(|e| e.target == id).count();
            let best = pending.entry(consumer).or_insert(0);
            *best = (*best).max(level + 1);
            if let Some(left) = remaining.get_mut(&consumer) {
                *left = left.saturating_sub(edges_from_id);
                if *left == 0 {
                    remaining.remove(&consumer);
                    queue.push_back(consumer);
                }
            }
        }
    }

    if levels.by_id.len() < table.len() {
        return Err(NtkError::CyclicGraph {
            unleveled: table.len() - levels.by_id.len(),
        });
    }
    Ok(levels)
}

/// Gates holding a fanin reference whose driver was never declared.
///
/// Only AND gates and primary outputs can float; ids come back ascending.
pub fn floating_gates(table: &GateTable) -> Vec<GateId> {
    let mut out: Vec<GateId> = table
        .iter()
        .filter(|g| matches!(g.kind, GateKind::And | GateKind::PrimaryOutput))
        .filter(|g| {
            g.fanin()
                .any(|e| table.gate(e.target).is_none_or(|t| t.kind == GateKind::Undef))
        })
        .map(|g| g.id)
        .collect();
    out.sort_unstable();
    out
}

/// Internal AND gates that nothing consumes. A primary output is never
/// dangling; it is the consumer of record.
pub fn dangling_gates(table: &GateTable) -> Vec<GateId> {
    let mut out: Vec<GateId> = table
        .iter()
        .filter(|g| g.kind == GateKind::And && table.fanout_count(g.id) == 0)
        .map(|g| g.id)
        .collect();
    out.sort_unstable();
    out
}
