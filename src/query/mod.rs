pub mod cone;
pub mod level;

use std::collections::HashSet;

use crate::ntk::gate::{Edge, GateId, GateKind};
use crate::ntk::table::GateTable;

/// Structured per-gate view: the caller renders it, the core never
/// formats text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    pub id: GateId,
    pub kind: GateKind,
    pub name: Option<String>,
    pub level: u32,
    pub fanin: Vec<Edge>,
    pub fanout: Vec<GateId>,
}

/// Primary inputs in creation order.
pub fn pis(table: &GateTable) -> Vec<GateId> {
    ids_of_kind(table, GateKind::PrimaryInput)
}

/// Primary outputs in creation order.
pub fn pos(table: &GateTable) -> Vec<GateId> {
    ids_of_kind(table, GateKind::PrimaryOutput)
}

fn ids_of_kind(table: &GateTable, kind: GateKind) -> Vec<GateId> {
    table
        .iter()
        .filter(|g| g.kind == kind)
        .map(|g| g.id)
        .collect()
}

/// Gates reachable from the primary outputs, drivers before consumers.
///
/// Depth-first from each PO in creation order, slot 0 before slot 1, each
/// gate listed once. Undefined placeholders are left out; the floating
/// report covers them.
pub fn netlist_order(table: &GateTable) -> Vec<GateId> {
    let mut seen: HashSet<GateId> = HashSet::new();
    let mut order = Vec::new();
    for po in pos(table) {
        if seen.contains(&po) {
            continue;
        }
        // (id, children already pushed)
        let mut stack = vec![(po, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !seen.insert(id) {
                continue;
            }
            stack.push((id, true));
            let Some(gate) = table.gate(id) else {
                continue;
            };
            let fanin: Vec<Edge> = gate.fanin().collect();
            for edge in fanin.into_iter().rev() {
                let keep = table
                    .gate(edge.target)
                    .is_some_and(|t| t.kind != GateKind::Undef);
                if keep && !seen.contains(&edge.target) {
                    stack.push((edge.target, false));
                }
            }
        }
    }
    order
}
