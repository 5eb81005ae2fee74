use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::error::{NtkError, Result};
use crate::ntk::gate::{Edge, Gate, GateId, GateKind};

/// Owner of all gate records.
///
/// Iteration order is creation order. Ids are handed out by a monotonic
/// allocator and never reissued, so the map may contain gaps after
/// deletions or explicit-id population. The fanout relation is a derived
/// index over the fanin edges, maintained on every mutation; it never owns
/// anything.
#[derive(Debug, Clone, Default)]
pub struct GateTable {
    gates: IndexMap<GateId, Gate>,
    fanout: HashMap<GateId, BTreeSet<GateId>>,
    next_id: u32,
}

impl GateTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Lookup never errors; callers check for `None`.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(&id)
    }

    /// Gates in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.values()
    }

    /// Consumers of `id`, ascending.
    pub fn fanout_of(&self, id: GateId) -> impl Iterator<Item = GateId> + '_ {
        self.fanout.get(&id).into_iter().flatten().copied()
    }

    pub fn fanout_count(&self, id: GateId) -> usize {
        self.fanout.get(&id).map_or(0, BTreeSet::len)
    }

    pub(crate) fn create_gate(&mut self, kind: GateKind, name: Option<String>) -> GateId {
        let id = GateId(self.next_id);
        self.next_id += 1;
        self.gates.insert(id, Gate::new(id, kind, name));
        id
    }

    /// Inserts a gate under a caller-chosen id, for front ends that must
    /// preserve source numbering. An existing `Undef` placeholder is
    /// upgraded in place (its fanout references stay valid); any other
    /// existing kind is a duplicate definition.
    pub(crate) fn define_gate(
        &mut self,
        id: GateId,
        kind: GateKind,
        name: Option<String>,
    ) -> Result<GateId> {
        match self.gates.get_mut(&id) {
            Some(gate) if gate.kind == GateKind::Undef => {
                gate.kind = kind;
                if name.is_some() {
                    gate.name = name;
                }
            }
            Some(_) => return Err(NtkError::DuplicateGate(id)),
            None => {
                self.gates.insert(id, Gate::new(id, kind, name));
            }
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        Ok(id)
    }

    /// Records a fanin edge of `id` at `slot`.
    ///
    /// An unknown edge *target* is inserted as an `Undef` placeholder so
    /// that every reference in the table always resolves.
    pub(crate) fn set_fanin(&mut self, id: GateId, slot: usize, edge: Edge) -> Result<()> {
        let kind = self.gates.get(&id).ok_or(NtkError::UnknownGate(id))?.kind;
        if slot >= kind.fanin_arity() {
            return Err(NtkError::SlotOutOfRange { id, kind, slot });
        }

        if !self.gates.contains_key(&edge.target) {
            self.gates
                .insert(edge.target, Gate::new(edge.target, GateKind::Undef, None));
            self.next_id = self.next_id.max(edge.target.0.saturating_add(1));
        }

        let gate = match self.gates.get_mut(&id) {
            Some(g) => g,
            None => return Err(NtkError::UnknownGate(id)),
        };
        let old = gate.set_slot(slot, edge);
        let still_referenced =
            old.map(|o| self.gates[&id].fanin().any(|e| e.target == o.target));
        if let (Some(o), Some(false)) = (old, still_referenced) {
            if let Some(set) = self.fanout.get_mut(&o.target) {
                set.remove(&id);
            }
        }
        self.fanout.entry(edge.target).or_default().insert(id);
        Ok(())
    }

    /// Removes a gate. Refused while consumers still reference it unless
    /// `force` is set; force callers must rewire dependents themselves.
    pub(crate) fn delete_gate(&mut self, id: GateId, force: bool) -> Result<()> {
        let gate = self.gates.get(&id).ok_or(NtkError::UnknownGate(id))?;
        let consumers = self.fanout_count(id);
        if consumers > 0 && !force {
            return Err(NtkError::GateInUse {
                id,
                fanout: consumers,
            });
        }
        let fanin: Vec<Edge> = gate.fanin().collect();
        self.gates.shift_remove(&id);
        for edge in fanin {
            if let Some(set) = self.fanout.get_mut(&edge.target) {
                set.remove(&id);
            }
        }
        self.fanout.remove(&id);
        Ok(())
    }
}
