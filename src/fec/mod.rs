use std::collections::HashMap;

use crate::error::{NtkError, Result};
use crate::ntk::gate::GateId;
use crate::ntk::table::GateTable;

/// One functional-equivalence group.
///
/// The representative is the earliest-created (lowest-id) member; the
/// remaining members carry the polarity under which they match the
/// representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivClass {
    repr: GateId,
    members: Vec<(GateId, bool)>,
}

impl EquivClass {
    pub fn repr(&self) -> GateId {
        self.repr
    }

    /// Non-representative members, ascending by id.
    pub fn members(&self) -> &[(GateId, bool)] {
        &self.members
    }

    /// Members including the representative.
    pub fn size(&self) -> usize {
        self.members.len() + 1
    }
}

/// Partition of gate ids into equivalence groups, as produced by the
/// external equivalence engine. Gates outside every class are implicit
/// singletons and report no pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivClasses {
    classes: Vec<EquivClass>,
    index: HashMap<GateId, (usize, bool)>,
}

impl EquivClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[EquivClass] {
        &self.classes
    }

    /// Representative and relative polarity of the class holding `id`,
    /// or `None` for an implicit singleton. The representative maps to
    /// itself with positive polarity.
    pub fn class_of(&self, id: GateId) -> Option<(GateId, bool)> {
        self.index
            .get(&id)
            .map(|&(class, phase)| (self.classes[class].repr, phase))
    }

    /// Every non-representative member paired with its representative,
    /// ascending representative id, then ascending member id. Restartable
    /// and finite.
    pub fn pairs(&self) -> impl Iterator<Item = (GateId, GateId, bool)> + '_ {
        self.classes.iter().flat_map(|class| {
            class
                .members
                .iter()
                .map(move |&(member, phase)| (class.repr, member, phase))
        })
    }

    /// Total number of reported pairs: partition size minus class count.
    pub fn num_pairs(&self) -> usize {
        self.classes.iter().map(|c| c.members.len()).sum()
    }

    /// Validates and normalizes a raw partition against the current gate
    /// table. Each group lists members with a phase bit; phases are
    /// rebased so the lowest-id member becomes the representative.
    ///
    /// Pure: the caller swaps the result in wholesale, so a failed build
    /// leaves any previous partition intact.
    pub(crate) fn build(table: &GateTable, partition: &[Vec<(GateId, bool)>]) -> Result<Self> {
        let mut classes = Vec::new();
        let mut index: HashMap<GateId, (usize, bool)> = HashMap::new();

        for group in partition {
            if group.is_empty() {
                continue;
            }
            let mut sorted = group.clone();
            sorted.sort_unstable_by_key(|&(id, _)| id);
            let (repr, repr_phase) = sorted[0];

            let class_idx = classes.len();
            let mut members = Vec::with_capacity(sorted.len() - 1);
            for (pos, &(id, phase)) in sorted.iter().enumerate() {
                if table.gate(id).is_none() {
                    return Err(NtkError::UnknownGate(id));
                }
                if index.insert(id, (class_idx, phase != repr_phase)).is_some() {
                    return Err(NtkError::OverlappingClass(id));
                }
                if pos > 0 {
                    members.push((id, phase != repr_phase));
                }
            }
            classes.push(EquivClass { repr, members });
        }

        classes.sort_unstable_by_key(EquivClass::repr);
        // re-point the index at the sorted positions
        let mut index_sorted = HashMap::with_capacity(index.len());
        for (idx, class) in classes.iter().enumerate() {
            index_sorted.insert(class.repr, (idx, false));
            for &(member, phase) in &class.members {
                index_sorted.insert(member, (idx, phase));
            }
        }

        Ok(Self {
            classes,
            index: index_sorted,
        })
    }
}
