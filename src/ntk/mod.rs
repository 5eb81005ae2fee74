pub mod gate;
pub mod stage;
pub mod table;

use std::cell::RefCell;

use tracing::{debug, info};

use crate::error::{NtkError, Result};
use crate::fec::EquivClasses;
use crate::ntk::gate::{Edge, Gate, GateId, GateKind};
use crate::ntk::stage::Stage;
use crate::ntk::table::GateTable;
use crate::query::cone::{self, ConeReport};
use crate::query::level::{self, Levels};
use crate::query::{self, GateReport};

/// Aggregated view over the whole netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub stage: Stage,
    pub pis: usize,
    pub pos: usize,
    pub ands: usize,
    pub consts: usize,
    pub undefs: usize,
    pub total: usize,
    pub floating: usize,
    pub dangling: usize,
    pub classes: usize,
    pub max_level: u32,
}

/// Exclusive owner of one gate table, its lifecycle stage, and every
/// derived view over it.
///
/// All mutation and every query funnels through this facade: a single
/// stage guard decides whether the operation is legal, and mutations drop
/// the cached level derivation so the next read recomputes it. Replacing
/// a netlist means dropping this value and constructing a fresh one; the
/// old table and all derived state go with it.
///
/// Single-threaded by design (the level cache is a `RefCell`). Read-only
/// reports over distinct gates would be safe to parallelize if the cache
/// moved behind a lock; that extension is documented, not built.
#[derive(Debug)]
pub struct Netlist {
    table: GateTable,
    stage: Stage,
    equiv: EquivClasses,
    levels: RefCell<Option<Levels>>,
}

impl Default for Netlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Netlist {
    pub fn new() -> Self {
        Self {
            table: GateTable::new(),
            stage: Stage::Init,
            equiv: EquivClasses::new(),
            levels: RefCell::new(None),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Raw read access to the table, for embedders that drive the query
    /// components directly. The stage-guarded methods below are the
    /// supported entry points.
    pub fn table(&self) -> &GateTable {
        &self.table
    }

    /// Ungated lookup; returns `None` for an unknown id, never errors.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.table.gate(id)
    }

    /// The single guard every operation passes through.
    fn require(&self, required: Stage) -> Result<()> {
        if self.stage < required {
            return Err(NtkError::NetlistNotReady {
                required,
                current: self.stage,
            });
        }
        Ok(())
    }

    fn advance(&mut self, to: Stage) {
        if to > self.stage {
            info!(from = %self.stage, to = %to, "netlist stage advanced");
            self.stage = to;
        }
    }

    /// Structural change: cached levels are stale, and any ingested
    /// equivalence partition no longer describes this structure.
    fn touch(&mut self) {
        self.levels.borrow_mut().take();
        if self.equiv.num_classes() > 0 {
            debug!("structure changed, dropping stale equivalence classes");
            self.equiv = EquivClasses::new();
        }
    }

    // ---- population and mutation -------------------------------------

    pub fn create_gate(&mut self, kind: GateKind, name: Option<String>) -> Result<GateId> {
        self.require(Stage::Init)?;
        let id = self.table.create_gate(kind, name);
        self.touch();
        Ok(id)
    }

    pub fn define_gate(
        &mut self,
        id: GateId,
        kind: GateKind,
        name: Option<String>,
    ) -> Result<GateId> {
        self.require(Stage::Init)?;
        let id = self.table.define_gate(id, kind, name)?;
        self.touch();
        Ok(id)
    }

    pub fn set_fanin(&mut self, id: GateId, slot: usize, edge: Edge) -> Result<()> {
        self.require(Stage::Init)?;
        self.table.set_fanin(id, slot, edge)?;
        self.touch();
        Ok(())
    }

    pub fn delete_gate(&mut self, id: GateId, force: bool) -> Result<()> {
        self.require(Stage::Init)?;
        self.table.delete_gate(id, force)?;
        self.touch();
        Ok(())
    }

    // ---- lifecycle transitions ---------------------------------------

    /// Signal from the front end that population is complete.
    pub fn finish_read(&mut self) -> Result<()> {
        if self.stage != Stage::Init {
            return Err(NtkError::NetlistNotReady {
                required: Stage::Init,
                current: self.stage,
            });
        }
        self.advance(Stage::Read);
        Ok(())
    }

    /// Effect of an external optimization pass on the lifecycle.
    pub fn mark_optimized(&mut self) -> Result<()> {
        self.require(Stage::Read)?;
        self.advance(Stage::Optimized);
        Ok(())
    }

    /// Effect of an external structural-hashing pass on the lifecycle.
    pub fn mark_strashed(&mut self) -> Result<()> {
        self.require(Stage::Read)?;
        self.advance(Stage::Strashed);
        Ok(())
    }

    /// Replaces the equivalence partition wholesale with the output of
    /// the external equivalence engine and advances to `Simulated`.
    ///
    /// A failed ingest leaves the previous partition intact.
    pub fn ingest(&mut self, partition: &[Vec<(GateId, bool)>]) -> Result<()> {
        self.require(Stage::Strashed)?;
        let built = EquivClasses::build(&self.table, partition)?;
        debug!(classes = built.num_classes(), pairs = built.num_pairs(), "equivalence partition ingested");
        self.equiv = built;
        self.advance(Stage::Simulated);
        Ok(())
    }

    // ---- queries ------------------------------------------------------

    fn with_levels<R>(&self, f: impl FnOnce(&Levels) -> R) -> Result<R> {
        let mut cache = self.levels.borrow_mut();
        if let Some(levels) = cache.as_ref() {
            return Ok(f(levels));
        }
        let computed = level::compute_levels(&self.table)?;
        let out = f(&computed);
        *cache = Some(computed);
        Ok(out)
    }

    pub fn gate_level(&self, id: GateId) -> Result<u32> {
        self.require(Stage::Read)?;
        self.with_levels(|levels| levels.level(id))?
            .ok_or(NtkError::UnknownGate(id))
    }

    pub fn floating_gates(&self) -> Result<Vec<GateId>> {
        self.require(Stage::Read)?;
        Ok(level::floating_gates(&self.table))
    }

    pub fn dangling_gates(&self) -> Result<Vec<GateId>> {
        self.require(Stage::Read)?;
        Ok(level::dangling_gates(&self.table))
    }

    pub fn fanin_cone(&self, root: GateId, depth: i32) -> Result<ConeReport> {
        self.require(Stage::Read)?;
        cone::fanin_cone(&self.table, root, depth)
    }

    pub fn fanout_cone(&self, root: GateId, depth: i32) -> Result<ConeReport> {
        self.require(Stage::Read)?;
        cone::fanout_cone(&self.table, root, depth)
    }

    pub fn gate_report(&self, id: GateId) -> Result<GateReport> {
        self.require(Stage::Read)?;
        let gate = self.table.gate(id).ok_or(NtkError::UnknownGate(id))?;
        let level = self
            .with_levels(|levels| levels.level(id))?
            .ok_or(NtkError::UnknownGate(id))?;
        Ok(GateReport {
            id,
            kind: gate.kind,
            name: gate.name.clone(),
            level,
            fanin: gate.fanin().collect(),
            fanout: self.table.fanout_of(id).collect(),
        })
    }

    pub fn pis(&self) -> Result<Vec<GateId>> {
        self.require(Stage::Read)?;
        Ok(query::pis(&self.table))
    }

    pub fn pos(&self) -> Result<Vec<GateId>> {
        self.require(Stage::Read)?;
        Ok(query::pos(&self.table))
    }

    /// Gates reachable from the primary outputs, drivers first.
    pub fn netlist_order(&self) -> Result<Vec<GateId>> {
        self.require(Stage::Read)?;
        Ok(query::netlist_order(&self.table))
    }

    pub fn class_of(&self, id: GateId) -> Result<Option<(GateId, bool)>> {
        self.require(Stage::Read)?;
        Ok(self.equiv.class_of(id))
    }

    /// `(representative, member, relative polarity)` for every
    /// non-representative member, ordered.
    pub fn equiv_pairs(&self) -> Result<impl Iterator<Item = (GateId, GateId, bool)> + '_> {
        self.require(Stage::Read)?;
        Ok(self.equiv.pairs())
    }

    pub fn num_classes(&self) -> Result<usize> {
        self.require(Stage::Read)?;
        Ok(self.equiv.num_classes())
    }

    pub fn summary(&self) -> Result<Summary> {
        self.require(Stage::Read)?;
        let mut summary = Summary {
            stage: self.stage,
            pis: 0,
            pos: 0,
            ands: 0,
            consts: 0,
            undefs: 0,
            total: self.table.len(),
            floating: level::floating_gates(&self.table).len(),
            dangling: level::dangling_gates(&self.table).len(),
            classes: self.equiv.num_classes(),
            max_level: 0,
        };
        for gate in self.table.iter() {
            match gate.kind {
                GateKind::PrimaryInput => summary.pis += 1,
                GateKind::PrimaryOutput => summary.pos += 1,
                GateKind::And => summary.ands += 1,
                GateKind::Const0 => summary.consts += 1,
                GateKind::Undef => summary.undefs += 1,
            }
        }
        summary.max_level = self.with_levels(Levels::max_level)?;
        Ok(summary)
    }
}
