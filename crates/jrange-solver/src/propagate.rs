//! Bidirectional type propagation.
//!
//! The expression tree is external. It exposes its nodes through
//! `TypeNetwork`: each node has a current *belief* (a type-set), knows its
//! parent and operands, and can say what it expects of an operand
//! (`push_down`) and what it produces given its operands (`pull_up`).
//!
//! `Propagator` drives the network to a fixpoint with an explicit worklist.
//! Every evaluation intersects constraints into beliefs, so beliefs only
//! narrow and the run terminates. A node whose belief would become empty is
//! given a fallback, recorded as a `TypeConflict`, and pinned.

use crate::format::TypeFormatter;
use crate::lattice::TypeLattice;
use crate::types::TypeId;
use fixedbitset::FixedBitSet;
use jrange_common::Diagnostic;
use jrange_common::diagnostics::diagnostic_codes;
use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Index of an expression node in a `TypeNetwork`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

pub type NodeList = SmallVec<[NodeId; 4]>;

/// The contract an expression tree implements to take part in propagation.
///
/// Node ids are dense: `0..node_count()`.
pub trait TypeNetwork {
    fn node_count(&self) -> usize;

    fn belief(&self, node: NodeId) -> TypeId;

    /// Replace the belief of `node`. Only the propagator calls this.
    fn adopt(&mut self, node: NodeId, ty: TypeId);

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn operands(&self, node: NodeId) -> NodeList;

    /// Constraint `node` imposes on `operand`, given the current beliefs.
    fn push_down(&self, _lattice: &TypeLattice<'_>, _node: NodeId, _operand: NodeId) -> TypeId {
        TypeId::UNKNOWN
    }

    /// Type of `node` as computed from its operands' beliefs.
    fn pull_up(&self, _lattice: &TypeLattice<'_>, _node: NodeId) -> TypeId {
        TypeId::UNKNOWN
    }
}

/// A narrowing that would have emptied a belief.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeConflict {
    pub node: NodeId,
    pub previous: TypeId,
    pub constraint: TypeId,
    /// Belief adopted instead.
    pub fallback: TypeId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropagationOutcome {
    /// Node evaluations performed.
    pub steps: u32,
    /// Beliefs replaced.
    pub changed: u32,
    pub conflicts: Vec<TypeConflict>,
    /// `false` if the step limit stopped the run with work left.
    pub converged: bool,
}

pub struct Propagator<'l, 'a> {
    lattice: &'l TypeLattice<'a>,
    worklist: VecDeque<NodeId>,
    queued: FixedBitSet,
    pinned: FixedBitSet,
    conflicts: Vec<TypeConflict>,
    changed: u32,
}

impl<'l, 'a> Propagator<'l, 'a> {
    pub fn new(lattice: &'l TypeLattice<'a>) -> Self {
        Propagator {
            lattice,
            worklist: VecDeque::new(),
            queued: FixedBitSet::new(),
            pinned: FixedBitSet::new(),
            conflicts: Vec::new(),
            changed: 0,
        }
    }

    /// Whether `node` was pinned by a conflict.
    pub fn is_pinned(&self, node: NodeId) -> bool {
        self.pinned.contains(node.index())
    }

    /// Evaluate every node, then everything that changes, until nothing does.
    pub fn run<N: TypeNetwork + ?Sized>(&mut self, network: &mut N) -> PropagationOutcome {
        let seeds = (0..network.node_count() as u32).map(NodeId);
        self.run_from(network, seeds)
    }

    /// Like [`run`](Self::run) but starting from `seeds` only.
    pub fn run_from<N: TypeNetwork + ?Sized>(
        &mut self,
        network: &mut N,
        seeds: impl IntoIterator<Item = NodeId>,
    ) -> PropagationOutcome {
        self.reserve(network.node_count());
        for seed in seeds {
            self.enqueue(seed);
        }

        let limit = self.lattice.options().max_propagation_steps;
        let mut steps = 0u32;
        while let Some(node) = self.worklist.pop_front() {
            if steps >= limit {
                self.worklist.push_front(node);
                break;
            }
            steps += 1;
            self.queued.set(node.index(), false);
            self.evaluate(network, node);
        }

        let converged = self.worklist.is_empty();
        if !converged {
            warn!(steps, pending = self.worklist.len(), "propagation step limit reached");
            self.lattice.report(Diagnostic::from_code(
                diagnostic_codes::PROPAGATION_LIMIT_REACHED,
                &[steps.to_string().as_str()],
            ));
            self.worklist.clear();
            self.queued.clear();
        }
        debug!(steps, changed = self.changed, conflicts = self.conflicts.len(), converged, "propagation finished");

        PropagationOutcome {
            steps,
            changed: std::mem::take(&mut self.changed),
            conflicts: std::mem::take(&mut self.conflicts),
            converged,
        }
    }

    /// Narrow `node` by a constraint from outside the network (a declared
    /// type, a descriptor) and queue the consequences for the next run.
    pub fn constrain<N: TypeNetwork + ?Sized>(
        &mut self,
        network: &mut N,
        node: NodeId,
        constraint: TypeId,
    ) -> bool {
        self.reserve(network.node_count());
        self.narrow(network, node, constraint)
    }

    fn evaluate<N: TypeNetwork + ?Sized>(&mut self, network: &mut N, node: NodeId) {
        let produced = network.pull_up(self.lattice, node);
        self.narrow(network, node, produced);
        for operand in network.operands(node) {
            let expected = network.push_down(self.lattice, node, operand);
            self.narrow(network, operand, expected);
        }
    }

    fn narrow<N: TypeNetwork + ?Sized>(&mut self, network: &mut N, node: NodeId, constraint: TypeId) -> bool {
        if constraint == TypeId::UNKNOWN || self.is_pinned(node) {
            return false;
        }
        let previous = network.belief(node);
        let next = self.lattice.intersect(previous, constraint);
        if next == previous {
            return false;
        }
        if next == TypeId::ERROR {
            return self.conflict(network, node, previous, constraint);
        }

        trace!(node = node.0, previous = previous.0, next = next.0, "belief narrowed");
        self.adopt(network, node, next);
        true
    }

    fn conflict<N: TypeNetwork + ?Sized>(
        &mut self,
        network: &mut N,
        node: NodeId,
        previous: TypeId,
        constraint: TypeId,
    ) -> bool {
        let fallback = if self.lattice.interner().is_reference(previous) {
            TypeId::OBJECT
        } else {
            TypeId::UNKNOWN
        };
        let formatter = TypeFormatter::new(self.lattice.interner());
        let previous_text = formatter.format(previous);
        let constraint_text = formatter.format(constraint);
        warn!(node = node.0, previous = %previous_text, constraint = %constraint_text, "type conflict");
        self.lattice.report(
            Diagnostic::from_code(
                diagnostic_codes::TYPE_CONFLICT,
                &[node.0.to_string().as_str(), previous_text.as_str(), constraint_text.as_str()],
            )
            .at_node(node.0),
        );
        self.conflicts.push(TypeConflict {
            node,
            previous,
            constraint,
            fallback,
        });
        self.pinned.insert(node.index());
        if fallback != previous {
            self.adopt(network, node, fallback);
        }
        true
    }

    fn adopt<N: TypeNetwork + ?Sized>(&mut self, network: &mut N, node: NodeId, ty: TypeId) {
        network.adopt(node, ty);
        self.changed += 1;
        self.enqueue(node);
        if let Some(parent) = network.parent(node) {
            self.enqueue(parent);
        }
    }

    fn reserve(&mut self, nodes: usize) {
        if self.queued.len() < nodes {
            self.queued.grow(nodes);
            self.pinned.grow(nodes);
        }
    }

    fn enqueue(&mut self, node: NodeId) {
        self.reserve(node.index() + 1);
        if !self.queued.put(node.index()) {
            self.worklist.push_back(node);
        }
    }
}

#[cfg(test)]
#[path = "../tests/propagate_tests.rs"]
mod tests;
