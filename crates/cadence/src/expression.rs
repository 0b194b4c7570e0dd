//! Trigger expressions
//!
//! Guards are boolean predicates over live parameter values. They are written
//! as an `Expr` tree and compiled into an `Expression`, a flat arena of nodes
//! owned by exactly one event. Pulse nodes keep their last observed value in
//! their own arena slot, so two guards built from the same `Expr` never share
//! edge-detection memory.
//!
//! Atoms fail closed: an address the source cannot resolve makes the atom
//! false, so a guard on a removed parameter simply never triggers.

use std::cmp::Ordering;
use std::ops::Not;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::device::{Address, ParameterSource};
use crate::value::Value;

/// Comparison operator of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Equal,
    Different,
    Greater,
    Lower,
    GreaterEqual,
    LowerEqual,
}

impl Comparator {
    fn holds(self, ordering: Option<Ordering>) -> bool {
        match self {
            Comparator::Equal => ordering == Some(Ordering::Equal),
            Comparator::Different => ordering != Some(Ordering::Equal),
            Comparator::Greater => ordering == Some(Ordering::Greater),
            Comparator::Lower => ordering == Some(Ordering::Less),
            Comparator::GreaterEqual => {
                matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
            }
            Comparator::LowerEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        }
    }
}

/// One side of an atom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum Operand {
    Parameter(Address),
    Value(Value),
}

impl Operand {
    pub fn param(address: impl Into<Address>) -> Self {
        Operand::Parameter(address.into())
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Operand::Value(value.into())
    }

    fn resolve(&self, source: &dyn ParameterSource) -> Option<Value> {
        match self {
            Operand::Parameter(address) => {
                let value = source.read(address);
                if value.is_none() {
                    trace!(address = %address, "unresolved address in guard");
                }
                value
            }
            Operand::Value(value) => Some(value.clone()),
        }
    }
}

/// Expression tree, as written by the score author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expr {
    Bool {
        value: bool,
    },
    Atom {
        lhs: Operand,
        comparator: Comparator,
        rhs: Operand,
    },
    Not {
        inner: Box<Expr>,
    },
    And {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Or {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Xor {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Pulse {
        inner: Box<Expr>,
    },
}

impl Expr {
    pub fn truth(value: bool) -> Self {
        Expr::Bool { value }
    }

    pub fn atom(lhs: Operand, comparator: Comparator, rhs: Operand) -> Self {
        Expr::Atom {
            lhs,
            comparator,
            rhs,
        }
    }

    /// `address == value`
    pub fn equals(address: impl Into<Address>, value: impl Into<Value>) -> Self {
        Self::atom(Operand::param(address), Comparator::Equal, Operand::value(value))
    }

    /// `address > value`
    pub fn above(address: impl Into<Address>, value: impl Into<Value>) -> Self {
        Self::atom(Operand::param(address), Comparator::Greater, Operand::value(value))
    }

    /// `address < value`
    pub fn below(address: impl Into<Address>, value: impl Into<Value>) -> Self {
        Self::atom(Operand::param(address), Comparator::Lower, Operand::value(value))
    }

    pub fn and(self, rhs: Expr) -> Self {
        Expr::And {
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or {
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn xor(self, rhs: Expr) -> Self {
        Expr::Xor {
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    /// True only when `inner` goes from false (or never observed) to true
    pub fn pulse(inner: Expr) -> Self {
        Expr::Pulse {
            inner: Box::new(inner),
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::Not {
            inner: Box::new(self),
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Constant(bool),
    Atom {
        lhs: Operand,
        comparator: Comparator,
        rhs: Operand,
    },
    Not(usize),
    And(usize, usize),
    Or(usize, usize),
    Xor(usize, usize),
    Pulse {
        inner: usize,
        last: Option<bool>,
    },
}

/// Compiled expression with its evaluation memory
#[derive(Debug, Clone)]
pub struct Expression {
    nodes: Vec<Node>,
    root: usize,
}

impl Expression {
    /// Compile an expression tree
    pub fn new(expr: Expr) -> Self {
        let mut nodes = Vec::new();
        let root = compile(expr, &mut nodes);
        Self { nodes, root }
    }

    pub fn always() -> Self {
        Self::new(Expr::truth(true))
    }

    pub fn never() -> Self {
        Self::new(Expr::truth(false))
    }

    /// Evaluate against a snapshot of live values.
    ///
    /// AND/OR evaluate left to right and short-circuit; a pulse in a skipped
    /// branch keeps its previous memory.
    pub fn evaluate(&mut self, source: &dyn ParameterSource) -> bool {
        self.eval(self.root, source)
    }

    /// Forget every pulse observation
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            if let Node::Pulse { last, .. } = node {
                *last = None;
            }
        }
    }

    pub fn has_pulse(&self) -> bool {
        self.nodes.iter().any(|n| matches!(n, Node::Pulse { .. }))
    }

    /// Number of compiled nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn eval(&mut self, idx: usize, source: &dyn ParameterSource) -> bool {
        let Some(node) = self.nodes.get(idx) else {
            return false;
        };

        match node {
            Node::Constant(value) => *value,
            Node::Atom {
                lhs,
                comparator,
                rhs,
            } => {
                let (Some(a), Some(b)) = (lhs.resolve(source), rhs.resolve(source)) else {
                    return false;
                };
                comparator.holds(a.compare(&b))
            }
            Node::Not(inner) => {
                let inner = *inner;
                !self.eval(inner, source)
            }
            Node::And(lhs, rhs) => {
                let (lhs, rhs) = (*lhs, *rhs);
                self.eval(lhs, source) && self.eval(rhs, source)
            }
            Node::Or(lhs, rhs) => {
                let (lhs, rhs) = (*lhs, *rhs);
                self.eval(lhs, source) || self.eval(rhs, source)
            }
            Node::Xor(lhs, rhs) => {
                let (lhs, rhs) = (*lhs, *rhs);
                let a = self.eval(lhs, source);
                let b = self.eval(rhs, source);
                a != b
            }
            Node::Pulse { inner, .. } => {
                let inner = *inner;
                let now = self.eval(inner, source);
                match &mut self.nodes[idx] {
                    Node::Pulse { last, .. } => {
                        let fired = now && !last.unwrap_or(false);
                        *last = Some(now);
                        fired
                    }
                    _ => false,
                }
            }
        }
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::always()
    }
}

impl From<Expr> for Expression {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

fn compile(expr: Expr, nodes: &mut Vec<Node>) -> usize {
    let node = match expr {
        Expr::Bool { value } => Node::Constant(value),
        Expr::Atom {
            lhs,
            comparator,
            rhs,
        } => Node::Atom {
            lhs,
            comparator,
            rhs,
        },
        Expr::Not { inner } => Node::Not(compile(*inner, nodes)),
        Expr::And { lhs, rhs } => {
            let l = compile(*lhs, nodes);
            Node::And(l, compile(*rhs, nodes))
        }
        Expr::Or { lhs, rhs } => {
            let l = compile(*lhs, nodes);
            Node::Or(l, compile(*rhs, nodes))
        }
        Expr::Xor { lhs, rhs } => {
            let l = compile(*lhs, nodes);
            Node::Xor(l, compile(*rhs, nodes))
        }
        Expr::Pulse { inner } => Node::Pulse {
            inner: compile(*inner, nodes),
            last: None,
        },
    };
    nodes.push(node);
    nodes.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemoryDevice;

    #[test]
    fn test_atom_comparisons() {
        let mut device = MemoryDevice::new();
        device.set("/level", 0.7);

        assert!(Expression::new(Expr::above("/level", 0.5)).evaluate(&device));
        assert!(!Expression::new(Expr::below("/level", 0.5)).evaluate(&device));
        assert!(Expression::new(Expr::atom(
            Operand::param("/level"),
            Comparator::LowerEqual,
            Operand::value(0.7),
        ))
        .evaluate(&device));
    }

    #[test]
    fn test_unresolved_address_fails_closed() {
        let device = MemoryDevice::new();
        let mut eq = Expression::new(Expr::equals("/gone", 1));
        let mut ne = Expression::new(Expr::atom(
            Operand::param("/gone"),
            Comparator::Different,
            Operand::value(1),
        ));
        assert!(!eq.evaluate(&device));
        assert!(!ne.evaluate(&device));
    }

    #[test]
    fn test_composition() {
        let mut device = MemoryDevice::new();
        device.set("/a", true);
        device.set("/b", false);

        let a = || Expr::equals("/a", true);
        let b = || Expr::equals("/b", true);

        assert!(!Expression::new(a().and(b())).evaluate(&device));
        assert!(Expression::new(a().or(b())).evaluate(&device));
        assert!(Expression::new(a().xor(b())).evaluate(&device));
        assert!(Expression::new(!b()).evaluate(&device));
    }

    #[test]
    fn test_pulse_fires_on_rising_edge_only() {
        let mut device = MemoryDevice::new();
        let mut expr = Expression::new(Expr::pulse(Expr::equals("/gate", true)));

        let mut seen = Vec::new();
        for gate in [false, true, true, false, true] {
            device.set("/gate", gate);
            seen.push(expr.evaluate(&device));
        }
        assert_eq!(seen, vec![false, true, false, false, true]);
    }

    #[test]
    fn test_pulse_true_when_first_observation_is_true() {
        let mut device = MemoryDevice::new();
        device.set("/gate", true);
        let mut expr = Expression::new(Expr::pulse(Expr::equals("/gate", true)));
        assert!(expr.evaluate(&device));
        assert!(!expr.evaluate(&device));

        expr.reset();
        assert!(expr.evaluate(&device));
    }

    #[test]
    fn test_pulse_memory_not_shared() {
        let mut device = MemoryDevice::new();
        device.set("/gate", true);
        let tree = Expr::pulse(Expr::equals("/gate", true));

        let mut first = Expression::new(tree.clone());
        let mut second = Expression::new(tree);
        assert!(first.evaluate(&device));
        assert!(second.evaluate(&device));
    }

    #[test]
    fn test_and_short_circuit_skips_rhs_pulse() {
        let mut device = MemoryDevice::new();
        device.set("/enable", false);
        device.set("/gate", true);

        let mut expr = Expression::new(
            Expr::equals("/enable", true).and(Expr::pulse(Expr::equals("/gate", true))),
        );
        assert!(!expr.evaluate(&device));

        // The pulse never observed the gate, so enabling fires it now.
        device.set("/enable", true);
        assert!(expr.evaluate(&device));
    }

    #[test]
    fn test_compiled_layout() {
        let expr = Expression::new(Expr::pulse(Expr::equals("/a", 1).and(Expr::truth(true))));
        assert_eq!(expr.len(), 4);
        assert!(expr.has_pulse());
        assert!(!Expression::always().has_pulse());
    }
}
