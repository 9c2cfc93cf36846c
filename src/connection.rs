// src/connection.rs
//
// Identifiers used when one gen addresses another gen's ports.

use std::fmt;

use strum::{AsRefStr, Display, EnumIter};

/// Index of a gen inside a [`Graph`](crate::Graph) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenId(pub(crate) usize);

impl GenId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which port class a reference resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, AsRefStr)]
pub enum ConnectionKind {
    Slot,
    Input,
    Output,
}

/// One source feeding an input: output `output` of gen `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub source: GenId,
    pub output: usize,
}

impl Binding {
    pub fn new(source: GenId, output: usize) -> Self {
        Self { source, output }
    }
}

/// A fully qualified port address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub node: GenId,
    pub kind: ConnectionKind,
    pub index: usize,
}

impl PortRef {
    pub fn slot(node: GenId, index: usize) -> Self {
        Self {
            node,
            kind: ConnectionKind::Slot,
            index,
        }
    }

    pub fn input(node: GenId, index: usize) -> Self {
        Self {
            node,
            kind: ConnectionKind::Input,
            index,
        }
    }

    pub fn output(node: GenId, index: usize) -> Self {
        Self {
            node,
            kind: ConnectionKind::Output,
            index,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}]", self.node, self.kind, self.index)
    }
}
