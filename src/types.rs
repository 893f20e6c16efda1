use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

pub type HashSet<K> = FxHashSet<K>;

pub type CellGid = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Lif,
    Cable,
}

/// A labeled item (source, synapse, junction site) on a specific cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellGlobalLabel {
    pub gid: CellGid,
    pub label: String,
}

impl CellGlobalLabel {
    pub fn new(gid: CellGid, label: impl Into<String>) -> Self {
        Self {
            gid,
            label: label.into(),
        }
    }
}

/// Incoming connection on the cell that was queried. The target cell is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellConnection {
    pub source: CellGlobalLabel,
    pub target: String,
    pub weight: f64,
    pub delay: f64,
}

impl CellConnection {
    pub fn new(source: CellGlobalLabel, target: impl Into<String>, weight: f64, delay: f64) -> Self {
        Self {
            source,
            target: target.into(),
            weight,
            delay,
        }
    }

    pub fn is_inhibitory(&self) -> bool {
        self.weight < 0.0
    }
}

/// Undirected electrical coupling between two junction sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapJunction {
    pub peer_a: CellGlobalLabel,
    pub peer_b: CellGlobalLabel,
    pub conductance: f64,
}

impl GapJunction {
    pub fn new(peer_a: CellGlobalLabel, peer_b: CellGlobalLabel, conductance: f64) -> Self {
        Self {
            peer_a,
            peer_b,
            conductance,
        }
    }

    /// Peers in ascending order, so that `a-b` and `b-a` compare equal.
    pub fn canonical_peers(&self) -> (&CellGlobalLabel, &CellGlobalLabel) {
        if self.peer_a <= self.peer_b {
            (&self.peer_a, &self.peer_b)
        } else {
            (&self.peer_b, &self.peer_a)
        }
    }

    pub fn is_same_as(&self, other: &GapJunction) -> bool {
        self.canonical_peers() == other.canonical_peers() && self.conductance == other.conductance
    }

    pub fn other_peer(&self, gid: CellGid) -> Option<&CellGlobalLabel> {
        if self.peer_a.gid == gid {
            Some(&self.peer_b)
        } else if self.peer_b.gid == gid {
            Some(&self.peer_a)
        } else {
            None
        }
    }
}

/// Outcome of a single junction draw. Out of range peers are kept visible
/// instead of being dropped silently.
#[derive(Debug, Clone, PartialEq)]
pub enum JunctionDraw {
    Accepted(GapJunction),
    OutOfRange { gid: CellGid, peer: CellGid },
}

impl JunctionDraw {
    pub fn accepted(self) -> Option<GapJunction> {
        match self {
            JunctionDraw::Accepted(junction) => Some(junction),
            JunctionDraw::OutOfRange { .. } => None,
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, JunctionDraw::OutOfRange { .. })
    }
}
