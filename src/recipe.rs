use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::cable::{CableGlobalProperties, CellDescription, Probe};
use crate::schedule::EventGenerator;
use crate::types::{CellConnection, CellGid, CellKind, GapJunction};

/// The static model description queried by the simulation engine. Every
/// query is a pure function of the recipe and the gid, so the engine may
/// call them in any order, any number of times, from any thread.
pub trait Recipe {
    fn num_cells(&self) -> usize;

    fn cell_kind(&self, gid: CellGid) -> CellKind;

    fn cell_description(&self, gid: CellGid) -> CellDescription;

    fn connections_on(&self, _gid: CellGid) -> Vec<CellConnection> {
        Vec::new()
    }

    fn gap_junctions_on(&self, _gid: CellGid) -> Vec<GapJunction> {
        Vec::new()
    }

    fn event_generators(&self, _gid: CellGid) -> Vec<EventGenerator> {
        Vec::new()
    }

    fn probes(&self, _gid: CellGid) -> Vec<Probe> {
        Vec::new()
    }

    fn global_properties(&self, _kind: CellKind) -> Option<CableGlobalProperties> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub num_cells: usize,
    pub num_connections: usize,
    pub num_inhibitory_connections: usize,
    pub num_gap_junctions: usize,
    pub num_event_generators: usize,
    pub num_probes: usize,
    pub connection_checksum: u64,
}

impl RecipeSummary {
    /// Queries every cell once. The checksum only depends on the set of
    /// (source, target) pairs, not on the order of the queries.
    pub fn collect<R: Recipe + ?Sized>(recipe: &R) -> Self {
        let mut summary = RecipeSummary {
            num_cells: recipe.num_cells(),
            ..Default::default()
        };

        for gid in 0..recipe.num_cells() {
            let connections = recipe.connections_on(gid);

            summary.num_connections += connections.len();
            summary.num_inhibitory_connections += connections
                .iter()
                .filter(|connection| connection.is_inhibitory())
                .count();

            for connection in &connections {
                summary.connection_checksum = summary
                    .connection_checksum
                    .wrapping_add(calculate_hash(&(connection.source.gid, gid)));
            }

            summary.num_gap_junctions += recipe.gap_junctions_on(gid).len();
            summary.num_event_generators += recipe.event_generators(gid).len();
            summary.num_probes += recipe.probes(gid).len();
        }

        summary
    }
}

fn calculate_hash<T: Hash>(t: &T) -> u64 {
    let mut s = DefaultHasher::new();
    t.hash(&mut s);
    s.finish()
}
