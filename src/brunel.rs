//! Brunel network: `nexc` excitatory and `ninh` inhibitory LIF cells with
//! sparse random recurrent connectivity and Poisson background drive.
//!
//! Each cell receives `in_degree_prop * nexc` excitatory and
//! `in_degree_prop * ninh` inhibitory inputs, drawn without self-loops, plus
//! `next` external Poisson sources that are collapsed into a single source of
//! rate `next * poiss_lambda`.

use std::ops::Range;

use log::debug;
use simple_error::try_with;

use crate::cable::{CellDescription, LifCellDescription};
use crate::error::RecipeResult;
use crate::params::{self, BrunelParams};
use crate::recipe::Recipe;
use crate::sampling::{self, cell_rng};
use crate::schedule::{EventGenerator, Schedule};
use crate::types::{CellConnection, CellGid, CellGlobalLabel, CellKind};
use crate::util;

pub const SOURCE_LABEL: &str = "src";
pub const TARGET_LABEL: &str = "tgt";

#[derive(Debug, Clone)]
pub struct BrunelRecipe {
    params: BrunelParams,
    in_degree_exc: usize,
    in_degree_inh: usize,
    weight_inh: f64,
    lambda: f64,
}

impl BrunelRecipe {
    pub fn new(params: BrunelParams) -> RecipeResult<Self> {
        try_with!(
            params::validate_brunel_params(&params),
            "invalid Brunel network parameters"
        );

        let in_degree_exc = util::in_degree(params.in_degree_prop, params.nexc);
        let in_degree_inh = util::in_degree(params.in_degree_prop, params.ninh);

        debug!(
            "Brunel recipe: {} excitatory, {} inhibitory cells, in-degree {} + {}",
            params.nexc, params.ninh, in_degree_exc, in_degree_inh
        );

        Ok(Self {
            in_degree_exc,
            in_degree_inh,
            weight_inh: -params.rel_inh_strength * params.weight,
            lambda: params.next as f64 * params.poiss_lambda,
            params,
        })
    }

    pub fn params(&self) -> &BrunelParams {
        &self.params
    }

    pub fn in_degree_exc(&self) -> usize {
        self.in_degree_exc
    }

    pub fn in_degree_inh(&self) -> usize {
        self.in_degree_inh
    }

    pub fn weight_inh(&self) -> f64 {
        self.weight_inh
    }

    /// Rate of the collapsed external Poisson drive in kHz.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn excitatory_range(&self) -> Range<CellGid> {
        0..self.params.nexc
    }

    pub fn inhibitory_range(&self) -> Range<CellGid> {
        self.params.nexc..self.params.nexc + self.params.ninh
    }

    pub fn is_excitatory(&self, gid: CellGid) -> bool {
        self.excitatory_range().contains(&gid)
    }

    fn draw_count(&self, in_degree: usize, gid: CellGid, pool: &Range<CellGid>) -> usize {
        if self.params.in_degree_prop == 1.0 {
            sampling::available_pool_size(gid, pool)
        } else {
            in_degree
        }
    }

    fn connection(&self, source: CellGid, weight: f64) -> CellConnection {
        CellConnection::new(
            CellGlobalLabel::new(source, SOURCE_LABEL),
            TARGET_LABEL,
            weight,
            self.params.delay,
        )
    }
}

impl Recipe for BrunelRecipe {
    fn num_cells(&self) -> usize {
        self.params.nexc + self.params.ninh
    }

    fn cell_kind(&self, _gid: CellGid) -> CellKind {
        CellKind::Lif
    }

    fn cell_description(&self, _gid: CellGid) -> CellDescription {
        CellDescription::Lif(LifCellDescription {
            source: SOURCE_LABEL.to_string(),
            target: TARGET_LABEL.to_string(),
            tau_m: 10.0,
            v_th: 10.0,
            c_m: 20.0,
            e_l: 0.0,
            v_m: 0.0,
            v_reset: 0.0,
            t_ref: 2.0,
        })
    }

    /// Excitatory inputs first, then inhibitory ones.
    fn connections_on(&self, gid: CellGid) -> Vec<CellConnection> {
        if gid >= self.num_cells() {
            return Vec::new();
        }

        let mut rng = cell_rng(self.params.seed, gid);

        let exc_pool = self.excitatory_range();
        let exc_count = self.draw_count(self.in_degree_exc, gid, &exc_pool);
        let mut connections: Vec<CellConnection> =
            sampling::shuffled_prefix(&mut rng, gid, exc_pool, exc_count)
                .into_iter()
                .map(|source| self.connection(source, self.params.weight))
                .collect();

        let inh_pool = self.inhibitory_range();
        let inh_count = self.draw_count(self.in_degree_inh, gid, &inh_pool);
        connections.extend(
            sampling::shuffled_prefix(&mut rng, gid, inh_pool, inh_count)
                .into_iter()
                .map(|source| self.connection(source, self.weight_inh)),
        );

        connections
    }

    fn event_generators(&self, gid: CellGid) -> Vec<EventGenerator> {
        if gid >= self.num_cells() {
            return Vec::new();
        }

        let schedule = Schedule::poisson(
            0.0,
            self.lambda,
            self.params.seed.wrapping_add(gid as u64),
        );
        vec![EventGenerator::new(
            TARGET_LABEL,
            self.params.weight,
            schedule,
        )]
    }
}
