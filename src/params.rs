use std::ops::Range;

use serde::{Deserialize, Serialize};
use simple_error::SimpleError;

use crate::util;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RecipeParams {
    Brunel(BrunelParams),
    IoNetwork(IoNetworkParams),
}

/// Sparse network of excitatory and inhibitory LIF cells driven by Poisson
/// input. Each cell receives `in_degree_prop` of each population as inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrunelParams {
    pub nexc: usize,
    pub ninh: usize,
    pub next: usize,
    pub in_degree_prop: f64,
    pub weight: f64,
    pub delay: f64,
    pub rel_inh_strength: f64,
    pub poiss_lambda: f64,
    pub seed: u64,
}

/// Clustered network of cable cells coupled by gap junctions. A fraction of
/// the cells bridges into the whole population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoNetworkParams {
    pub ncells: usize,
    pub cluster_size: usize,
    pub dend_count: usize,
    pub bridge_fraction: f64,
    pub junctions_per_cell: Range<usize>,
    pub conductance: f64,
    pub seed: u64,
}

impl Default for BrunelParams {
    fn default() -> Self {
        Self {
            nexc: 400,
            ninh: 100,
            next: 40,
            in_degree_prop: 0.05,
            weight: 1.2,
            delay: 0.1,
            rel_inh_strength: 1.0,
            poiss_lambda: 1.0,
            seed: 42,
        }
    }
}

impl Default for IoNetworkParams {
    fn default() -> Self {
        Self {
            ncells: 16,
            cluster_size: 4,
            dend_count: 10,
            bridge_fraction: 0.1,
            junctions_per_cell: 5..10,
            conductance: 0.05,
            seed: 0,
        }
    }
}

pub fn validate_recipe_params(recipe_params: &RecipeParams) -> Result<(), SimpleError> {
    match recipe_params {
        RecipeParams::Brunel(params) => validate_brunel_params(params),
        RecipeParams::IoNetwork(params) => validate_io_network_params(params),
    }
}

pub fn validate_brunel_params(params: &BrunelParams) -> Result<(), SimpleError> {
    if !(params.in_degree_prop > 0.0 && params.in_degree_prop <= 1.0) {
        return Err(SimpleError::new("in_degree_prop must be in (0, 1]"));
    }

    if !params.weight.is_finite() || params.weight < 0.0 {
        return Err(SimpleError::new("weight must be finite and not negative"));
    }

    if !params.delay.is_finite() || params.delay < 0.0 {
        return Err(SimpleError::new("delay must be finite and not negative"));
    }

    if !params.rel_inh_strength.is_finite() || params.rel_inh_strength < 0.0 {
        return Err(SimpleError::new(
            "rel_inh_strength must be finite and not negative",
        ));
    }

    if !params.poiss_lambda.is_finite() || params.poiss_lambda < 0.0 {
        return Err(SimpleError::new(
            "poiss_lambda must be finite and not negative",
        ));
    }

    validate_in_degree(params.in_degree_prop, params.nexc, "excitatory")?;
    validate_in_degree(params.in_degree_prop, params.ninh, "inhibitory")?;

    Ok(())
}

// Cells of a population never target themselves, so one member of each pool
// is ineligible for its own draws. A proportion of 1.0 means all eligible.
fn validate_in_degree(
    in_degree_prop: f64,
    pool_size: usize,
    population: &str,
) -> Result<(), SimpleError> {
    if in_degree_prop == 1.0 || pool_size == 0 {
        return Ok(());
    }

    let in_degree = util::in_degree(in_degree_prop, pool_size);
    let eligible = pool_size - 1;

    if in_degree > eligible {
        return Err(SimpleError::new(format!(
            "in-degree of {} {} sources exceeds the {} eligible cells",
            in_degree, population, eligible
        )));
    }

    Ok(())
}

pub fn validate_io_network_params(params: &IoNetworkParams) -> Result<(), SimpleError> {
    if params.cluster_size < 2 {
        return Err(SimpleError::new("cluster_size must be at least 2"));
    }

    if params.dend_count == 0 {
        return Err(SimpleError::new("dend_count must be strictly positive"));
    }

    if !(0.0..=1.0).contains(&params.bridge_fraction) {
        return Err(SimpleError::new("bridge_fraction must be in [0, 1]"));
    }

    if params.bridge_fraction > 0.0 && params.ncells < 2 {
        return Err(SimpleError::new(
            "bridging requires at least 2 cells",
        ));
    }

    if params.junctions_per_cell.is_empty() {
        return Err(SimpleError::new("junctions_per_cell must not be empty"));
    }

    if !params.conductance.is_finite() || params.conductance < 0.0 {
        return Err(SimpleError::new(
            "conductance must be finite and not negative",
        ));
    }

    Ok(())
}
