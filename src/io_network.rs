//! Inferior olive network: cable cells in small clusters coupled by gap
//! junctions, with a fraction of bridge cells that couple across clusters.

use log::{debug, trace, warn};
use rand::distributions::{Bernoulli, Uniform};
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::Rng;
use simple_error::try_with;
use statrs::distribution::Normal;

use crate::cable::{
    CableCellDescription, CableGlobalProperties, CableProperty, CellDescription, Decor, IonSettings,
    LabelDict, MPoint, Mechanism, Paintable, Placeable, Probe, SegmentTree, TAG_AXON, TAG_DEND,
    TAG_SOMA,
};
use crate::error::{RecipeError, RecipeResult};
use crate::params::{self, IoNetworkParams};
use crate::recipe::Recipe;
use crate::sampling::cell_rng;
use crate::schedule::Schedule;
use crate::single_cell::SingleCellRecipe;
use crate::types::{CellGid, CellGlobalLabel, CellKind, GapJunction, JunctionDraw};
use crate::util;

pub const CATALOGUE: &str = "io";
pub const JUNCTION_MECHANISM: &str = "cx36";

#[derive(Debug, Clone)]
pub struct IoNetworkRecipe {
    params: IoNetworkParams,
    bridge_dist: Bernoulli,
    junction_count_dist: Uniform<usize>,
    site_dist: Uniform<usize>,
}

impl IoNetworkRecipe {
    pub fn new(params: IoNetworkParams) -> RecipeResult<Self> {
        try_with!(
            params::validate_io_network_params(&params),
            "invalid IO network parameters"
        );

        let bridge_dist = Bernoulli::new(params.bridge_fraction)
            .map_err(|err| RecipeError::invalid_configuration(err.to_string()))?;

        debug!(
            "IO network recipe: {} cells in clusters of {}, bridge fraction {}",
            params.ncells, params.cluster_size, params.bridge_fraction
        );

        Ok(Self {
            bridge_dist,
            junction_count_dist: Uniform::from(params.junctions_per_cell.clone()),
            site_dist: Uniform::from(0..params.dend_count),
            params,
        })
    }

    pub fn params(&self) -> &IoNetworkParams {
        &self.params
    }

    pub fn is_bridge(&self, gid: CellGid) -> bool {
        self.bridge_dist.sample(&mut cell_rng(self.params.seed, gid))
    }

    /// Every junction draw for `gid`, including peers that fall outside the
    /// population. Only the last cluster can reach past the end, when
    /// `ncells` is not a multiple of `cluster_size`.
    pub fn draw_gap_junctions(&self, gid: CellGid) -> Vec<JunctionDraw> {
        if gid >= self.params.ncells {
            return Vec::new();
        }

        let mut rng = cell_rng(self.params.seed, gid);
        let is_bridge = self.bridge_dist.sample(&mut rng);
        let num_junctions = self.junction_count_dist.sample(&mut rng);

        (0..num_junctions)
            .map(|_| {
                let remote_site = self.site_dist.sample(&mut rng);
                let local_site = self.site_dist.sample(&mut rng);

                let peer = if is_bridge {
                    self.draw_bridge_peer(gid, &mut rng)
                } else {
                    self.draw_cluster_peer(gid, &mut rng)
                };

                if peer >= self.params.ncells {
                    return JunctionDraw::OutOfRange { gid, peer };
                }

                trace!("{} -> {}", gid, peer);

                JunctionDraw::Accepted(GapJunction::new(
                    CellGlobalLabel::new(peer, junction_label(remote_site)),
                    CellGlobalLabel::new(gid, junction_label(local_site)),
                    self.params.conductance,
                ))
            })
            .collect()
    }

    fn draw_bridge_peer(&self, gid: CellGid, rng: &mut StdRng) -> CellGid {
        util::shift_past_excluded(rng.gen_range(0..self.params.ncells - 1), gid)
    }

    fn draw_cluster_peer(&self, gid: CellGid, rng: &mut StdRng) -> CellGid {
        let cluster = util::cluster_range(gid, self.params.cluster_size);
        let offset = rng.gen_range(0..cluster.len() - 1);
        cluster.start + util::shift_past_excluded(offset, gid - cluster.start)
    }

    fn build_cell(&self, gid: CellGid) -> CableCellDescription {
        let mut rng = cell_rng(self.params.seed, gid);

        let axon_end = rng.gen_range(41..=50) as f64;
        let (mut morphology, soma) = soma_and_axon(axon_end);
        let mut decor = default_decor(Some(&mut rng));
        let mut labels = default_labels();

        for site in 0..self.params.dend_count {
            let dend_end = rng.gen_range(180..=250) as f64;
            let dend = append_dendrite(&mut morphology, soma, dend_end);

            let label = junction_label(site);
            labels.set(label.clone(), format!("(distal (segment {}))", dend));
            decor.place(
                format!("\"{}\"", label),
                Placeable::Junction(Mechanism::new(JUNCTION_MECHANISM)),
                label,
            );
        }

        CableCellDescription {
            morphology,
            decor,
            labels,
        }
    }
}

fn soma_and_axon(axon_end: f64) -> (SegmentTree, usize) {
    let mut morphology = SegmentTree::new();
    let soma = morphology.append(
        None,
        MPoint::new(-12.0, 0.0, 0.0, 12.0),
        MPoint::new(0.0, 0.0, 0.0, 12.0),
        TAG_SOMA,
    );
    morphology.append(
        Some(soma),
        MPoint::new(axon_end, 0.0, 0.0, 2.0),
        MPoint::new(-12.0, 0.0, 0.0, 2.0),
        TAG_AXON,
    );
    (morphology, soma)
}

fn append_dendrite(morphology: &mut SegmentTree, soma: usize, end: f64) -> usize {
    morphology.append(
        Some(soma),
        MPoint::new(6.0, 0.0, 0.0, 2.0),
        MPoint::new(end, 0.0, 0.0, 2.0),
        TAG_DEND,
    )
}

fn default_labels() -> LabelDict {
    let mut labels = LabelDict::new();
    labels
        .set("all", "(all)")
        .set("root", "(root)")
        .set("soma", format!("(tag {})", TAG_SOMA))
        .set("axon", format!("(tag {})", TAG_AXON))
        .set("dend", format!("(tag {})", TAG_DEND));
    labels
}

fn junction_label(site: usize) -> String {
    format!("gj{}", site)
}

/// Normal jitter with a 5% relative spread.
fn jitter(rng: &mut StdRng, value: f64) -> f64 {
    match Normal::new(value, (value / 20.0).abs()) {
        Ok(dist) => dist.sample(rng),
        Err(_) => value,
    }
}

fn density(name: &str, conductance: f64) -> Paintable {
    Paintable::Density(Mechanism::new(name).with("conductance", conductance))
}

/// IO channel set. Parameters are jittered when `rng` is given and taken at
/// their nominal values otherwise.
fn default_decor(mut rng: Option<&mut StdRng>) -> Decor {
    let mut vary = |value: f64| match rng.as_deref_mut() {
        Some(rng) => jitter(rng, value),
        None => value,
    };
    let mut decor = Decor::new();

    decor
        .paint("\"soma\"", Paintable::Density(Mechanism::new("hh")))
        .paint("\"soma\"", density("na_s", vary(0.030)))
        .paint(
            "\"soma\"",
            Paintable::Density(
                Mechanism::new("kdr")
                    .with("conductance", vary(0.030))
                    .with("ek", -75.0),
            ),
        )
        .paint("\"soma\"", density("cal", vary(0.045)))
        .paint("\"dend\"", density("cah", vary(0.010)))
        .paint(
            "\"dend\"",
            Paintable::Density(
                Mechanism::new("kca")
                    .with("conductance", vary(0.220))
                    .with("ek", -75.0),
            ),
        )
        .paint(
            "\"dend\"",
            Paintable::Density(
                Mechanism::new("h")
                    .with("conductance", vary(0.015))
                    .with("eh", -43.0),
            ),
        )
        .paint("\"dend\"", density("cacc", vary(0.0)))
        .paint("\"axon\"", density("na_a", vary(0.200)))
        .paint(
            "\"axon\"",
            Paintable::Density(
                Mechanism::new("k")
                    .with("conductance", vary(0.200))
                    .with("ek", -75.0),
            ),
        )
        .paint(
            "\"soma\"",
            Paintable::Density(
                Mechanism::new("k")
                    .with("conductance", vary(0.015))
                    .with("ek", -75.0),
            ),
        )
        .paint(
            "\"all\"",
            Paintable::Density(
                Mechanism::new("leak")
                    .with("conductance", vary(1.3e-05))
                    .with("eleak", 10.0),
            ),
        );

    let resting_potential = -vary(65.0);
    decor
        .set_default(Paintable::Property(CableProperty::Cm(0.01)))
        .set_default(Paintable::Property(CableProperty::Vm(resting_potential)))
        .paint("\"all\"", Paintable::Property(CableProperty::RL(100.0)));

    let ca_rev_pot = vary(120.0);
    let na_rev_pot = vary(55.0);
    let k_rev_pot = -vary(75.0);
    decor
        .paint("\"all\"", Paintable::Ion(IonSettings::new("ca").rev_pot(ca_rev_pot)))
        .paint("\"all\"", Paintable::Ion(IonSettings::new("na").rev_pot(na_rev_pot)))
        .paint("\"all\"", Paintable::Ion(IonSettings::new("k").rev_pot(k_rev_pot)))
        .paint(
            "\"all\"",
            Paintable::Density(Mechanism::new("ca_conc").with("initialConcentration", 3.7152)),
        );

    decor
}

/// A lone IO cell with 15 dendrites of equal length and nominal channel
/// densities, recorded at the root once per millisecond.
pub fn single_cell() -> SingleCellRecipe {
    let (mut morphology, soma) = soma_and_axon(-40.0);
    for _ in 0..15 {
        append_dendrite(&mut morphology, soma, 200.0);
    }

    let cell = CableCellDescription {
        morphology,
        decor: default_decor(None),
        labels: default_labels(),
    };

    SingleCellRecipe::new(
        cell,
        CableGlobalProperties::neuron_defaults().with_catalogue(CATALOGUE),
    )
    .with_probe(Probe::MembraneVoltage {
        locset: "\"root\"".to_string(),
    })
    .with_sampling(Schedule::regular(1.0))
}

impl Recipe for IoNetworkRecipe {
    fn num_cells(&self) -> usize {
        self.params.ncells
    }

    fn cell_kind(&self, _gid: CellGid) -> CellKind {
        CellKind::Cable
    }

    fn cell_description(&self, gid: CellGid) -> CellDescription {
        CellDescription::Cable(self.build_cell(gid))
    }

    fn gap_junctions_on(&self, gid: CellGid) -> Vec<GapJunction> {
        let draws = self.draw_gap_junctions(gid);
        let mut skipped = 0;

        let junctions: Vec<GapJunction> = draws
            .into_iter()
            .filter_map(|draw| match draw {
                JunctionDraw::Accepted(junction) => Some(junction),
                JunctionDraw::OutOfRange { peer, .. } => {
                    debug!("skipping gap junction {} -> {}: peer out of range", gid, peer);
                    skipped += 1;
                    None
                }
            })
            .collect();

        if skipped > 0 {
            warn!(
                "cell {}: {} of {} gap junction peers out of range",
                gid,
                skipped,
                junctions.len() + skipped
            );
        }

        junctions
    }

    fn probes(&self, _gid: CellGid) -> Vec<Probe> {
        vec![Probe::MembraneVoltage {
            locset: "\"root\"".to_string(),
        }]
    }

    fn global_properties(&self, kind: CellKind) -> Option<CableGlobalProperties> {
        match kind {
            CellKind::Cable => Some(CableGlobalProperties::neuron_defaults().with_catalogue(CATALOGUE)),
            CellKind::Lif => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util;
    use float_cmp::assert_approx_eq;

    fn make_recipe(ncells: usize, bridge_fraction: f64) -> IoNetworkRecipe {
        let mut params = test_util::get_template_io_network_params();
        params.ncells = ncells;
        params.bridge_fraction = bridge_fraction;
        IoNetworkRecipe::new(params).unwrap()
    }

    #[test]
    fn cluster_mode_stays_in_block() {
        let recipe = make_recipe(16, 0.0);

        for gid in 0..16 {
            let block = util::cluster_range(gid, 4);
            let junctions = recipe.gap_junctions_on(gid);

            assert!((5..10).contains(&junctions.len()));
            for junction in junctions {
                assert_eq!(junction.peer_b.gid, gid);
                assert!(block.contains(&junction.peer_a.gid));
                assert_ne!(junction.peer_a.gid, gid);
            }
        }
    }

    #[test]
    fn bridge_mode_reaches_everyone_but_self() {
        let recipe = make_recipe(16, 1.0);
        let mut peers = crate::types::HashSet::default();

        for gid in 0..16 {
            assert!(recipe.is_bridge(gid));
            for junction in recipe.gap_junctions_on(gid) {
                assert_ne!(junction.peer_a.gid, gid);
                assert!(junction.peer_a.gid < 16);
                peers.insert(junction.peer_a.gid);
            }
        }

        assert!(peers.iter().any(|peer| !util::cluster_range(0, 4).contains(peer)));
    }

    #[test]
    fn out_of_range_peers_are_reported() {
        let recipe = make_recipe(10, 0.0);
        let mut skipped = 0;

        for gid in 0..8 {
            assert!(recipe
                .draw_gap_junctions(gid)
                .iter()
                .all(|draw| !draw.is_out_of_range()));
        }

        for gid in 8..10 {
            let draws = recipe.draw_gap_junctions(gid);
            let accepted = recipe.gap_junctions_on(gid);
            let out_of_range = draws.iter().filter(|draw| draw.is_out_of_range()).count();

            assert_eq!(accepted.len() + out_of_range, draws.len());
            for draw in &draws {
                if let JunctionDraw::OutOfRange { gid: from, peer } = draw {
                    assert_eq!(*from, gid);
                    assert!((10..12).contains(peer));
                }
            }
            skipped += out_of_range;
        }

        assert!(skipped > 0);
    }

    #[test]
    fn junction_sites_and_conductance() {
        let recipe = make_recipe(16, 0.1);

        for gid in 0..16 {
            for junction in recipe.gap_junctions_on(gid) {
                assert_approx_eq!(f64, junction.conductance, 0.05);
                for label in [&junction.peer_a.label, &junction.peer_b.label] {
                    let site: usize = label.trim_start_matches("gj").parse().unwrap();
                    assert!(site < 10);
                }
            }
        }
    }

    #[test]
    fn repeatable_draws() {
        let recipe = make_recipe(16, 0.5);

        for gid in (0..16).rev() {
            assert_eq!(recipe.draw_gap_junctions(gid), recipe.draw_gap_junctions(gid));
        }
    }

    #[test]
    fn unknown_gid() {
        let recipe = make_recipe(16, 0.1);
        assert!(recipe.gap_junctions_on(16).is_empty());
    }

    #[test]
    fn cell_description() {
        let recipe = make_recipe(4, 0.0);

        let cell = match recipe.cell_description(2) {
            CellDescription::Cable(cell) => cell,
            CellDescription::Lif(_) => panic!("expected a cable cell"),
        };

        assert_eq!(cell.morphology.len(), 12);
        assert_eq!(cell.morphology.count_tagged(TAG_DEND), 10);
        assert_eq!(cell.labels.get("gj3"), Some("(distal (segment 5))"));
        assert!(cell.decor.placement("gj9").is_some());

        for segment in cell.morphology.segments().iter().filter(|s| s.tag == TAG_DEND) {
            assert!((180.0..=250.0).contains(&segment.dist.x));
        }

        let kdr = cell
            .decor
            .densities_on("\"soma\"")
            .find(|m| m.name == "kdr")
            .unwrap();
        let conductance = kdr.param("conductance").unwrap();
        assert!(conductance > 0.02 && conductance < 0.04);

        let cacc = cell
            .decor
            .densities_on("\"dend\"")
            .find(|m| m.name == "cacc")
            .unwrap();
        assert_eq!(cacc.param("conductance"), Some(0.0));

        assert_eq!(recipe.cell_description(2), recipe.cell_description(2));
        assert_ne!(recipe.cell_description(2), recipe.cell_description(3));
    }

    #[test]
    fn out_of_range_summary_is_a_warning() {
        test_util::record_logs();
        let mut skipped = 0;

        for seed in 0..4 {
            let mut params = test_util::get_template_io_network_params();
            params.ncells = 7;
            params.bridge_fraction = 0.0;
            params.seed = seed;
            let recipe = IoNetworkRecipe::new(params).unwrap();

            for gid in 4..7 {
                let draws = recipe.draw_gap_junctions(gid);
                let accepted = recipe.gap_junctions_on(gid).len();
                let out_of_range: Vec<CellGid> = draws
                    .iter()
                    .filter_map(|draw| match draw {
                        JunctionDraw::OutOfRange { peer, .. } => Some(*peer),
                        JunctionDraw::Accepted(_) => None,
                    })
                    .collect();

                if out_of_range.is_empty() {
                    continue;
                }

                assert!(test_util::was_logged(
                    log::Level::Warn,
                    &format!(
                        "cell {}: {} of {} gap junction peers out of range",
                        gid,
                        out_of_range.len(),
                        accepted + out_of_range.len()
                    )
                ));
                for peer in &out_of_range {
                    assert_eq!(*peer, 7);
                    assert!(test_util::was_logged(
                        log::Level::Debug,
                        &format!("skipping gap junction {} -> {}: peer out of range", gid, peer)
                    ));
                }
                skipped += out_of_range.len();
            }
        }

        assert!(skipped > 0);
    }

    #[test]
    fn lone_cell() {
        let recipe = single_cell();
        let cell = recipe.cell();

        assert_eq!(recipe.num_cells(), 1);
        assert_eq!(cell.morphology.len(), 17);
        assert_eq!(cell.morphology.count_tagged(TAG_DEND), 15);
        assert!(cell
            .morphology
            .segments()
            .iter()
            .filter(|s| s.tag == TAG_DEND)
            .all(|s| s.dist.x == 200.0));
        assert_eq!(cell.morphology.segments()[1].prox.x, -40.0);
        assert!(cell.decor.placements.is_empty());

        let kdr = cell
            .decor
            .densities_on("\"soma\"")
            .find(|m| m.name == "kdr")
            .unwrap();
        assert_eq!(kdr.param("conductance"), Some(0.030));
        assert_eq!(cell.decor, single_cell().cell().decor);

        assert_eq!(
            recipe.probes(0),
            [Probe::MembraneVoltage {
                locset: "\"root\"".to_string()
            }]
        );
        assert_eq!(recipe.sampling(), Some(&Schedule::regular(1.0)));
        let props = recipe.global_properties(CellKind::Cable).unwrap();
        assert!(props.catalogues.iter().any(|c| c == CATALOGUE));
    }

    #[test]
    fn probes_and_properties() {
        let recipe = make_recipe(4, 0.0);

        assert_eq!(recipe.probes(0).len(), 1);
        let props = recipe.global_properties(CellKind::Cable).unwrap();
        assert!(props.catalogues.iter().any(|c| c == CATALOGUE));
        assert!(recipe.global_properties(CellKind::Lif).is_none());
    }
}
