use crate::cable::{
    CableCellDescription, CableGlobalProperties, CableProperty, CellDescription, Decor,
    IonSettings, LabelDict, MPoint, Mechanism, Paintable, Placeable, Probe, SegmentTree, TAG_APIC,
    TAG_AXON, TAG_DEND, TAG_SOMA,
};
use crate::recipe::Recipe;
use crate::schedule::{EventGenerator, Schedule};
use crate::types::{CellGid, CellKind};

/// A recipe holding exactly one cable cell.
#[derive(Debug, Clone)]
pub struct SingleCellRecipe {
    cell: CableCellDescription,
    probes: Vec<Probe>,
    properties: CableGlobalProperties,
    event_generators: Vec<EventGenerator>,
    sampling: Option<Schedule>,
}

impl SingleCellRecipe {
    pub fn new(cell: CableCellDescription, properties: CableGlobalProperties) -> Self {
        Self {
            cell,
            probes: Vec::new(),
            properties,
            event_generators: Vec::new(),
            sampling: None,
        }
    }

    pub fn with_probe(mut self, probe: Probe) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn with_event_generator(mut self, event_generator: EventGenerator) -> Self {
        self.event_generators.push(event_generator);
        self
    }

    /// Schedule on which the probes are sampled.
    pub fn with_sampling(mut self, schedule: Schedule) -> Self {
        self.sampling = Some(schedule);
        self
    }

    pub fn cell(&self) -> &CableCellDescription {
        &self.cell
    }

    pub fn sampling(&self) -> Option<&Schedule> {
        self.sampling.as_ref()
    }
}

impl Recipe for SingleCellRecipe {
    fn num_cells(&self) -> usize {
        1
    }

    fn cell_kind(&self, _gid: CellGid) -> CellKind {
        CellKind::Cable
    }

    fn cell_description(&self, _gid: CellGid) -> CellDescription {
        CellDescription::Cable(self.cell.clone())
    }

    fn event_generators(&self, gid: CellGid) -> Vec<EventGenerator> {
        if gid == 0 {
            self.event_generators.clone()
        } else {
            Vec::new()
        }
    }

    fn probes(&self, gid: CellGid) -> Vec<Probe> {
        if gid == 0 {
            self.probes.clone()
        } else {
            Vec::new()
        }
    }

    fn global_properties(&self, kind: CellKind) -> Option<CableGlobalProperties> {
        match kind {
            CellKind::Cable => Some(self.properties.clone()),
            CellKind::Lif => None,
        }
    }
}

/// Sodium injected at the middle of a short cable at t = 0 diffuses towards
/// the soma and decays.
pub fn diffusion_model() -> SingleCellRecipe {
    let mut morphology = SegmentTree::new();
    let soma = morphology.append(
        None,
        MPoint::new(-3.0, 0.0, 0.0, 3.0),
        MPoint::new(3.0, 0.0, 0.0, 3.0),
        TAG_SOMA,
    );
    morphology.append(
        Some(soma),
        MPoint::new(3.0, 0.0, 0.0, 1.0),
        MPoint::new(33.0, 0.0, 0.0, 1.0),
        TAG_DEND,
    );

    let mut decor = Decor::new();
    decor
        .set_default(Paintable::Ion(
            IonSettings::new("na")
                .concentrations(1.0, 140.0)
                .rev_pot(50.0)
                .diff(0.005),
        ))
        .place(
            "(location 0 0.5)",
            Placeable::Synapse(Mechanism::new("inject/x=na").with("alpha", 200.0)),
            "Zap",
        )
        .paint(
            "(all)",
            Paintable::Density(Mechanism::new("decay/x=na").with("tau", 0.05)),
        )
        .paint(
            "(tag 1)",
            Paintable::Ion(IonSettings {
                int_con: Some(100.0),
                ..IonSettings::new("na").diff(0.01)
            }),
        )
        .discretization("(max-extent 2)");

    let cell = CableCellDescription {
        morphology,
        decor,
        labels: LabelDict::new(),
    };

    SingleCellRecipe::new(cell, CableGlobalProperties::neuron_defaults())
        .with_probe(Probe::IonDiffConcentration {
            ion: "na".to_string(),
        })
        .with_event_generator(EventGenerator::new(
            "Zap",
            0.005,
            Schedule::explicit(&[0.0]),
        ))
        .with_sampling(Schedule::regular(1.0))
}

/// Small planar neuron: soma, a forked basal dendrite, an apical dendrite
/// and a two-segment axon.
fn detailed_morphology() -> SegmentTree {
    let mut morphology = SegmentTree::new();
    let soma = morphology.append(
        None,
        MPoint::new(-3.0, 0.0, 0.0, 3.0),
        MPoint::new(3.0, 0.0, 0.0, 3.0),
        TAG_SOMA,
    );

    let trunk = morphology.append(
        Some(soma),
        MPoint::new(3.0, 0.0, 0.0, 0.8),
        MPoint::new(13.0, 0.0, 0.0, 0.8),
        TAG_DEND,
    );
    morphology.append(
        Some(trunk),
        MPoint::new(13.0, 0.0, 0.0, 0.5),
        MPoint::new(23.0, 10.0, 0.0, 0.5),
        TAG_DEND,
    );
    morphology.append(
        Some(trunk),
        MPoint::new(13.0, 0.0, 0.0, 0.5),
        MPoint::new(23.0, -10.0, 0.0, 0.5),
        TAG_DEND,
    );

    let apical = morphology.append(
        Some(soma),
        MPoint::new(0.0, 3.0, 0.0, 2.0),
        MPoint::new(0.0, 20.0, 0.0, 1.6),
        TAG_APIC,
    );
    morphology.append(
        Some(apical),
        MPoint::new(0.0, 20.0, 0.0, 1.6),
        MPoint::new(-5.0, 35.0, 0.0, 0.5),
        TAG_APIC,
    );

    let axon = morphology.append(
        Some(soma),
        MPoint::new(-3.0, 0.0, 0.0, 0.7),
        MPoint::new(-13.0, 0.0, 0.0, 0.7),
        TAG_AXON,
    );
    morphology.append(
        Some(axon),
        MPoint::new(-13.0, 0.0, 0.0, 0.7),
        MPoint::new(-33.0, 0.0, 0.0, 0.4),
        TAG_AXON,
    );

    morphology
}

/// Passive cell with active `"custom"` parts, driven by three current pulses
/// at the root and watched by a spike detector at the axon terminal.
pub fn detailed_model() -> SingleCellRecipe {
    let mut labels = LabelDict::new();
    labels
        .set("all", "(all)")
        .set("gt_1.5", "(radius-ge (region \"all\") 1.5)")
        .set("custom", "(join (region \"apic\") (region \"gt_1.5\"))")
        .set("root", "(root)")
        .set("terminal", "(terminal)")
        .set(
            "custom_terminal",
            "(restrict (locset \"terminal\") (region \"custom\"))",
        )
        .set(
            "axon_terminal",
            "(restrict (locset \"terminal\") (region \"axon\"))",
        )
        .add_swc_tags();

    let mut decor = Decor::new();
    decor
        .set_default(Paintable::Property(CableProperty::Vm(-55.0)))
        .set_default(Paintable::Ion(
            IonSettings::new("na")
                .concentrations(10.0, 140.0)
                .rev_pot(50.0)
                .method("nernst/na"),
        ))
        .set_default(Paintable::Ion(
            IonSettings::new("k").concentrations(54.4, 2.5).rev_pot(-77.0),
        ))
        .paint("\"custom\"", Paintable::Property(CableProperty::TempK(270.0)))
        .paint("\"soma\"", Paintable::Property(CableProperty::Vm(-50.0)))
        .paint("\"all\"", Paintable::Density(Mechanism::new("pas")))
        .paint("\"custom\"", Paintable::Density(Mechanism::new("hh")))
        .paint(
            "\"dend\"",
            Paintable::Density(Mechanism::new("Ih").with("gbar", 0.001)),
        );

    for (i, tstart) in [10.0, 30.0, 50.0].into_iter().enumerate() {
        decor.place(
            "\"root\"",
            Placeable::IClamp {
                tstart,
                duration: 1.0,
                current: 2.0,
            },
            format!("iclamp{}", i),
        );
    }

    decor
        .place(
            "\"axon_terminal\"",
            Placeable::ThresholdDetector { threshold: -10.0 },
            "detector",
        )
        .discretization("(replace (single (region \"soma\")) (max-extent 1.0))");

    let cell = CableCellDescription {
        morphology: detailed_morphology(),
        decor,
        labels,
    };

    let properties = CableGlobalProperties {
        defaults: vec![
            CableProperty::Vm(-65.0),
            CableProperty::TempK(300.0),
            CableProperty::RL(35.4),
            CableProperty::Cm(0.01),
        ],
        ions: vec![
            IonSettings::new("na")
                .concentrations(10.0, 140.0)
                .rev_pot(50.0)
                .method("nernst/na"),
            IonSettings::new("k").concentrations(54.4, 2.5).rev_pot(-77.0),
            IonSettings::new("ca")
                .concentrations(5e-5, 2.0)
                .rev_pot(132.5),
        ],
        catalogues: vec!["default".to_string()],
    }
    .with_catalogue("allen");

    SingleCellRecipe::new(cell, properties)
        .with_probe(Probe::MembraneVoltage {
            locset: "\"custom_terminal\"".to_string(),
        })
        .with_sampling(Schedule::regular(0.02))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeSummary;

    #[test]
    fn diffusion() {
        let recipe = diffusion_model();

        assert_eq!(recipe.num_cells(), 1);
        assert_eq!(recipe.cell().morphology.len(), 2);
        assert!(recipe.cell().decor.placement("Zap").is_some());

        let generators = recipe.event_generators(0);
        assert_eq!(generators.len(), 1);
        assert_eq!(generators[0].target, "Zap");
        assert_eq!(generators[0].schedule, Schedule::explicit(&[0.0]));

        assert_eq!(
            recipe.probes(0),
            [Probe::IonDiffConcentration {
                ion: "na".to_string()
            }]
        );
        assert!(recipe.probes(1).is_empty());
        assert_eq!(recipe.sampling(), Some(&Schedule::regular(1.0)));
    }

    #[test]
    fn detailed() {
        let recipe = detailed_model();
        let cell = recipe.cell();

        assert_eq!(cell.morphology.len(), 8);
        assert_eq!(cell.morphology.count_tagged(TAG_APIC), 2);
        assert_eq!(cell.labels.len(), 11);
        assert_eq!(cell.labels.get("apic"), Some("(tag 4)"));
        assert!(cell.labels.get("custom_terminal").is_some());

        let clamp_starts: Vec<f64> = (0..3)
            .filter_map(|i| match &cell.decor.placement(&format!("iclamp{}", i))?.item {
                Placeable::IClamp { tstart, .. } => Some(*tstart),
                _ => None,
            })
            .collect();
        assert_eq!(clamp_starts, [10.0, 30.0, 50.0]);

        let detector = cell.decor.placement("detector").unwrap();
        assert_eq!(detector.locset, "\"axon_terminal\"");
        assert_eq!(
            detector.item,
            Placeable::ThresholdDetector { threshold: -10.0 }
        );
        assert!(cell.decor.discretization.is_some());

        let ih = cell.decor.densities_on("\"dend\"").next().unwrap();
        assert_eq!(ih.name, "Ih");
        assert_eq!(ih.param("gbar"), Some(0.001));

        let props = recipe.global_properties(CellKind::Cable).unwrap();
        assert_eq!(props.catalogues, ["default", "allen"]);
        assert_eq!(props.ion("na").unwrap().method.as_deref(), Some("nernst/na"));
        assert!(recipe.global_properties(CellKind::Lif).is_none());

        assert_eq!(
            recipe.probes(0),
            [Probe::MembraneVoltage {
                locset: "\"custom_terminal\"".to_string()
            }]
        );
        assert!(recipe.event_generators(0).is_empty());
        assert_eq!(recipe.sampling(), Some(&Schedule::regular(0.02)));
    }

    #[test]
    fn summary() {
        let summary = RecipeSummary::collect(&diffusion_model());

        assert_eq!(summary.num_cells, 1);
        assert_eq!(summary.num_connections, 0);
        assert_eq!(summary.num_gap_junctions, 0);
        assert_eq!(summary.num_event_generators, 1);
        assert_eq!(summary.num_probes, 1);
    }
}
