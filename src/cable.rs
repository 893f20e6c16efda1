//! Static cell descriptions consumed by the simulation engine.
//!
//! Nothing here is discretized or integrated; morphologies, decorations and
//! global properties are plain data that the engine interprets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::CellKind;

pub const TAG_SOMA: u32 = 1;
pub const TAG_AXON: u32 = 2;
pub const TAG_DEND: u32 = 3;
pub const TAG_APIC: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
}

impl MPoint {
    pub fn new(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Self { x, y, z, radius }
    }

    pub fn distance(&self, other: &MPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub parent: Option<usize>,
    pub prox: MPoint,
    pub dist: MPoint,
    pub tag: u32,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.prox.distance(&self.dist)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentTree {
    segments: Vec<Segment>,
}

impl SegmentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment and returns its index. `parent` must be `None` or
    /// the index of an existing segment.
    pub fn append(&mut self, parent: Option<usize>, prox: MPoint, dist: MPoint, tag: u32) -> usize {
        debug_assert!(parent.map_or(true, |parent| parent < self.segments.len()));

        self.segments.push(Segment {
            parent,
            prox,
            dist,
            tag,
        });
        self.segments.len() - 1
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn count_tagged(&self, tag: u32) -> usize {
        self.segments.iter().filter(|segment| segment.tag == tag).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelDict {
    labels: BTreeMap<String, String>,
}

impl LabelDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, expression: impl Into<String>) -> &mut Self {
        self.labels.insert(name.into(), expression.into());
        self
    }

    pub fn add_swc_tags(&mut self) -> &mut Self {
        self.set("soma", format!("(tag {})", TAG_SOMA))
            .set("axon", format!("(tag {})", TAG_AXON))
            .set("dend", format!("(tag {})", TAG_DEND))
            .set("apic", format!("(tag {})", TAG_APIC))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A named mechanism from a catalogue with parameter overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mechanism {
    pub name: String,
    pub params: BTreeMap<String, f64>,
}

impl Mechanism {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with(mut self, param: impl Into<String>, value: f64) -> Self {
        self.params.insert(param.into(), value);
        self
    }

    pub fn param(&self, param: &str) -> Option<f64> {
        self.params.get(param).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CableProperty {
    Vm(f64),
    Cm(f64),
    RL(f64),
    TempK(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IonSettings {
    pub ion: String,
    pub int_con: Option<f64>,
    pub ext_con: Option<f64>,
    pub rev_pot: Option<f64>,
    pub method: Option<String>,
    pub diff: Option<f64>,
}

impl IonSettings {
    pub fn new(ion: impl Into<String>) -> Self {
        Self {
            ion: ion.into(),
            int_con: None,
            ext_con: None,
            rev_pot: None,
            method: None,
            diff: None,
        }
    }

    pub fn concentrations(mut self, int_con: f64, ext_con: f64) -> Self {
        self.int_con = Some(int_con);
        self.ext_con = Some(ext_con);
        self
    }

    pub fn rev_pot(mut self, rev_pot: f64) -> Self {
        self.rev_pot = Some(rev_pot);
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn diff(mut self, diff: f64) -> Self {
        self.diff = Some(diff);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paintable {
    Density(Mechanism),
    Property(CableProperty),
    Ion(IonSettings),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Placeable {
    Synapse(Mechanism),
    Junction(Mechanism),
    IClamp {
        tstart: f64,
        duration: f64,
        current: f64,
    },
    ThresholdDetector {
        threshold: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Painting {
    pub region: String,
    pub item: Paintable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub locset: String,
    pub item: Placeable,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decor {
    pub defaults: Vec<Paintable>,
    pub paintings: Vec<Painting>,
    pub placements: Vec<Placement>,
    pub discretization: Option<String>,
}

impl Decor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default(&mut self, item: Paintable) -> &mut Self {
        self.defaults.push(item);
        self
    }

    pub fn paint(&mut self, region: impl Into<String>, item: Paintable) -> &mut Self {
        self.paintings.push(Painting {
            region: region.into(),
            item,
        });
        self
    }

    pub fn place(
        &mut self,
        locset: impl Into<String>,
        item: Placeable,
        label: impl Into<String>,
    ) -> &mut Self {
        self.placements.push(Placement {
            locset: locset.into(),
            item,
            label: label.into(),
        });
        self
    }

    pub fn discretization(&mut self, policy: impl Into<String>) -> &mut Self {
        self.discretization = Some(policy.into());
        self
    }

    pub fn densities_on<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Mechanism> {
        self.paintings
            .iter()
            .filter(move |painting| painting.region == region)
            .filter_map(|painting| match &painting.item {
                Paintable::Density(mechanism) => Some(mechanism),
                _ => None,
            })
    }

    pub fn placement(&self, label: &str) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|placement| placement.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableCellDescription {
    pub morphology: SegmentTree,
    pub decor: Decor,
    pub labels: LabelDict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifCellDescription {
    pub source: String,
    pub target: String,
    pub tau_m: f64,
    pub v_th: f64,
    pub c_m: f64,
    pub e_l: f64,
    pub v_m: f64,
    pub v_reset: f64,
    pub t_ref: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellDescription {
    Lif(LifCellDescription),
    Cable(CableCellDescription),
}

impl CellDescription {
    pub fn kind(&self) -> CellKind {
        match self {
            CellDescription::Lif(_) => CellKind::Lif,
            CellDescription::Cable(_) => CellKind::Cable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableGlobalProperties {
    pub defaults: Vec<CableProperty>,
    pub ions: Vec<IonSettings>,
    pub catalogues: Vec<String>,
}

impl CableGlobalProperties {
    /// Defaults matching NEURON's: 6.3 °C, 35.4 Ω·cm, 0.01 F/m², -65 mV.
    pub fn neuron_defaults() -> Self {
        Self {
            defaults: vec![
                CableProperty::Vm(-65.0),
                CableProperty::TempK(6.3 + 273.15),
                CableProperty::RL(35.4),
                CableProperty::Cm(0.01),
            ],
            ions: vec![
                IonSettings::new("na").concentrations(10.0, 140.0).rev_pot(50.0),
                IonSettings::new("k").concentrations(54.4, 2.5).rev_pot(-77.0),
                IonSettings::new("ca")
                    .concentrations(5e-5, 2.0)
                    .rev_pot(132.5),
            ],
            catalogues: vec!["default".to_string()],
        }
    }

    pub fn with_catalogue(mut self, catalogue: impl Into<String>) -> Self {
        self.catalogues.push(catalogue.into());
        self
    }

    pub fn ion(&self, ion: &str) -> Option<&IonSettings> {
        self.ions.iter().find(|settings| settings.ion == ion)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Probe {
    MembraneVoltage { locset: String },
    IonDiffConcentration { ion: String },
}
