//! Labelled intensity datasets of structured beams after turbulent propagation.
//!
//! Every requested mode is generated once. For each turbulence strength and each
//! realisation, an independent phase screen is applied to the clean beam, the
//! result is propagated over a fixed distance, and the intensity, normalised to a
//! peak of one, is stored with its labels.

use crate::beams::{BeamMode, Parity};
use crate::configuration::Configuration;
use crate::error::{BeamError, Result};
use crate::field::{self, Field};
use crate::propagation::{AngularSpectrum, PhaseScreenGenerator, TurbulenceParameters};
use hashbrown::HashMap;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Cartesian product of mode indices for one beam family.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum OrderGrid {
    LaguerreGaussian { p: Vec<u32>, l: Vec<i32> },
    HermiteGaussian { n: Vec<u32>, m: Vec<u32> },
    /// Even Ince-Gaussian modes with the default ellipticity.
    InceGaussian { p: Vec<u32>, m: Vec<u32> },
}

impl OrderGrid {
    /// Every combination of the first index with the second, first index outermost.
    pub fn modes(&self) -> Vec<BeamMode> {
        match self {
            OrderGrid::LaguerreGaussian { p, l } => p
                .iter()
                .flat_map(|&p| l.iter().map(move |&l| BeamMode::LaguerreGaussian { p, l }))
                .collect(),
            OrderGrid::HermiteGaussian { n, m } => n
                .iter()
                .flat_map(|&n| m.iter().map(move |&m| BeamMode::HermiteGaussian { n, m }))
                .collect(),
            OrderGrid::InceGaussian { p, m } => p
                .iter()
                .flat_map(|&p| {
                    m.iter().map(move |&m| BeamMode::InceGaussian {
                        p,
                        m,
                        parity: Parity::Even,
                        elliptic_parameter: None,
                    })
                })
                .collect(),
        }
    }
}

/// What to generate.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DatasetSpec {
    pub modes: Vec<BeamMode>,

    /// Turbulence strengths Cn2 to simulate, units of m^(-2/3).
    pub cn2_list: Vec<f64>,

    /// Realisations per mode and turbulence strength.
    pub n_samples: usize,

    /// Propagation distance after the phase screen, m.
    pub distance: f64,

    /// Outer scale of the turbulence, m.
    pub l_max: f64,

    /// Inner scale of the turbulence, m.
    pub l_min: f64,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        DatasetSpec {
            modes: Vec::new(),
            cn2_list: Vec::new(),
            n_samples: 10,
            distance: 0.4,
            l_max: 25.0,
            l_min: 1e-3,
        }
    }
}

impl DatasetSpec {
    /// Adds every mode of `orders` to the request.
    pub fn with_orders(mut self, orders: &OrderGrid) -> Self {
        self.modes.extend(orders.modes());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.modes.is_empty() {
            return Err(BeamError::InvalidParameters(
                "dataset requests no modes".to_string(),
            ));
        }
        if !self.distance.is_finite() {
            return Err(BeamError::invalid_parameter("distance", self.distance));
        }
        for &cn2 in &self.cn2_list {
            self.turbulence(cn2).validate()?;
        }
        Ok(())
    }

    fn turbulence(&self, cn2: f64) -> TurbulenceParameters {
        TurbulenceParameters {
            cn2,
            l_min: self.l_min,
            l_max: self.l_max,
        }
    }

    /// Total number of samples the request produces.
    pub fn len(&self) -> usize {
        self.modes.len() * self.cn2_list.len() * self.n_samples
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Label of a mode as used for classification, e.g. `LG_p0_l1`.
pub fn class_label(mode: &BeamMode) -> String {
    format!("{}_{}", mode.family(), mode.order_label())
}

/// Maps class labels to consecutive indices in sorted label order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    indices: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        let indices = classes
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index))
            .collect();
        LabelEncoder { classes, indices }
    }

    pub fn transform(&self, label: &str) -> Option<usize> {
        self.indices.get(label).copied()
    }

    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One labelled intensity image.
#[derive(Clone, Debug)]
pub struct Sample {
    /// Beam family, e.g. `LG`.
    pub family: String,

    /// Mode indices, e.g. `p0_l1`.
    pub order_label: String,

    pub cn2: f64,

    /// Index of the sample's class in [Dataset::labels].
    pub class_index: usize,

    /// Intensity normalised to a peak of one.
    pub intensity: DMatrix<f64>,
}

#[derive(Clone, Debug)]
pub struct Dataset {
    pub labels: LabelEncoder,
    pub samples: Vec<Sample>,
}

impl Dataset {
    /// Generates the dataset with independent entropy-seeded realisations.
    pub fn generate(spec: &DatasetSpec, configuration: &Configuration) -> Result<Self> {
        Dataset::generate_seeded(spec, configuration, rand::thread_rng().next_u64())
    }

    /// Generates the dataset reproducibly from `seed`.
    ///
    /// Each realisation draws from its own generator, seeded from a master generator
    /// in a fixed order, so the result does not depend on how the work is scheduled
    /// across threads, and nearby seeds give unrelated realisations.
    pub fn generate_seeded(
        spec: &DatasetSpec,
        configuration: &Configuration,
        seed: u64,
    ) -> Result<Self> {
        spec.validate()?;
        configuration.validate()?;
        let grid = configuration.grid()?;
        let propagator = AngularSpectrum::new(grid, configuration.wavelength)?;
        let labels = LabelEncoder::fit(spec.modes.iter().map(class_label));
        info!(
            modes = spec.modes.len(),
            turbulence_levels = spec.cn2_list.len(),
            samples = spec.len(),
            "generating dataset"
        );

        let mut samples = Vec::with_capacity(spec.len());
        // one seed per realisation, drawn in a fixed order from the master generator
        let mut master = StdRng::seed_from_u64(seed);
        for mode in &spec.modes {
            let clean = mode.generate(configuration)?;
            let label = class_label(mode);
            let class_index = labels.transform(&label).ok_or_else(|| {
                BeamError::InvalidParameters(format!("no class for label {}", label))
            })?;
            for &cn2 in &spec.cn2_list {
                let screens =
                    PhaseScreenGenerator::new(grid, configuration.wavelength, &spec.turbulence(cn2))?;
                let seeds: Vec<u64> = (0..spec.n_samples).map(|_| master.next_u64()).collect();
                let images = seeds
                    .into_par_iter()
                    .map(|realisation_seed| {
                        let mut rng = StdRng::seed_from_u64(realisation_seed);
                        let screen = screens.generate(&mut rng);
                        distorted_intensity(&clean, &screen, &propagator, spec.distance)
                    })
                    .collect::<Result<Vec<_>>>()?;
                samples.extend(images.into_iter().map(|intensity| Sample {
                    family: mode.family().to_string(),
                    order_label: mode.order_label(),
                    cn2,
                    class_index,
                    intensity,
                }));
                debug!(mode = %mode, cn2, "realisations complete");
            }
            info!(mode = %mode, class_index, "mode complete");
        }
        Ok(Dataset { labels, samples })
    }

    /// Samples of one class and turbulence strength, in generation order.
    pub fn select<'a>(
        &'a self,
        family: &'a str,
        order_label: &'a str,
        cn2: f64,
    ) -> impl Iterator<Item = &'a Sample> + 'a {
        self.samples.iter().filter(move |sample| {
            sample.family == family && sample.order_label == order_label && sample.cn2 == cn2
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn distorted_intensity(
    clean: &Field,
    screen: &DMatrix<f64>,
    propagator: &AngularSpectrum,
    distance: f64,
) -> Result<DMatrix<f64>> {
    let distorted = field::apply_phase_screen(clean, screen)?;
    Ok(field::normalised_intensity(
        &propagator.propagate(&distorted, distance)?,
    ))
}
