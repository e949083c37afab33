//! Gravitational self-compression of a radially layered elastic sphere.
//!
//! Local gravity follows from the mass enclosed at the radius of interest
//! (Turcotte & Schubert, eq. 2-66). The radial displacement uses the uniform
//! sphere solution of Landau & Lifshitz, *Theory of Elasticity*, section 7,
//! problem 3, evaluated with the density and outer radius of the layer that
//! contains the evaluation point. Elastic constants are shared by all layers.

use crate::common::constants::{FOUR_THIRDS_PI, GRAVITATIONAL_CONSTANT};
use crate::domain::AbqError;
use serde::Serialize;

/// Upper bound on `LayeredSphere::profile` samples.
pub const MAX_PROFILE_SAMPLES: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub outer_radius: f64,
    pub density: f64,
}

impl Layer {
    pub const fn new(outer_radius: f64, density: f64) -> Self {
        Self {
            outer_radius,
            density,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticConstants {
    pub youngs_modulus: f64,
    pub poisson_ratio: f64,
}

impl ElasticConstants {
    pub fn new(youngs_modulus: f64, poisson_ratio: f64) -> Result<Self, SphereError> {
        if !youngs_modulus.is_finite() || youngs_modulus <= 0.0 {
            return Err(SphereError::InvalidYoungsModulus {
                value: youngs_modulus,
            });
        }
        if !poisson_ratio.is_finite() || poisson_ratio <= -1.0 || poisson_ratio >= 0.5 {
            return Err(SphereError::InvalidPoissonRatio {
                value: poisson_ratio,
            });
        }
        Ok(Self {
            youngs_modulus,
            poisson_ratio,
        })
    }
}

/// Enclosed mass, gravity and displacement at one radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfCompression {
    pub radius: f64,
    pub enclosed_mass: f64,
    pub local_gravity: f64,
    pub displacement: f64,
    /// Index of the layer containing `radius` (the straddling layer, or the
    /// layer whose outer boundary equals it).
    pub layer_index: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SphereError {
    #[error("sphere requires at least one layer")]
    NoLayers,
    #[error("layer {index} outer radius must be finite and > 0, got {value}")]
    InvalidLayerRadius { index: usize, value: f64 },
    #[error("layer {index} density must be finite and > 0, got {value}")]
    InvalidLayerDensity { index: usize, value: f64 },
    #[error(
        "layer radii must be strictly increasing, layer {index} has {current} after {previous}"
    )]
    NonIncreasingRadius {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("Young's modulus must be finite and > 0, got {value}")]
    InvalidYoungsModulus { value: f64 },
    #[error("Poisson's ratio must lie in (-1, 0.5), got {value}")]
    InvalidPoissonRatio { value: f64 },
    #[error("radius {radius} lies outside the sphere [0, {outer_radius}]")]
    RadiusOutOfRange { radius: f64, outer_radius: f64 },
    #[error("local gravity is undefined at the center (r = 0)")]
    CenterEvaluation,
    #[error("profile requires at least 2 samples, got {samples}")]
    TooFewSamples { samples: usize },
    #[error("profile allows at most {max} samples, got {samples}")]
    TooManySamples { samples: usize, max: usize },
}

impl From<SphereError> for AbqError {
    fn from(error: SphereError) -> Self {
        AbqError::input_validation("INPUT.SPHERE_DOMAIN", error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayeredSphere {
    layers: Vec<Layer>,
    elastic: ElasticConstants,
}

struct LayerScan {
    enclosed_mass: f64,
    layer_index: usize,
}

impl LayeredSphere {
    pub fn new(layers: Vec<Layer>, elastic: ElasticConstants) -> Result<Self, SphereError> {
        validate_layers(&layers)?;
        Ok(Self { layers, elastic })
    }

    /// Single layer of constant density.
    pub fn uniform(
        radius: f64,
        density: f64,
        elastic: ElasticConstants,
    ) -> Result<Self, SphereError> {
        Self::new(vec![Layer::new(radius, density)], elastic)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn elastic(&self) -> ElasticConstants {
        self.elastic
    }

    pub fn radius(&self) -> f64 {
        self.outermost().outer_radius
    }

    pub fn total_mass(&self) -> f64 {
        self.scan(self.radius()).enclosed_mass
    }

    pub fn surface_gravity(&self) -> f64 {
        let radius = self.radius();
        GRAVITATIONAL_CONSTANT * self.total_mass() / (radius * radius)
    }

    pub fn enclosed_mass(&self, radius: f64) -> Result<f64, SphereError> {
        self.check_radius(radius)?;
        Ok(self.scan(radius).enclosed_mass)
    }

    /// Mass, gravity and displacement at `radius`; the center is rejected
    /// because `g = G M / r^2` is 0/0 there.
    pub fn evaluate(&self, radius: f64) -> Result<SelfCompression, SphereError> {
        self.check_radius(radius)?;
        if radius == 0.0 {
            return Err(SphereError::CenterEvaluation);
        }

        let scan = self.scan(radius);
        let layer = self.layers[scan.layer_index];
        let local_gravity = GRAVITATIONAL_CONSTANT * scan.enclosed_mass / (radius * radius);

        let sigma = self.elastic.poisson_ratio;
        let displacement = -radius
            * local_gravity
            * layer.density
            * layer.outer_radius
            * (1.0 - 2.0 * sigma)
            * (1.0 + sigma)
            * ((3.0 - sigma) / (1.0 + sigma)
                - (radius * radius) / (layer.outer_radius * layer.outer_radius))
            / (10.0 * self.elastic.youngs_modulus * (1.0 - sigma));

        Ok(SelfCompression {
            radius,
            enclosed_mass: scan.enclosed_mass,
            local_gravity,
            displacement,
            layer_index: scan.layer_index,
        })
    }

    /// Radial displacement, taking the `r -> 0` limit (zero) at the center.
    pub fn displacement_at(&self, radius: f64) -> Result<f64, SphereError> {
        self.check_radius(radius)?;
        if radius == 0.0 {
            return Ok(0.0);
        }
        Ok(self.evaluate(radius)?.displacement)
    }

    /// Evenly spaced evaluations from the center to the surface, inclusive.
    pub fn profile(&self, samples: usize) -> Result<Vec<SelfCompression>, SphereError> {
        if samples < 2 {
            return Err(SphereError::TooFewSamples { samples });
        }
        if samples > MAX_PROFILE_SAMPLES {
            return Err(SphereError::TooManySamples {
                samples,
                max: MAX_PROFILE_SAMPLES,
            });
        }

        let outer_radius = self.radius();
        let step = outer_radius / (samples - 1) as f64;
        let mut rows = Vec::with_capacity(samples);
        rows.push(SelfCompression {
            radius: 0.0,
            enclosed_mass: 0.0,
            local_gravity: 0.0,
            displacement: 0.0,
            layer_index: 0,
        });
        for index in 1..samples {
            // pin the last sample to the exact surface radius
            let radius = if index == samples - 1 {
                outer_radius
            } else {
                step * index as f64
            };
            rows.push(self.evaluate(radius)?);
        }
        Ok(rows)
    }

    fn outermost(&self) -> Layer {
        self.layers[self.layers.len() - 1]
    }

    fn check_radius(&self, radius: f64) -> Result<(), SphereError> {
        let outer_radius = self.radius();
        if !radius.is_finite() || radius < 0.0 || radius > outer_radius {
            return Err(SphereError::RadiusOutOfRange {
                radius,
                outer_radius,
            });
        }
        Ok(())
    }

    // Whole layers inside `radius` count as full spheres of their own
    // density; no inner volume is removed. Only the straddling layer has the
    // sphere below its inner boundary subtracted.
    fn scan(&self, radius: f64) -> LayerScan {
        let mut enclosed_mass = 0.0;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.outer_radius <= radius {
                enclosed_mass += sphere_mass(layer.density, layer.outer_radius);
            }
            if layer.outer_radius == radius {
                return LayerScan {
                    enclosed_mass,
                    layer_index: index,
                };
            }
            if layer.outer_radius > radius {
                enclosed_mass += sphere_mass(layer.density, radius);
                if index > 0 {
                    let inner_radius = self.layers[index - 1].outer_radius;
                    enclosed_mass -= sphere_mass(layer.density, inner_radius);
                }
                return LayerScan {
                    enclosed_mass,
                    layer_index: index,
                };
            }
        }

        LayerScan {
            enclosed_mass,
            layer_index: self.layers.len() - 1,
        }
    }
}

/// Displacement and local gravity at `radius` for the given layers and
/// elastic constants, as `(displacement, local_gravity)`.
pub fn self_compression(
    radius: f64,
    layers: &[Layer],
    youngs_modulus: f64,
    poisson_ratio: f64,
) -> Result<(f64, f64), SphereError> {
    let elastic = ElasticConstants::new(youngs_modulus, poisson_ratio)?;
    let sphere = LayeredSphere::new(layers.to_vec(), elastic)?;
    let result = sphere.evaluate(radius)?;
    Ok((result.displacement, result.local_gravity))
}

fn sphere_mass(density: f64, radius: f64) -> f64 {
    FOUR_THIRDS_PI * density * radius * radius * radius
}

fn validate_layers(layers: &[Layer]) -> Result<(), SphereError> {
    if layers.is_empty() {
        return Err(SphereError::NoLayers);
    }

    for (index, layer) in layers.iter().enumerate() {
        if !layer.outer_radius.is_finite() || layer.outer_radius <= 0.0 {
            return Err(SphereError::InvalidLayerRadius {
                index,
                value: layer.outer_radius,
            });
        }
        if !layer.density.is_finite() || layer.density <= 0.0 {
            return Err(SphereError::InvalidLayerDensity {
                index,
                value: layer.density,
            });
        }
        if index > 0 {
            let previous = layers[index - 1].outer_radius;
            if layer.outer_radius <= previous {
                return Err(SphereError::NonIncreasingRadius {
                    index,
                    previous,
                    current: layer.outer_radius,
                });
            }
        }
    }

    Ok(())
}
