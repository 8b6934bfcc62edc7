//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – update mode, gravity sources and quadtree shape
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`BodyConfig`]       – the star and the initial state of each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   update: "tree"            # or "direct"
//!   interaction: "star_only"  # or "direct", "barnes_hut"
//!   capacity: 4
//!   theta: 0.5
//!   bounds: [550.0, 450.0, 550.0, 450.0]  # optional: cx, cy, half width, half height
//!
//! parameters:
//!   t_end: 31536000.0         # total simulated time (s)
//!   h0: 86400.0               # step size (s)
//!   G: 6.67428e-11            # gravitational constant
//!   scale: 1.671122994652406e-9  # coordinate units per metre
//!   eps2: 0.0                 # softening for body-body terms (m^2)
//!   trail_length: 0           # positions kept per body
//!
//! star:
//!   x: [550.0, 450.0]
//!   m: 1.989e30
//!   radius: 30.0
//!
//! bodies:
//!   - x: [800.0, 450.0]
//!     m: 5.974e24
//!     radius: 14.0
//!     orbit: true             # derive a circular orbital velocity around the star
//!   - x: [931.0, 450.0]
//!     v: [0.0, 4.0e-5]        # or give it explicitly, in coordinate units per second
//!     m: 6.419e23
//!     radius: 16.0
//! ```
//!
//! [`crate::simulation::scenario::Scenario::build_scenario`] maps this into the
//! runtime types.

use std::path::Path;

use serde::Deserialize;

use crate::error::SimError;

/// One astronomical unit in metres
pub const ASTRONOMICAL_UNIT: f64 = 1.496e11;

/// Gravitational constant used by the built-in presets
pub const G_SI: f64 = 6.67428e-11;

/// How the engine walks the bodies each step
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateConfig {
    #[serde(rename = "direct")] // plain loop over the bodies
    Direct,

    #[serde(rename = "tree")] // rebuild the quadtree each tick and update leaf by leaf
    Tree,
}

/// Gravity sources acting on the orbiting bodies
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionConfig {
    #[serde(rename = "star_only")] // only the star attracts
    StarOnly,

    #[serde(rename = "direct")] // star plus exact body-body attraction
    Direct,

    #[serde(rename = "barnes_hut")] // star plus tree-approximated body-body attraction
    BarnesHut,
}

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub update: UpdateConfig,
    #[serde(default = "default_interaction")]
    pub interaction: InteractionConfig,
    #[serde(default = "default_capacity")]
    pub capacity: usize, // bodies per quadtree node before subdividing
    pub theta: Option<f64>, // barnes-hut opening angle
    pub bounds: Option<Vec<f64>>, // fixed root boundary, fitted to the bodies when absent
}

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64, // time end
    pub h0: f64, // time step size
    pub G: f64, // gravitational constant
    #[serde(default = "default_scale")]
    pub scale: f64, // coordinate units per metre
    #[serde(default)]
    pub eps2: f64, // softening, body-body terms only
    #[serde(default)]
    pub trail_length: usize, // positions kept per body
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // initial position in coordinate units
    pub v: Option<Vec<f64>>, // initial velocity in coordinate units per second
    pub m: f64, // mass
    #[serde(default)]
    pub radius: f64, // visual radius
    #[serde(default)]
    pub orbit: bool, // derive a circular orbital velocity around the star, overrides `v`
}

impl BodyConfig {
    pub fn at_rest(x: [f64; 2], m: f64, radius: f64) -> Self {
        Self { x: x.to_vec(), v: None, m, radius, orbit: false }
    }

    pub fn orbiting(x: [f64; 2], m: f64, radius: f64) -> Self {
        Self { orbit: true, ..Self::at_rest(x, m, radius) }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig, // Engine-level configuration
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    pub star: BodyConfig, // The attractor
    pub bodies: Vec<BodyConfig>, // Bodies orbiting the star
}

fn default_interaction() -> InteractionConfig {
    InteractionConfig::StarOnly
}

fn default_capacity() -> usize {
    4
}

fn default_scale() -> f64 {
    1.0
}

impl ScenarioConfig {
    /// Load and validate a scenario from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a scenario from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SimError> {
        let config: ScenarioConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the setup-time contract before anything is built
    pub fn validate(&self) -> Result<(), SimError> {
        let p = &self.parameters;
        if !(p.h0 > 0.0 && p.h0.is_finite()) {
            return Err(SimError::InvalidParameters(format!("h0 must be > 0, got {}", p.h0)));
        }
        if !(p.G > 0.0 && p.G.is_finite()) {
            return Err(SimError::InvalidParameters(format!("G must be > 0, got {}", p.G)));
        }
        if !(p.scale > 0.0 && p.scale.is_finite()) {
            return Err(SimError::InvalidParameters(format!("scale must be > 0, got {}", p.scale)));
        }
        if p.eps2 < 0.0 {
            return Err(SimError::InvalidParameters(format!("eps2 must be >= 0, got {}", p.eps2)));
        }

        let e = &self.engine;
        if e.capacity == 0 {
            return Err(SimError::InvalidParameters("capacity must be > 0".to_string()));
        }
        if let Some(theta) = e.theta {
            if theta < 0.0 {
                return Err(SimError::InvalidParameters(format!("theta must be >= 0, got {}", theta)));
            }
        }
        if let Some(bounds) = &e.bounds {
            if bounds.len() != 4 {
                return Err(SimError::InvalidParameters(format!(
                    "bounds needs [cx, cy, half_width, half_height], got {} values",
                    bounds.len()
                )));
            }
            if bounds[2] <= 0.0 || bounds[3] <= 0.0 {
                return Err(SimError::InvalidBoundary { half_width: bounds[2], half_height: bounds[3] });
            }
        }

        for (i, b) in std::iter::once(&self.star).chain(self.bodies.iter()).enumerate() {
            if b.x.len() != 2 {
                return Err(SimError::InvalidParameters(format!("body {}: x needs 2 components", i)));
            }
            if b.v.as_ref().is_some_and(|v| v.len() != 2) {
                return Err(SimError::InvalidParameters(format!("body {}: v needs 2 components", i)));
            }
            if b.m <= 0.0 || !b.m.is_finite() {
                return Err(SimError::InvalidBody(b.m));
            }
        }

        Ok(())
    }

    /// Sun with Mercury, Venus, Earth and Mars on a 1100 x 900 canvas,
    /// 250 pixels per AU, one day per step, one year in total.
    pub fn inner_planets() -> Self {
        const WIDTH: f64 = 1100.0;
        const HEIGHT: f64 = 900.0;
        let scale = 250.0 / ASTRONOMICAL_UNIT;
        let (cx, cy) = (WIDTH / 2.0, HEIGHT / 2.0);
        let at = |au: f64| [au * ASTRONOMICAL_UNIT * scale + cx, cy];

        Self {
            engine: EngineConfig {
                update: UpdateConfig::Tree,
                interaction: InteractionConfig::StarOnly,
                capacity: 4,
                theta: None,
                bounds: Some(vec![cx, cy, cx, cy]),
            },
            parameters: ParametersConfig {
                t_end: 365.0 * 86400.0,
                h0: 86400.0,
                G: G_SI,
                scale,
                eps2: 0.0,
                trail_length: 0,
            },
            star: BodyConfig::at_rest([cx, cy], 1.989e30, 30.0),
            bodies: vec![
                BodyConfig::orbiting(at(1.0), 5.974e24, 14.0), // Earth
                BodyConfig::orbiting(at(1.524), 6.419e23, 16.0), // Mars
                BodyConfig::orbiting(at(0.387), 3.302e23, 10.0), // Mercury
                BodyConfig::orbiting(at(0.723), 4.869e24, 12.0), // Venus
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
engine:
  update: "direct"
parameters:
  t_end: 10.0
  h0: 1.0
  G: 1.0
star:
  x: [0.0, 0.0]
  m: 1000.0
bodies:
  - x: [10.0, 0.0]
    m: 1.0
    orbit: true
  - x: [0.0, 20.0]
    v: [1.0, 0.0]
    m: 2.0
    radius: 3.0
"#;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let cfg = ScenarioConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(cfg.engine.update, UpdateConfig::Direct);
        assert_eq!(cfg.engine.interaction, InteractionConfig::StarOnly);
        assert_eq!(cfg.engine.capacity, 4);
        assert!(cfg.engine.bounds.is_none());
        assert_eq!(cfg.parameters.scale, 1.0);
        assert_eq!(cfg.parameters.eps2, 0.0);
        assert_eq!(cfg.parameters.trail_length, 0);
        assert_eq!(cfg.bodies.len(), 2);
        assert!(cfg.bodies[0].orbit);
        assert_eq!(cfg.bodies[1].v, Some(vec![1.0, 0.0]));
    }

    #[test]
    fn test_interaction_names() {
        let yaml = MINIMAL.replace("update: \"direct\"", "update: \"tree\"\n  interaction: \"barnes_hut\"\n  theta: 0.7");
        let cfg = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(cfg.engine.update, UpdateConfig::Tree);
        assert_eq!(cfg.engine.interaction, InteractionConfig::BarnesHut);
        assert_eq!(cfg.engine.theta, Some(0.7));
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let yaml = MINIMAL.replace("m: 2.0", "m: 0.0");
        assert!(matches!(ScenarioConfig::from_yaml_str(&yaml), Err(SimError::InvalidBody(_))));
    }

    #[test]
    fn test_rejects_zero_step() {
        let yaml = MINIMAL.replace("h0: 1.0", "h0: 0.0");
        assert!(matches!(ScenarioConfig::from_yaml_str(&yaml), Err(SimError::InvalidParameters(_))));
    }

    #[test]
    fn test_rejects_malformed_bounds() {
        let mut cfg = ScenarioConfig::from_yaml_str(MINIMAL).unwrap();
        cfg.engine.bounds = Some(vec![0.0, 0.0, 10.0]);
        assert!(cfg.validate().is_err());
        cfg.engine.bounds = Some(vec![0.0, 0.0, 10.0, -1.0]);
        assert!(matches!(cfg.validate(), Err(SimError::InvalidBoundary { .. })));
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        assert!(matches!(ScenarioConfig::from_yaml_str("engine: ["), Err(SimError::Parse(_))));
    }

    #[test]
    fn test_inner_planets_validates() {
        let cfg = ScenarioConfig::inner_planets();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.bodies.len(), 4);
        // Earth sits 250 px right of the sun
        assert!((cfg.bodies[0].x[0] - 800.0).abs() < 1e-9);
    }
}
