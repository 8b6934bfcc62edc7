//! Build and drive fully-initialized simulation scenarios
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System`: the star and its bodies at t = 0)
//!
//! `Scenario::advance` is the single entry point the presentation layer
//! calls once per frame. The quadtree and the force terms are rebuilt from
//! the current positions, `engine` and `parameters` on every call, so those
//! fields can be changed between steps.

use crate::configuration::config::{BodyConfig, InteractionConfig, ScenarioConfig, UpdateConfig};
use crate::error::SimError;
use crate::simulation::boundary::Boundary;
use crate::simulation::engine::{Engine, Interaction, TreeBounds, UpdateMode};
use crate::simulation::forces::{
    gravitational_force, AccelSet, Acceleration, MutualGravity, MutualGravityBarnesHut, StarGravity,
};
use crate::simulation::integrator::{integrate, step};
use crate::simulation::params::Parameters;
use crate::simulation::quadtree::{QuadTree, TreePoint};
use crate::simulation::states::{Body, NVec2, System};

/// Default barnes-hut opening angle
const DEFAULT_THETA: f64 = 0.5;

/// Velocity for a circular orbit around `star` starting at `x`.
///
/// `v = sqrt(G * M / r)` on the physical distance, perpendicular to the
/// star-body line and converted to coordinate units. A body on the +x side
/// of the star moves toward +y.
#[allow(non_snake_case)]
pub fn orbital_velocity(star: &Body, x: NVec2, G: f64, scale: f64) -> NVec2 {
    let d = x - star.x;
    let r = d.norm();
    if r == 0.0 {
        return NVec2::zeros();
    }
    let speed = (G * star.m / (r / scale)).sqrt() * scale;
    NVec2::new(-d.y, d.x) / r * speed
}

/// Runtime bundle: engine settings, parameters and state.
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    tree: Option<QuadTree>, // tree built by the last tree-guided advance
    steps: u64,
}

impl Scenario {
    pub fn new(engine: Engine, parameters: Parameters, system: System) -> Self {
        Self {
            engine,
            parameters,
            system,
            tree: None,
            steps: 0,
        }
    }

    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, SimError> {
        cfg.validate()?;

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            t_end: p_cfg.t_end,
            h0: p_cfg.h0,
            G: p_cfg.G,
            scale: p_cfg.scale,
            eps2: p_cfg.eps2,
            trail_length: p_cfg.trail_length,
        };

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let bounds = match e_cfg.bounds.as_deref() {
            Some(&[cx, cy, hw, hh]) => TreeBounds::Fixed(Boundary::new(NVec2::new(cx, cy), hw, hh)?),
            Some(other) => {
                return Err(SimError::InvalidParameters(format!("bounds needs 4 values, got {}", other.len())))
            }
            None => TreeBounds::Fit,
        };
        let engine = Engine {
            update: match e_cfg.update {
                UpdateConfig::Direct => UpdateMode::Direct,
                UpdateConfig::Tree => UpdateMode::Tree,
            },
            interaction: match e_cfg.interaction {
                InteractionConfig::StarOnly => Interaction::StarOnly,
                InteractionConfig::Direct => Interaction::Direct,
                InteractionConfig::BarnesHut => Interaction::BarnesHut,
            },
            capacity: e_cfg.capacity,
            theta: e_cfg.theta.unwrap_or(DEFAULT_THETA),
            bounds,
        };

        let star = body_from_config(&cfg.star, None, &parameters)?;
        let bodies = cfg
            .bodies
            .iter()
            .map(|bc| body_from_config(bc, Some(&star), &parameters))
            .collect::<Result<Vec<Body>, SimError>>()?;

        log::info!(
            "scenario: {} bodies, update {:?}, interaction {:?}, h0 = {} s",
            bodies.len(),
            engine.update,
            engine.interaction,
            parameters.h0
        );

        Ok(Self::new(engine, parameters, System::new(star, bodies)))
    }

    /// Advance every body by one step of `dt` seconds.
    ///
    /// The star never moves. In tree mode the quadtree is rebuilt from the
    /// current positions and bodies are updated leaf by leaf; each body is
    /// updated once even if several leaves hold it, and bodies the tree could
    /// not index are still updated directly.
    pub fn advance(&mut self, dt: f64) {
        let tree = match self.engine.update {
            UpdateMode::Tree => Some(self.build_tree()),
            UpdateMode::Direct => None,
        };

        let missed = match self.engine.interaction {
            Interaction::StarOnly => self.advance_star_only(dt, tree.as_ref()),
            Interaction::Direct | Interaction::BarnesHut => self.advance_snapshot(dt, tree.as_ref()),
        };
        if missed > 0 {
            log::warn!("{} bodies outside the quadtree root, updated directly", missed);
        }

        for b in self.system.bodies.iter_mut() {
            b.record_trail();
        }
        self.tree = tree;
        self.system.t += dt;
        self.steps += 1;
    }

    /// One step of the configured size `h0`
    pub fn tick(&mut self) {
        self.advance(self.parameters.h0);
    }

    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.tick();
        }
    }

    pub fn star(&self) -> &Body {
        &self.system.star
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    /// Quadtree built by the most recent tree-guided `advance`
    pub fn tree(&self) -> Option<&QuadTree> {
        self.tree.as_ref()
    }

    pub fn time(&self) -> f64 {
        self.system.t
    }

    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Magnitude of the star's pull on body `i` (N), `None` if it sits on the star
    pub fn real_force(&self, i: usize) -> Option<f64> {
        let body = self.system.bodies.get(i)?;
        let star = &self.system.star;
        let distance = body.distance_to(star);
        if distance == 0.0 {
            return None;
        }
        Some(gravitational_force(distance, star.m, body.m, self.parameters.G, self.parameters.scale))
    }

    /// Speed of body `i` in m/s
    pub fn real_speed(&self, i: usize) -> Option<f64> {
        self.system.bodies.get(i).map(|b| b.real_speed(self.parameters.scale))
    }

    /// Force terms for the current `engine` and `parameters`: the star always,
    /// plus the body-body term selected by `engine.interaction`
    pub fn force_set(&self) -> AccelSet {
        let p = &self.parameters;
        let forces = AccelSet::new().with(StarGravity { G: p.G, scale: p.scale });
        match self.engine.interaction {
            Interaction::StarOnly => forces,
            Interaction::Direct => forces.with(MutualGravity { G: p.G, scale: p.scale, eps2: p.eps2 }),
            Interaction::BarnesHut => forces.with(self.barnes_hut()),
        }
    }

    /// Quadtree over the current positions of the orbiting bodies
    pub fn build_tree(&self) -> QuadTree {
        let bodies = &self.system.bodies;
        let bounds = match self.engine.bounds {
            TreeBounds::Fit => Boundary::enclosing(bodies.iter().map(|b| b.x)),
            TreeBounds::Fixed(b) => b,
        };
        QuadTree::build(
            bounds,
            self.engine.capacity,
            bodies.iter().enumerate().map(|(i, b)| TreePoint::from_body(i, b)),
        )
    }

    // helpers ==============================================================================

    fn barnes_hut(&self) -> MutualGravityBarnesHut {
        let p = &self.parameters;
        MutualGravityBarnesHut {
            G: p.G,
            scale: p.scale,
            eps2: p.eps2,
            theta: self.engine.theta,
            capacity: self.engine.capacity,
        }
    }

    /// Star gravity applied body by body; the star is fixed so no snapshot is needed
    fn advance_star_only(&mut self, dt: f64, tree: Option<&QuadTree>) -> usize {
        let System { star, bodies, .. } = &mut self.system;
        let (sx, sm) = (star.x, star.m); // attractor position and mass, fixed for the tick
        let (g, scale) = (self.parameters.G, self.parameters.scale);

        // v_n+1 = v_n + dt * a(x_n), then x_n+1 = x_n + dt * v_n+1
        for_each_body(bodies, tree, |_, body| {
            step(body, sx, sm, g, scale, dt);
        })
    }

    /// Accelerations on every body at x_n. A tree that indexes every body is
    /// reused for the barnes-hut term instead of building a second one.
    fn accelerations(&self, tree: Option<&QuadTree>) -> Vec<NVec2> {
        let System { star, bodies, .. } = &self.system;
        let mut acc = vec![NVec2::zeros(); bodies.len()];

        let shared = match self.engine.interaction {
            Interaction::BarnesHut => tree.filter(|t| t.len() == bodies.len()),
            _ => None,
        };
        match shared {
            Some(tree) => {
                let p = &self.parameters;
                StarGravity { G: p.G, scale: p.scale }.acceleration(star, bodies, &mut acc);
                self.barnes_hut().accumulate_with_tree(tree, bodies, &mut acc);
            }
            None => self.force_set().accumulate_accels(star, bodies, &mut acc),
        }
        acc
    }

    /// All accelerations from the pre-step positions, then integrate
    fn advance_snapshot(&mut self, dt: f64, tree: Option<&QuadTree>) -> usize {
        // a_n from x_n for every body before anything moves
        let acc = self.accelerations(tree);
        let scale = self.parameters.scale;

        let System { star, bodies, .. } = &mut self.system;
        let on_star: Vec<bool> = bodies.iter().map(|b| b.x == star.x).collect();

        // Kick then drift with the frozen a_n:
        // v_n+1 = v_n + dt * a_n, x_n+1 = x_n + dt * v_n+1
        for_each_body(bodies, tree, |i, body| {
            if on_star[i] { // same skip as the star-only path
                log::debug!("step skipped: body {} coincides with the star", i);
                return;
            }
            integrate(body, acc[i], dt, scale);
        })
    }
}

/// Call `f` exactly once per body: in leaf order when a tree is given, then
/// for any body the tree did not reach. Returns how many the tree missed.
fn for_each_body<F>(bodies: &mut [Body], tree: Option<&QuadTree>, mut f: F) -> usize
where
    F: FnMut(usize, &mut Body),
{
    let Some(tree) = tree else {
        for (i, body) in bodies.iter_mut().enumerate() {
            f(i, body);
        }
        return 0;
    };

    let mut done = vec![false; bodies.len()];
    tree.update_positions(&mut |p: &TreePoint, _neighbors: &[TreePoint]| {
        if p.index < bodies.len() && !done[p.index] {
            done[p.index] = true;
            f(p.index, &mut bodies[p.index]);
        }
    });

    let mut missed = 0;
    for (i, body) in bodies.iter_mut().enumerate() {
        if !done[i] {
            missed += 1;
            f(i, body);
        }
    }
    missed
}

/// Map a `BodyConfig` to a runtime `Body`. With `star` given and `orbit` set,
/// the velocity is the circular orbital velocity around it.
fn body_from_config(bc: &BodyConfig, star: Option<&Body>, p: &Parameters) -> Result<Body, SimError> {
    let x = NVec2::new(bc.x[0], bc.x[1]);
    let v = match (star, bc.orbit, bc.v.as_deref()) {
        (Some(star), true, _) => orbital_velocity(star, x, p.G, p.scale),
        (_, _, Some(&[vx, vy])) => NVec2::new(vx, vy),
        _ => NVec2::zeros(),
    };
    Ok(Body::new(x, v, bc.m, bc.radius)?.with_trail_length(p.trail_length))
}
