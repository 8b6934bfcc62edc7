//! Force / acceleration contributors for the orbital engine
//!
//! The force law used everywhere is Newtonian gravity evaluated on physical
//! distances: coordinate distances are divided by the distance scale first.
//! Accelerations are returned in physical units (m/s^2); the integrator
//! converts them back to coordinate units.
//!
//! Body-body terms are optional. They implement [`Acceleration`] and are
//! collected in an [`AccelSet`], which evaluates every term against the same
//! snapshot of positions before anything moves.

use crate::simulation::quadtree::{QuadTree, TreePoint};
use crate::simulation::boundary::Boundary;
use crate::simulation::states::{Body, NVec2};

/// Magnitude of the attraction between two masses `distance` coordinate units apart:
/// `G * m1 * m2 / (distance / scale)^2`.
///
/// The caller guarantees `distance > 0`.
#[allow(non_snake_case)]
pub fn gravitational_force(distance: f64, m1: f64, m2: f64, G: f64, scale: f64) -> f64 {
    let d = distance / scale;
    G * m1 * m2 / (d * d)
}

/// Acceleration pulling `body` toward an attractor, or `None` when the two
/// positions coincide.
///
/// `a = -F * (d / |d|) / m` with `d` the displacement from the attractor to the body.
#[allow(non_snake_case)]
pub fn acceleration_toward(body: &Body, attractor_x: NVec2, attractor_m: f64, G: f64, scale: f64) -> Option<NVec2> {
    let d = body.x - attractor_x;
    let distance = d.norm();
    if distance == 0.0 {
        return None;
    }
    let force = gravitational_force(distance, attractor_m, body.m, G, scale);
    Some(-force * (d / distance) / body.m)
}

/// Softened acceleration at `at` caused by a mass `source_m` at `source`.
///
/// `eps2` is added to the squared physical distance. Coincident points
/// contribute nothing.
#[allow(non_snake_case)]
pub fn pair_acceleration(at: NVec2, source: NVec2, source_m: f64, G: f64, scale: f64, eps2: f64) -> NVec2 {
    let r = source - at;
    let dist = r.norm();
    if dist == 0.0 {
        return NVec2::zeros();
    }
    let d = dist / scale;
    let d2 = d * d + eps2;
    (G * source_m / d2) * (r / dist)
}

/// Collection of acceleration terms (star gravity, mutual gravity, ...)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations for all `bodies`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, star: &Body, bodies: &[Body], out: &mut [NVec2]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(star, bodies, out);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceleration source operating on the orbiting bodies.
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, star: &Body, bodies: &[Body], out: &mut [NVec2]);
}

/// Pull of the star on every body. Bodies sitting on the star get nothing.
#[allow(non_snake_case)]
pub struct StarGravity {
    pub G: f64,
    pub scale: f64,
}

impl Acceleration for StarGravity {
    fn acceleration(&self, star: &Body, bodies: &[Body], out: &mut [NVec2]) {
        for (b, a) in bodies.iter().zip(out.iter_mut()) {
            if let Some(acc) = acceleration_toward(b, star.x, star.m, self.G, self.scale) {
                *a += acc;
            }
        }
    }
}

/// Direct O(n^2) body-body gravity with softening
#[allow(non_snake_case)]
pub struct MutualGravity {
    pub G: f64,
    pub scale: f64,
    pub eps2: f64,
}

impl Acceleration for MutualGravity {
    fn acceleration(&self, _star: &Body, bodies: &[Body], out: &mut [NVec2]) {
        let n = bodies.len();
        if n < 2 { // nothing to pair
            return;
        }

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let bi = &bodies[i]; // left side of the pair
            for j in (i + 1)..n {
                let bj = &bodies[j]; // right side of the pair

                // i is pulled toward x_j by m_j, j toward x_i by m_i:
                // equal and opposite once multiplied back by the masses
                out[i] += pair_acceleration(bi.x, bj.x, bj.m, self.G, self.scale, self.eps2);
                out[j] += pair_acceleration(bj.x, bi.x, bi.m, self.G, self.scale, self.eps2);
            }
        }
    }
}

/// Body-body gravity approximated through a quadtree.
/// Distant nodes with `size / distance < theta` act as a single mass at their
/// center of mass.
#[allow(non_snake_case)]
pub struct MutualGravityBarnesHut {
    pub G: f64,
    pub scale: f64,
    pub eps2: f64,
    pub theta: f64,
    pub capacity: usize,
}

impl MutualGravityBarnesHut {
    /// Acceleration on `target` from every other body in `tree`
    pub fn acceleration_on(&self, tree: &QuadTree, target: &TreePoint) -> NVec2 {
        let mut acc = NVec2::zeros();
        self.traverse_node(tree, tree.root_index(), target, &mut acc);
        acc
    }

    fn traverse_node(&self, tree: &QuadTree, node_idx: usize, target: &TreePoint, acc: &mut NVec2) {
        let node = tree.node(node_idx);

        // Skip empty nodes
        if node.mass == 0.0 {
            return;
        }

        let Some(children) = node.children else {
            // leaf: exact interaction with every held body but the target
            for p in &node.points {
                if p.index == target.index {
                    continue;
                }
                let m = p.m * tree.share(p.index);
                *acc += pair_acceleration(target.x, p.x, m, self.G, self.scale, self.eps2);
            }
            return;
        };

        // A node holding the target is always opened, else the target would
        // pull on itself through the node's aggregate mass
        if node.boundary.contains(&target.x) {
            for child in children {
                self.traverse_node(tree, child, target, acc);
            }
            return;
        }

        // Opening criterion: s / d < theta treats the node as one mass at its com
        let dist = (node.com - target.x).norm();
        if dist > 0.0 && node.boundary.size() / dist < self.theta {
            *acc += pair_acceleration(target.x, node.com, node.mass, self.G, self.scale, self.eps2);
        } else {
            for child in children {
                self.traverse_node(tree, child, target, acc);
            }
        }
    }

    /// Add the acceleration on every body from a tree already built over
    /// `bodies` (indices into the same slice), skipping the rebuild.
    pub fn accumulate_with_tree(&self, tree: &QuadTree, bodies: &[Body], out: &mut [NVec2]) {
        for (i, (b, a)) in bodies.iter().zip(out.iter_mut()).enumerate() {
            *a += self.acceleration_on(tree, &TreePoint::from_body(i, b));
        }
    }
}

impl Acceleration for MutualGravityBarnesHut {
    fn acceleration(&self, _star: &Body, bodies: &[Body], out: &mut [NVec2]) {
        // Build a fresh tree around the current positions
        let bounds = Boundary::enclosing(bodies.iter().map(|b| b.x));
        let tree = QuadTree::build(
            bounds,
            self.capacity,
            bodies.iter().enumerate().map(|(i, b)| TreePoint::from_body(i, b)),
        );

        self.accumulate_with_tree(&tree, bodies, out);
    }
}
