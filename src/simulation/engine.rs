//! High-level runtime engine settings
//!
//! Selects how a step is driven (direct loop or quadtree traversal), which
//! gravity sources act on the bodies, and the quadtree shape used each tick.

use crate::simulation::boundary::Boundary;

/// How `advance` walks the bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Direct, // iterate bodies in order
    Tree, // rebuild the quadtree and update leaf by leaf
}

/// Which gravity sources act on the orbiting bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    StarOnly, // only the star attracts (default)
    Direct, // star + all body pairs, O(n^2)
    BarnesHut, // star + body pairs approximated through the quadtree
}

/// Root boundary used when the quadtree is rebuilt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeBounds {
    Fit, // padded square around the current bodies
    Fixed(Boundary), // fixed world region, bodies outside are not indexed
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub update: UpdateMode,
    pub interaction: Interaction,
    pub capacity: usize, // bodies held per node before subdividing
    pub theta: f64, // opening angle for barnes-hut
    pub bounds: TreeBounds,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            update: UpdateMode::Tree,
            interaction: Interaction::StarOnly,
            capacity: 4,
            theta: 0.5,
            bounds: TreeBounds::Fit,
        }
    }
}
