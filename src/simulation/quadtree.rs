//! # Quadtree spatial index (2D)
//!
//! A four-way recursive partition of a rectangular region. Each node holds up
//! to `capacity` bodies directly; the insert that would exceed it subdivides the
//! node into four quadrants and pushes the held bodies down into them.
//!
//! ## Layout
//!
//! Nodes live in a flat arena (`nodes`) and refer to their children by index.
//! The root is always node `0`. A node owns its four children exclusively and
//! children are created at most once; nodes are never merged or pruned.
//!
//! ## Tie admission
//!
//! `Boundary::contains` is inclusive on every edge and every child re-tests
//! containment on its own. A body lying exactly on the line shared by two (or,
//! at a center, four) quadrants is admitted by each of them. So a body can be
//! visible from more than one leaf. This is intentional: the tree is an
//! insertion-time index, not a single-owner partition. Consumers that must see
//! each body once deduplicate by `TreePoint::index` (as [`QuadTree::query_range`]
//! and [`QuadTree::len`] do), and the mass distribution weights each copy by
//! [`QuadTree::share`] so every body counts exactly once.
//!
//! The tree stores a snapshot of each body (index, position, mass) taken at
//! insertion. It never owns or mutates bodies.

use std::collections::HashMap;

use crate::simulation::boundary::{Boundary, Quadrant};
use crate::simulation::states::{Body, NVec2};

/// Subdivision stops here; deeper inserts are held past capacity
pub const MAX_DEPTH: usize = 32;

/// Fixed, deterministic leaf visiting order for [`QuadTree::update_positions`]
pub const TRAVERSAL_ORDER: [Quadrant; 4] = [
    Quadrant::NorthEast,
    Quadrant::SouthEast,
    Quadrant::NorthWest,
    Quadrant::SouthWest,
];

/// Snapshot of a body as seen by the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreePoint {
    pub index: usize, // index of the body in the caller's collection
    pub x: NVec2, // position at insertion
    pub m: f64, // mass
}

impl TreePoint {
    pub fn from_body(index: usize, body: &Body) -> Self {
        Self { index, x: body.x, m: body.m }
    }
}

/// A single node of the quadtree.
pub struct QuadNode {
    pub boundary: Boundary,
    pub points: Vec<TreePoint>, // held bodies in insertion order, empty once subdivided
    pub children: Option<[usize; 4]>, // arena indices, in `Quadrant` order
    pub depth: usize,
    pub mass: f64, // total mass of the subtree, see `compute_mass_distribution`
    pub com: NVec2, // center of mass of the subtree
}

impl QuadNode {
    fn new(boundary: Boundary, depth: usize) -> Self {
        Self {
            boundary,
            points: Vec::new(),
            children: None,
            depth,
            mass: 0.0,
            com: NVec2::zeros(),
        }
    }

    pub fn is_subdivided(&self) -> bool {
        self.children.is_some()
    }

    pub fn child(&self, q: Quadrant) -> Option<usize> {
        self.children.map(|c| c[q as usize])
    }
}

pub struct QuadTree {
    nodes: Vec<QuadNode>,
    root: usize,
    capacity: usize,
    shares: HashMap<usize, f64>, // body index -> 1 / number of leaves holding it
}

impl QuadTree {
    /// Empty tree covering `boundary`. A capacity of zero is treated as one.
    pub fn new(boundary: Boundary, capacity: usize) -> Self {
        Self {
            nodes: vec![QuadNode::new(boundary, 0)],
            root: 0,
            capacity: capacity.max(1),
            shares: HashMap::new(),
        }
    }

    /// Build a tree over `points` and compute its mass distribution.
    ///
    /// Points outside `boundary` are skipped (see [`QuadTree::insert`]).
    pub fn build<I>(boundary: Boundary, capacity: usize, points: I) -> Self
    where
        I: IntoIterator<Item = TreePoint>,
    {
        let mut tree = Self::new(boundary, capacity);
        for p in points {
            if !tree.insert(p) {
                log::debug!("quadtree: body {} at {:?} outside root boundary", p.index, p.x);
            }
        }
        tree.compute_mass_distribution();
        tree
    }

    /// Insert a body snapshot. Returns `false` (and changes nothing) when the
    /// point lies outside the root boundary.
    pub fn insert(&mut self, point: TreePoint) -> bool {
        self.insert_at(self.root, point)
    }

    /// Split node `node_idx` into four quadrants and move its held bodies into
    /// every child that contains them.
    ///
    /// Returns `false` if the node was already subdivided; children are only
    /// ever created once per node.
    pub fn subdivide(&mut self, node_idx: usize) -> bool {
        if self.nodes[node_idx].is_subdivided() {
            return false;
        }

        let boundary = self.nodes[node_idx].boundary;
        let depth = self.nodes[node_idx].depth + 1;

        let mut children = [0usize; 4];
        for q in Quadrant::ALL {
            children[q as usize] = self.nodes.len();
            self.nodes.push(QuadNode::new(boundary.quadrant(q), depth));
        }
        self.nodes[node_idx].children = Some(children);

        // redistribute what this node held
        let held = std::mem::take(&mut self.nodes[node_idx].points);
        for p in held {
            self.offer_to_children(node_idx, p);
        }
        true
    }

    /// Depth-first walk over the leaves. Children are visited NE, SE, NW, SW.
    ///
    /// `visit` is called once per body held at each leaf, together with the
    /// full set of bodies at that leaf (the body itself included). A body
    /// admitted to several leaves is visited once per leaf.
    pub fn update_positions<F>(&self, visit: &mut F)
    where
        F: FnMut(&TreePoint, &[TreePoint]),
    {
        self.visit_node(self.root, visit);
    }

    /// Distinct indices of the bodies whose position lies inside `range`, ascending.
    pub fn query_range(&self, range: &Boundary) -> Vec<usize> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.boundary.intersects(range) {
                continue;
            }
            found.extend(node.points.iter().filter(|p| range.contains(&p.x)).map(|p| p.index));
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }

        found.sort_unstable();
        found.dedup();
        found
    }

    /// Distinct indices of every body in the tree, ascending
    pub fn indices(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self
            .nodes
            .iter()
            .flat_map(|n| n.points.iter().map(|p| p.index))
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    /// Number of distinct bodies indexed
    pub fn len(&self) -> usize {
        self.indices().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.points.is_empty())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn boundary(&self) -> &Boundary {
        &self.nodes[self.root].boundary
    }

    pub fn root(&self) -> &QuadNode {
        &self.nodes[self.root]
    }

    pub fn root_index(&self) -> usize {
        self.root
    }

    pub fn node(&self, idx: usize) -> &QuadNode {
        &self.nodes[idx]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_subdivided()).count()
    }

    /// Deepest level reached, the root being level 0
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Weight of one leaf copy of body `index`: `1 / leaves holding it`.
    /// Zero for bodies not in the tree. Valid after `compute_mass_distribution`.
    pub fn share(&self, index: usize) -> f64 {
        self.shares.get(&index).copied().unwrap_or(0.0)
    }

    /// Recompute `mass` and `com` for every node, bottom-up.
    ///
    /// Each leaf copy of a body contributes `m * share`, so a body admitted
    /// to several leaves still adds exactly `m` to the root.
    pub fn compute_mass_distribution(&mut self) {
        let mut copies: HashMap<usize, u32> = HashMap::new();
        for node in &self.nodes {
            for p in &node.points {
                *copies.entry(p.index).or_insert(0) += 1;
            }
        }
        self.shares = copies.into_iter().map(|(i, c)| (i, 1.0 / c as f64)).collect();

        self.compute_mass_at(self.root);
    }

    // helpers ==============================================================================

    fn insert_at(&mut self, node_idx: usize, point: TreePoint) -> bool {
        let node = &self.nodes[node_idx];
        if !node.boundary.contains(&point.x) {
            return false;
        }

        if !node.is_subdivided() {
            if node.points.len() < self.capacity || node.depth >= MAX_DEPTH {
                self.nodes[node_idx].points.push(point);
                return true;
            }
            self.subdivide(node_idx);
        }

        self.offer_to_children(node_idx, point)
    }

    /// Every child re-tests containment on its own, so edge points may land twice
    fn offer_to_children(&mut self, node_idx: usize, point: TreePoint) -> bool {
        let Some(children) = self.nodes[node_idx].children else {
            return false;
        };
        let mut accepted = false;
        for child in children {
            accepted |= self.insert_at(child, point);
        }
        accepted
    }

    fn visit_node<F>(&self, idx: usize, visit: &mut F)
    where
        F: FnMut(&TreePoint, &[TreePoint]),
    {
        let node = &self.nodes[idx];
        if node.is_subdivided() {
            for q in TRAVERSAL_ORDER {
                if let Some(child) = node.child(q) {
                    self.visit_node(child, visit);
                }
            }
            return;
        }
        for p in &node.points {
            visit(p, &node.points);
        }
    }

    fn compute_mass_at(&mut self, node_idx: usize) {
        let mut mass = 0.0;
        let mut weighted = NVec2::zeros();

        for p in &self.nodes[node_idx].points {
            let m = p.m * self.share(p.index);
            mass += m;
            weighted += p.x * m;
        }

        if let Some(children) = self.nodes[node_idx].children {
            for child in children {
                self.compute_mass_at(child);
                let cn = &self.nodes[child];
                if cn.mass > 0.0 {
                    mass += cn.mass;
                    weighted += cn.com * cn.mass;
                }
            }
        }

        let node = &mut self.nodes[node_idx];
        node.mass = mass;
        node.com = if mass > 0.0 { weighted / mass } else { node.boundary.center() };
    }
}
