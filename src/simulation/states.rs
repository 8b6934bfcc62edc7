//! Core state types for the orbital simulation.
//!
//! - `Body`   : a point mass with position, velocity and mass (`NVec2`)
//! - `System` : the distinguished star plus the orbiting bodies
//!
//! Positions live in coordinate units (pixels for the built-in presets),
//! masses in kilograms. The distance scale in `Parameters` maps one to the other.

use std::collections::VecDeque;

use nalgebra::Vector2;

use crate::error::SimError;

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub m: f64, // mass, always > 0
    pub radius: f64, // visual radius, ignored by dynamics
    pub trail: VecDeque<NVec2>, // past positions, newest at the back
    pub trail_length: usize, // 0 disables the trail
}

impl Body {
    /// Build a body, rejecting non-positive or non-finite masses.
    pub fn new(x: NVec2, v: NVec2, m: f64, radius: f64) -> Result<Self, SimError> {
        if m <= 0.0 || !m.is_finite() {
            return Err(SimError::InvalidBody(m));
        }
        Ok(Self {
            x,
            v,
            m,
            radius,
            trail: VecDeque::new(),
            trail_length: 0,
        })
    }

    pub fn with_trail_length(mut self, length: usize) -> Self {
        self.trail_length = length;
        self
    }

    /// Speed in physical units (m/s): coordinate speed divided by the scale
    pub fn real_speed(&self, scale: f64) -> f64 {
        self.v.norm() / scale
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.x - other.x).norm()
    }

    /// Push the current position onto the trail, dropping the oldest entry
    /// once `trail_length` is exceeded.
    pub fn record_trail(&mut self) {
        if self.trail_length == 0 {
            return;
        }
        self.trail.push_back(self.x);
        while self.trail.len() > self.trail_length {
            self.trail.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub star: Body, // attractor, never moved by the integrator
    pub bodies: Vec<Body>, // orbiting bodies
    pub t: f64, // elapsed simulated time
}

impl System {
    pub fn new(star: Body, bodies: Vec<Body>) -> Self {
        Self { star, bodies, t: 0.0 }
    }
}
