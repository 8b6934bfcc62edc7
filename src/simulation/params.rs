//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size and end time,
//! - gravitational constant `G` and distance scale,
//! - softening for body-body terms and trail length
//!
//! It is passed explicitly to every operation that needs it; there are no
//! process-wide constants.

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: f64, // time end
    pub h0: f64, // step size (s)
    pub G: f64, // gravitational constant
    pub scale: f64, // coordinate units per metre
    pub eps2: f64, // softening (m^2), mutual terms only
    pub trail_length: usize, // positions kept per body, 0 = none
}

impl Parameters {
    /// Number of fixed steps needed to reach `t_end`
    pub fn steps(&self) -> usize {
        if self.h0 <= 0.0 {
            return 0;
        }
        (self.t_end / self.h0).ceil().max(0.0) as usize
    }
}
