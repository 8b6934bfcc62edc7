//! Fixed-step time integration for the orbital system
//!
//! Semi-implicit (symplectic) Euler: the velocity is updated from the
//! acceleration first and the new velocity then moves the position.
//!
//! ```text
//! v += a * dt * scale
//! x += v * dt
//! ```
//!
//! `a` is in physical units; `scale` converts it into coordinate units.

use super::forces::acceleration_toward;
use super::states::{Body, NVec2};

/// Apply one semi-implicit Euler update with a precomputed acceleration
pub fn integrate(body: &mut Body, a: NVec2, dt: f64, scale: f64) {
    // Kick: v_n+1 = v_n + dt * a_n, with a_n converted to coordinate units
    body.v += a * dt * scale;

    // Drift with the updated velocity: x_n+1 = x_n + dt * v_n+1
    body.x += body.v * dt;
}

/// Advance `body` by one step under the pull of a single attractor.
///
/// Returns `false` and leaves the body untouched when it sits exactly on
/// the attractor.
#[allow(non_snake_case)]
pub fn step(body: &mut Body, attractor_x: NVec2, attractor_m: f64, G: f64, scale: f64, dt: f64) -> bool {
    // a_n from the current position, None when the body sits on the attractor
    match acceleration_toward(body, attractor_x, attractor_m, G, scale) {
        Some(a) => {
            integrate(body, a, dt, scale);
            true
        }
        None => {
            log::debug!("step skipped: body at {:?} coincides with attractor", body.x);
            false
        }
    }
}
