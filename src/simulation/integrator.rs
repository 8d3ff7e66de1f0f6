//! Semi-implicit (symplectic) Euler integration
//!
//! Applied once the acceleration phase has finished for every body:
//! - kick: v_n+1 = v_n + dt * a_n, for all bodies
//! - drift: x_n+1 = x_n + dt * v_n+1, for all bodies, using the new velocity
//!
//! The record and flat-buffer variants perform the same arithmetic in the
//! same order.

use super::states::{Body, NVec3};

/// v += a * dt for every body
pub fn kick(bodies: &mut [Body], acc: &[NVec3], dt: f64) {
    debug_assert_eq!(bodies.len(), acc.len());
    for (b, a) in bodies.iter_mut().zip(acc.iter()) {
        b.v += *a * dt;
    }
}

/// x += v * dt for every body
pub fn drift(bodies: &mut [Body], dt: f64) {
    for b in bodies.iter_mut() {
        b.x += b.v * dt;
    }
}

/// Full integration phase: all velocities, then all positions
pub fn semi_implicit_euler(bodies: &mut [Body], acc: &[NVec3], dt: f64) {
    kick(bodies, acc, dt);
    drift(bodies, dt);
}

/// Kick on an interleaved `x,y,z` velocity buffer
pub fn kick_flat(velocities: &mut [f64], acc: &[NVec3], dt: f64) {
    debug_assert_eq!(velocities.len(), 3 * acc.len());
    for (v, a) in velocities.chunks_exact_mut(3).zip(acc.iter()) {
        v[0] += a.x * dt;
        v[1] += a.y * dt;
        v[2] += a.z * dt;
    }
}

/// Drift on interleaved position/velocity buffers
pub fn drift_flat(positions: &mut [f64], velocities: &[f64], dt: f64) {
    debug_assert_eq!(positions.len(), velocities.len());
    for (x, v) in positions.chunks_exact_mut(3).zip(velocities.chunks_exact(3)) {
        x[0] += v[0] * dt;
        x[1] += v[1] * dt;
        x[2] += v[2] * dt;
    }
}
