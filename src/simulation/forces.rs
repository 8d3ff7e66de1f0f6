//! Softened Newtonian gravity, direct n² sum
//!
//! Unlike a pair-symmetric (i < j) loop, each body's acceleration here is
//! the full sum over every other body. That makes the acceleration of body
//! `i` depend only on the read-only snapshot, so any contiguous range of `i`
//! can be evaluated independently by a separate worker.

use super::states::{MassField, NVec3};

/// Acceleration on body `i` from every body `j != i`
///
/// a_i = Σ G * m_j * r / |r_soft|^3, with r = x_j - x_i and
/// |r_soft|² = |r|² + eps2
#[allow(non_snake_case)]
#[inline]
pub fn acceleration_on<F: MassField + ?Sized>(field: &F, i: usize, G: f64, eps2: f64) -> NVec3 {
    let xi = field.position(i);
    let mut acc = NVec3::zeros();

    for j in 0..field.len() {
        if j == i {
            continue; // no self-interaction
        }

        // displacement from i toward j
        let r = field.position(j) - xi;

        // softened distance, never zero while eps2 > 0
        let d2 = r.dot(&r) + eps2;
        let d = d2.sqrt();
        let inv_r3 = 1.0 / (d * d * d);

        acc += G * field.mass(j) * inv_r3 * r;
    }

    acc
}

/// Fill `out` with accelerations for bodies `start..start + out.len()`
///
/// Reads only from `field`, writes only into `out`
#[allow(non_snake_case)]
pub fn accelerations_for_range<F: MassField + ?Sized>(field: &F, start: usize, out: &mut [NVec3], G: f64, eps2: f64) {
    for (k, a) in out.iter_mut().enumerate() {
        *a = acceleration_on(field, start + k, G, eps2);
    }
}
