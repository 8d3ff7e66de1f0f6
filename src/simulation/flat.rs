//! Raw contiguous-buffer view of a body collection
//!
//! Layout, for n bodies:
//! - `masses`: length n
//! - `positions`: length 3n, body-major `x, y, z` triples
//! - `velocities`: length 3n, same interleaving
//!
//! This is the representation handed across a foreign-function boundary.

use super::error::{NbodyError, Result};
use super::states::{MassField, NVec3};

/// Borrowed masses + interleaved positions, readable by the force kernel
#[derive(Debug, Clone, Copy)]
pub struct FlatField<'a> {
    masses: &'a [f64],
    positions: &'a [f64],
}

impl<'a> FlatField<'a> {
    pub fn new(masses: &'a [f64], positions: &'a [f64]) -> Result<Self> {
        check_interleaved("positions", masses.len(), positions.len())?;
        Ok(Self { masses, positions })
    }
}

impl MassField for FlatField<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.masses.len()
    }

    #[inline]
    fn position(&self, i: usize) -> NVec3 {
        NVec3::new(self.positions[3 * i], self.positions[3 * i + 1], self.positions[3 * i + 2])
    }

    #[inline]
    fn mass(&self, i: usize) -> f64 {
        self.masses[i]
    }
}

/// Validate the three buffers of the flat interface against each other
pub fn check_layout(masses: &[f64], positions: &[f64], velocities: &[f64]) -> Result<()> {
    check_interleaved("positions", masses.len(), positions.len())?;
    check_interleaved("velocities", masses.len(), velocities.len())?;
    for (index, &mass) in masses.iter().enumerate() {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(NbodyError::InvalidMass { index, mass });
        }
    }
    Ok(())
}

fn check_interleaved(what: &'static str, n: usize, found: usize) -> Result<()> {
    if found == 3 * n {
        Ok(())
    } else {
        Err(NbodyError::LengthMismatch { what, expected: 3 * n, found })
    }
}
