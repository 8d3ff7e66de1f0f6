//! Fixed-length body storage
//!
//! The store owns all mutable simulation state. Its length is chosen at
//! construction and never changes; every accessor checks the index and
//! every write checks the mass.

use super::error::{NbodyError, Result};
use super::states::{Body, NVec3};

#[derive(Debug, Clone, Default)]
pub struct BodyStore {
    bodies: Vec<Body>,
}

impl BodyStore {
    /// Allocate `n` zero-valued bodies
    pub fn new(n: usize) -> Self {
        Self {
            bodies: vec![Body::default(); n],
        }
    }

    /// Take ownership of already-built bodies, validating every mass
    pub fn from_bodies(bodies: Vec<Body>) -> Result<Self> {
        for (i, b) in bodies.iter().enumerate() {
            check_mass(i, b.m)?;
        }
        Ok(Self { bodies })
    }

    pub fn size(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Replace the full state of body `i`
    pub fn set(&mut self, i: usize, body: Body) -> Result<()> {
        let len = self.bodies.len();
        let slot = self
            .bodies
            .get_mut(i)
            .ok_or(NbodyError::IndexOutOfBounds { index: i, len })?;
        check_mass(i, body.m)?;
        *slot = body;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_components(&mut self, i: usize, x: f64, y: f64, z: f64, vx: f64, vy: f64, vz: f64, m: f64) -> Result<()> {
        self.set(i, Body::from_components(x, y, z, vx, vy, vz, m))
    }

    /// Copy of body `i`
    pub fn get(&self, i: usize) -> Result<Body> {
        self.bodies
            .get(i)
            .copied()
            .ok_or(NbodyError::IndexOutOfBounds { index: i, len: self.bodies.len() })
    }

    /// Replace all bodies from seven index-aligned sequences.
    ///
    /// Every length and mass is checked before anything is written, so a
    /// failed load leaves the store untouched.
    #[allow(clippy::too_many_arguments)]
    pub fn bulk_load(&mut self, xs: &[f64], ys: &[f64], zs: &[f64], vxs: &[f64], vys: &[f64], vzs: &[f64], ms: &[f64]) -> Result<()> {
        let n = self.bodies.len();
        let columns: [(&'static str, &[f64]); 7] = [
            ("x", xs),
            ("y", ys),
            ("z", zs),
            ("vx", vxs),
            ("vy", vys),
            ("vz", vzs),
            ("m", ms),
        ];
        for (what, col) in columns {
            if col.len() != n {
                return Err(NbodyError::LengthMismatch { what, expected: n, found: col.len() });
            }
        }
        for (i, &m) in ms.iter().enumerate() {
            check_mass(i, m)?;
        }

        for (i, b) in self.bodies.iter_mut().enumerate() {
            *b = Body::from_components(xs[i], ys[i], zs[i], vxs[i], vys[i], vzs[i], ms[i]);
        }
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.m).sum()
    }

    /// Mass-weighted mean position, or the origin for a massless store
    pub fn center_of_mass(&self) -> NVec3 {
        let total = self.total_mass();
        if total == 0.0 {
            return NVec3::zeros();
        }
        self.bodies.iter().fold(NVec3::zeros(), |acc, b| acc + b.x * b.m) / total
    }

    /// Total linear momentum Σ m·v
    pub fn momentum(&self) -> NVec3 {
        self.bodies.iter().fold(NVec3::zeros(), |acc, b| acc + b.v * b.m)
    }
}

fn check_mass(index: usize, mass: f64) -> Result<()> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(NbodyError::InvalidMass { index, mass })
    }
}
