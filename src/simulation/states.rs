//! Core state types for the N-body kernel.
//!
//! A `Body` is a point mass with 3D position and velocity stored as
//! `nalgebra` vectors. Bodies are owned by a [`BodyStore`](super::store::BodyStore).

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64,   // mass
}

impl Body {
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Self {
        Self { x, v, m }
    }

    /// Build a body from the seven scalar components used by the flat interface
    pub fn from_components(x: f64, y: f64, z: f64, vx: f64, vy: f64, vz: f64, m: f64) -> Self {
        Self {
            x: NVec3::new(x, y, z),
            v: NVec3::new(vx, vy, vz),
            m,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self {
            x: NVec3::zeros(),
            v: NVec3::zeros(),
            m: 0.0,
        }
    }
}

/// Read-only view of a mass distribution: anything that can report a
/// position and mass per index. Both the record store and the raw
/// interleaved buffers implement this, so a single kernel serves both.
pub trait MassField: Sync {
    fn len(&self) -> usize;
    fn position(&self, i: usize) -> NVec3;
    fn mass(&self, i: usize) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MassField for [Body] {
    #[inline]
    fn len(&self) -> usize {
        <[Body]>::len(self)
    }

    #[inline]
    fn position(&self, i: usize) -> NVec3 {
        self[i].x
    }

    #[inline]
    fn mass(&self, i: usize) -> f64 {
        self[i].m
    }
}
