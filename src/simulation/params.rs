//! Numerical and physical parameters for one step
//!
//! `StepParams` holds:
//! - gravitational constant `G` (always caller-supplied),
//! - step size `dt`,
//! - softening `eps2` added to every squared separation

use super::error::{NbodyError, Result};

/// Physical gravitational constant in SI units (m³ kg⁻¹ s⁻²)
pub const G_SI: f64 = 6.674e-11;

/// Natural-unit gravitational constant
pub const G_UNIT: f64 = 1.0;

/// Default softening ε², keeps r² strictly positive for coincident bodies
pub const SOFTENING: f64 = 1e-10;

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepParams {
    pub G: f64,    // gravitational constant
    pub dt: f64,   // step size
    pub eps2: f64, // softening
}

impl StepParams {
    /// Parameters with the default softening
    #[allow(non_snake_case)]
    pub fn new(G: f64, dt: f64) -> Result<Self> {
        Self::with_softening(G, dt, SOFTENING)
    }

    #[allow(non_snake_case)]
    pub fn with_softening(G: f64, dt: f64, eps2: f64) -> Result<Self> {
        if !G.is_finite() {
            return Err(NbodyError::InvalidParameter { name: "G", value: G });
        }
        if !dt.is_finite() {
            return Err(NbodyError::InvalidParameter { name: "dt", value: dt });
        }
        if !(eps2.is_finite() && eps2 > 0.0) {
            return Err(NbodyError::InvalidParameter { name: "eps2", value: eps2 });
        }
        Ok(Self { G, dt, eps2 })
    }
}
