//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! run. A scenario consists of:
//!
//! - [`EngineConfig`]     – which kernel runs the acceleration phase, and with how many workers
//! - [`ParametersConfig`] – step parameters, step count and trajectory sampling
//! - [`BodiesConfig`]     – where the initial bodies come from
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   kernel: threads         # serial | threads | pool
//!   threads: 4
//!
//! parameters:
//!   G: 6.674e-11            # required, no default
//!   dt: 100000.0
//!   eps2: 1.0e-10           # optional
//!   steps: 20
//!   record_every: 1         # optional, 0 disables trajectory output
//!
//! bodies:
//!   inline:
//!     - x: [ 0.0, 0.0, 0.0 ]
//!       v: [ 0.0, 0.0, 0.0 ]
//!       m: 5.97e24
//!     - x: [ 3.84e8, 0.0, 0.0 ]
//!       v: [ 0.0, 1022.0, 0.0 ]
//!       m: 7.35e22
//! ```
//!
//! Instead of `inline`, `bodies` may name a CSV file (`csv: path`), or one of
//! the generators (`uniform: {...}`, `galaxy: {...}`).

use serde::Deserialize;

use crate::simulation::kernel::KernelKind;

/// Kernel selection
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub kernel: KernelKind, // scheduling substrate for the acceleration phase
    #[serde(default = "default_threads")]
    pub threads: usize, // workers for `threads` / `pool`, ignored by `serial`
}

fn default_threads() -> usize {
    1
}

/// Step parameters and run length
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub G: f64,                // gravitational constant, always explicit
    pub dt: f64,               // step size
    pub eps2: Option<f64>,     // softening, defaults to `SOFTENING`
    pub steps: usize,          // number of steps to run
    #[serde(default)]
    pub record_every: usize,   // trajectory sampling period in steps, 0 = off
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 3], // initial position
    pub v: [f64; 3], // initial velocity
    pub m: f64,      // mass, > 0
}

/// Uniform random box, the distribution used by the timing sweeps
#[derive(Deserialize, Debug, Clone)]
pub struct UniformConfig {
    pub n: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_pos_range")]
    pub pos_range: [f64; 2],
    #[serde(default = "default_vel_range")]
    pub vel_range: [f64; 2],
    #[serde(default = "default_mass_range")]
    pub mass_range: [f64; 2],
}

/// Rotating disk with an optional central mass
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct GalaxyConfig {
    pub n: usize,                // total bodies, including the core if any
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub G: f64,                  // G the orbital speeds are tuned for
    #[serde(default = "default_r_max")]
    pub r_max: f64,              // disk radius
    #[serde(default)]
    pub thickness: f64,          // half-height of the disk
    #[serde(default)]
    pub core_mass: f64,          // 0 = no central body
    #[serde(default = "default_star_mass")]
    pub star_mass: [f64; 2],     // uniform mass range for disk bodies
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,       // multiplier on circular speed
}

/// Source of initial conditions, exactly one per scenario
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum BodiesConfig {
    Inline(Vec<BodyConfig>),
    Csv(String),
    Uniform(UniformConfig),
    Galaxy(GalaxyConfig),
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,         // kernel selection
    pub parameters: ParametersConfig, // step parameters
    pub bodies: BodiesConfig,         // initial state
}

fn default_seed() -> u64 {
    42
}

fn default_pos_range() -> [f64; 2] {
    [-50.0, 50.0]
}

fn default_vel_range() -> [f64; 2] {
    [-1.0, 1.0]
}

fn default_mass_range() -> [f64; 2] {
    [0.1, 10.0]
}

fn default_r_max() -> f64 {
    280.0
}

fn default_star_mass() -> [f64; 2] {
    [0.5, 3.0]
}

fn default_speed_factor() -> f64 {
    1.0
}
