//! Build fully-initialized runs from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! holding the chosen kernel, validated step parameters and a populated
//! body store. Also hosts the initial-condition generators.

use std::f64::consts::TAU;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use log::info;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::configuration::config::{BodiesConfig, BodyConfig, GalaxyConfig, ScenarioConfig, UniformConfig};
use crate::io::bodies_csv::read_bodies_csv;
use crate::simulation::kernel::ForceKernel;
use crate::simulation::params::{StepParams, SOFTENING};
use crate::simulation::states::{Body, NVec3};
use crate::simulation::store::BodyStore;

/// Everything needed to run a scenario
pub struct Scenario {
    pub kernel: Box<dyn ForceKernel>,
    pub params: StepParams,
    pub store: BodyStore,
    pub steps: usize,
    pub record_every: usize,
}

impl Scenario {
    /// `base_dir` resolves relative CSV paths (normally the YAML file's directory)
    pub fn build_scenario(cfg: ScenarioConfig, base_dir: &Path) -> Result<Self> {
        let p_cfg = cfg.parameters;
        let params = StepParams::with_softening(p_cfg.G, p_cfg.dt, p_cfg.eps2.unwrap_or(SOFTENING))
            .context("invalid step parameters")?;

        let kernel = cfg
            .engine
            .kernel
            .build(cfg.engine.threads)
            .context("failed to build kernel")?;

        let bodies = match cfg.bodies {
            BodiesConfig::Inline(list) => list.iter().map(body_from_config).collect(),
            BodiesConfig::Csv(path) => {
                let path = base_dir.join(path);
                read_bodies_csv(&path).with_context(|| format!("failed to read bodies from {}", path.display()))?
            }
            BodiesConfig::Uniform(u) => {
                for (name, [lo, hi]) in [("pos_range", u.pos_range), ("vel_range", u.vel_range), ("mass_range", u.mass_range)] {
                    ensure!(lo < hi, "uniform {name} must be increasing, got [{lo}, {hi}]");
                }
                uniform_bodies(&u)
            }
            BodiesConfig::Galaxy(g) => {
                let [lo, hi] = g.star_mass;
                ensure!(lo < hi, "galaxy star_mass must be increasing, got [{lo}, {hi}]");
                ensure!(g.r_max > 0.0 && g.thickness >= 0.0, "galaxy r_max must be > 0 and thickness >= 0");
                galaxy_bodies(&g)
            }
        };
        let store = BodyStore::from_bodies(bodies).context("invalid initial bodies")?;

        info!(
            "scenario: {} bodies, kernel = {} x{}, G = {}, dt = {}, steps = {}",
            store.size(),
            kernel.name(),
            kernel.workers(),
            params.G,
            params.dt,
            p_cfg.steps
        );

        Ok(Self {
            kernel,
            params,
            store,
            steps: p_cfg.steps,
            record_every: p_cfg.record_every,
        })
    }
}

fn body_from_config(bc: &BodyConfig) -> Body {
    Body::new(NVec3::from(bc.x), NVec3::from(bc.v), bc.m)
}

/// Uniformly distributed positions, velocities and masses in a box
pub fn uniform_bodies(cfg: &UniformConfig) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let [p0, p1] = cfg.pos_range;
    let [v0, v1] = cfg.vel_range;
    let [m0, m1] = cfg.mass_range;

    (0..cfg.n)
        .map(|_| {
            let x = NVec3::new(rng.gen_range(p0..p1), rng.gen_range(p0..p1), rng.gen_range(p0..p1));
            let v = NVec3::new(rng.gen_range(v0..v1), rng.gen_range(v0..v1), rng.gen_range(v0..v1));
            Body::new(x, v, rng.gen_range(m0..m1))
        })
        .collect()
}

/// Rotating disk galaxy.
///
/// Radii are drawn as `r_max * sqrt(u)` so density rises toward the center.
/// Each disk body gets the tangential speed of a circular orbit around the
/// enclosed mass (the core if present, otherwise its own mass as a crude
/// scale), multiplied by `speed_factor`. Finally the center-of-mass velocity
/// is subtracted so the galaxy does not drift.
pub fn galaxy_bodies(cfg: &GalaxyConfig) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed);
    let mut bodies = Vec::with_capacity(cfg.n);

    let has_core = cfg.core_mass > 0.0 && cfg.n > 0;
    if has_core {
        bodies.push(Body::new(NVec3::zeros(), NVec3::zeros(), cfg.core_mass));
    }

    let [m0, m1] = cfg.star_mass;
    let eps = 1e-3;
    while bodies.len() < cfg.n {
        let r = cfg.r_max * rng.gen::<f64>().sqrt();
        let theta = TAU * rng.gen::<f64>();
        let z = if cfg.thickness > 0.0 {
            rng.gen_range(-cfg.thickness..cfg.thickness)
        } else {
            0.0
        };
        let m = rng.gen_range(m0..m1);

        let attractor = if has_core { cfg.core_mass } else { m };
        let v_circ = cfg.speed_factor * (cfg.G * attractor / (r + eps)).sqrt();

        let x = NVec3::new(r * theta.cos(), r * theta.sin(), z);
        let v = NVec3::new(-v_circ * theta.sin(), v_circ * theta.cos(), 0.0);
        bodies.push(Body::new(x, v, m));
    }

    remove_bulk_motion(&mut bodies);
    bodies
}

/// Subtract the center-of-mass velocity from every body
pub fn remove_bulk_motion(bodies: &mut [Body]) {
    let total: f64 = bodies.iter().map(|b| b.m).sum();
    if total <= 0.0 {
        return;
    }
    let p = bodies.iter().fold(NVec3::zeros(), |acc, b| acc + b.v * b.m);
    let v_com = p / total;
    for b in bodies.iter_mut() {
        b.v -= v_com;
    }
}

/// Deterministic quasi-random cloud, no RNG involved
pub fn lattice_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            );
            Body::new(x, NVec3::zeros(), 1.0)
        })
        .collect()
}
