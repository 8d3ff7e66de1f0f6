//! Timing harness for the force kernels
//!
//! [`seconds_per_step`] is the core instrument. It runs `steps` steps
//! back-to-back on the same store and divides the elapsed wall-clock time
//! by `steps`. State is deliberately NOT reset between steps: the number
//! measured is steady-state throughput, not isolated-step correctness.
//!
//! The sweeps reproduce the scaling studies: the same random system is
//! reloaded before each thread count so every row of one `n` starts from
//! identical bodies.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, Level};

use crate::configuration::config::UniformConfig;
use crate::periodic_logger::PeriodicLogger;
use crate::simulation::error::NbodyError;
use crate::simulation::kernel::{ForceKernel, KernelKind};
use crate::simulation::params::StepParams;
use crate::simulation::scenario::uniform_bodies;
use crate::simulation::store::BodyStore;

/// Mean wall-clock seconds per step over `steps` consecutive steps
pub fn seconds_per_step(kernel: &dyn ForceKernel, store: &mut BodyStore, params: &StepParams, steps: usize) -> crate::Result<f64> {
    if steps == 0 {
        return Err(NbodyError::InvalidStepCount(steps));
    }

    let t0 = Instant::now();
    for _ in 0..steps {
        kernel.step(store, params);
    }
    let per_step = t0.elapsed().as_secs_f64() / steps as f64;

    debug!(
        "{} x{}: n = {}, {} steps, {:.6} s/step",
        kernel.name(),
        kernel.workers(),
        store.size(),
        steps,
        per_step
    );
    Ok(per_step)
}

/// One row of a thread-scaling sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRecord {
    pub n: usize,
    pub threads: usize,
    pub seconds_per_step: f64,
    pub speedup: f64,            // baseline time / this time
    pub efficiency: f64,         // speedup / threads
    pub computational_cost: f64, // seconds per step / n²
}

/// Settings shared by every row of a sweep
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub kernel: KernelKind,
    pub ns: Vec<usize>,
    pub threads: Vec<usize>,
    pub steps: usize,
    pub G: f64,
    pub dt: f64,
    pub seed: u64,
}

/// Time `cfg.kernel` for every (n, threads) pair.
///
/// The first entry of `cfg.threads` is the baseline for speedup and
/// efficiency of each `n` (normally 1).
pub fn thread_sweep(cfg: &SweepConfig) -> Result<Vec<SweepRecord>> {
    anyhow::ensure!(!cfg.threads.is_empty(), "thread sweep needs at least one thread count");
    let params = StepParams::new(cfg.G, cfg.dt)?;

    let total = cfg.ns.len() * cfg.threads.len();
    let mut records = Vec::with_capacity(total);
    let mut periodic = PeriodicLogger::new(&format!("thread sweep: {total} runs"), Level::Info);

    for &n in &cfg.ns {
        let initial = sweep_bodies(n, cfg.seed)?;
        let mut baseline = None;

        for &threads in &cfg.threads {
            let kernel = cfg.kernel.build(threads)?;
            let mut store = initial.clone();
            let t = seconds_per_step(kernel.as_ref(), &mut store, &params, cfg.steps)?;

            let speedup = match baseline {
                None => {
                    baseline = Some(t);
                    1.0
                }
                Some(base) => base / t,
            };
            records.push(SweepRecord {
                n,
                threads,
                seconds_per_step: t,
                speedup,
                efficiency: speedup / threads as f64,
                computational_cost: t / (n as f64 * n as f64),
            });
            periodic.log(format_args!("{} / {} done (n = {n})", records.len(), total));
        }
    }

    Ok(records)
}

/// Serial timing for each `n`
pub fn size_sweep(cfg: &SweepConfig) -> Result<Vec<(usize, f64)>> {
    let params = StepParams::new(cfg.G, cfg.dt)?;
    let kernel = KernelKind::Serial.build(1)?;
    let mut rows = Vec::with_capacity(cfg.ns.len());
    let mut periodic = PeriodicLogger::new(&format!("size sweep: {} runs", cfg.ns.len()), Level::Info);

    for &n in &cfg.ns {
        let mut store = sweep_bodies(n, cfg.seed)?;
        let t = seconds_per_step(kernel.as_ref(), &mut store, &params, cfg.steps)?;
        rows.push((n, t));
        periodic.log(format_args!("n = {n}: {t:.6} s/step"));
    }
    Ok(rows)
}

/// Random box used by the sweeps: positions ±50, velocities ±1, masses 0.1..10
fn sweep_bodies(n: usize, seed: u64) -> Result<BodyStore> {
    let bodies = uniform_bodies(&UniformConfig {
        n,
        seed,
        pos_range: [-50.0, 50.0],
        vel_range: [-1.0, 1.0],
        mass_range: [0.1, 10.0],
    });
    Ok(BodyStore::from_bodies(bodies)?)
}

pub fn write_sweep_csv<W: Write>(mut out: W, records: &[SweepRecord]) -> Result<()> {
    writeln!(out, "N,threads,time_elapsed,speedup,efficiency,computational_cost")?;
    for r in records {
        writeln!(
            out,
            "{},{},{:.9},{:.6},{:.6},{:.6e}",
            r.n, r.threads, r.seconds_per_step, r.speedup, r.efficiency, r.computational_cost
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_size_csv<W: Write>(mut out: W, rows: &[(usize, f64)]) -> Result<()> {
    writeln!(out, "N,time_elapsed")?;
    for (n, t) in rows {
        writeln!(out, "{n},{t:.9}")?;
    }
    out.flush()?;
    Ok(())
}

pub fn create_csv(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
