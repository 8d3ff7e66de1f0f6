//! Two-phase gravity kernels
//!
//! A step is always:
//! 1. acceleration phase: every body's acceleration from the frozen
//!    pre-step positions, written into a per-step buffer;
//! 2. barrier: the executor returns only once every chunk is done;
//! 3. integration phase: all velocities, then all positions.
//!
//! The three strategies share this code path through [`GravityKernel`] and
//! differ only in the [`ParallelFor`] executor that schedules phase 1.

use clap::ValueEnum;
use log::trace;
use serde::Deserialize;

use super::error::Result;
use super::flat::{check_layout, FlatField};
use super::forces::accelerations_for_range;
use super::integrator::{drift_flat, kick_flat, semi_implicit_euler};
use super::parallel::{ParallelFor, PoolExecutor, SerialExecutor, WorkerExecutor};
use super::params::StepParams;
use super::states::{MassField, NVec3};
use super::store::BodyStore;

/// Object-safe interface over every kernel, used by the runner and the
/// benchmark harness
pub trait ForceKernel: Send + Sync {
    /// Backend name, e.g. "serial"
    fn name(&self) -> &'static str;

    /// Workers used by the acceleration phase
    fn workers(&self) -> usize;

    /// Advance every body in `store` by one step
    fn step(&self, store: &mut BodyStore, params: &StepParams);

    /// Advance raw interleaved buffers by one step, in place
    fn step_flat(&self, masses: &[f64], positions: &mut [f64], velocities: &mut [f64], params: &StepParams) -> Result<()>;
}

pub struct GravityKernel<E: ParallelFor> {
    executor: E,
}

pub type SerialKernel = GravityKernel<SerialExecutor>;
pub type WorkerKernel = GravityKernel<WorkerExecutor>;
pub type LoopParallelKernel = GravityKernel<PoolExecutor>;

impl<E: ParallelFor> GravityKernel<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Acceleration phase only: fresh buffer, one entry per body
    pub fn accelerations<F: MassField + ?Sized>(&self, field: &F, params: &StepParams) -> Vec<NVec3> {
        let mut acc = vec![NVec3::zeros(); field.len()];
        self.executor.for_each_chunk(&mut acc, |start, chunk| {
            accelerations_for_range(field, start, chunk, params.G, params.eps2);
        });
        acc
    }
}

impl SerialKernel {
    pub fn new() -> Self {
        Self::with_executor(SerialExecutor)
    }
}

impl Default for SerialKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerKernel {
    pub fn new(threads: usize) -> Result<Self> {
        Ok(Self::with_executor(WorkerExecutor::new(threads)?))
    }
}

impl LoopParallelKernel {
    pub fn new(threads: usize) -> Result<Self> {
        Ok(Self::with_executor(PoolExecutor::new(threads)?))
    }
}

impl<E: ParallelFor> ForceKernel for GravityKernel<E> {
    fn name(&self) -> &'static str {
        self.executor.name()
    }

    fn workers(&self) -> usize {
        self.executor.workers()
    }

    fn step(&self, store: &mut BodyStore, params: &StepParams) {
        if store.is_empty() {
            return;
        }
        let acc = self.accelerations(store.bodies(), params);
        semi_implicit_euler(store.bodies_mut(), &acc, params.dt);
        trace!("{} step: {} bodies, dt = {}", self.name(), acc.len(), params.dt);
    }

    fn step_flat(&self, masses: &[f64], positions: &mut [f64], velocities: &mut [f64], params: &StepParams) -> Result<()> {
        check_layout(masses, positions, velocities)?;
        if masses.is_empty() {
            return Ok(());
        }
        let acc = {
            let field = FlatField::new(masses, positions)?;
            self.accelerations(&field, params)
        };
        kick_flat(velocities, &acc, params.dt);
        drift_flat(positions, velocities, params.dt);
        Ok(())
    }
}

/// Which scheduling substrate runs the acceleration phase
#[derive(Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    /// Single thread
    Serial,
    /// Manually spawned scoped threads, one per chunk
    Threads,
    /// rayon pool with static chunks
    Pool,
}

impl KernelKind {
    /// Build a boxed kernel. `threads` is ignored by `Serial` but must
    /// still be at least 1 for the parallel kinds.
    pub fn build(self, threads: usize) -> Result<Box<dyn ForceKernel>> {
        let kernel: Box<dyn ForceKernel> = match self {
            KernelKind::Serial => Box::new(SerialKernel::new()),
            KernelKind::Threads => Box::new(WorkerKernel::new(threads)?),
            KernelKind::Pool => Box::new(LoopParallelKernel::new(threads)?),
        };
        Ok(kernel)
    }
}
