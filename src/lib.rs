pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod io;
pub mod periodic_logger;

pub use simulation::error::{NbodyError, Result};
pub use simulation::states::{Body, NVec3, MassField};
pub use simulation::store::BodyStore;
pub use simulation::params::{StepParams, G_SI, G_UNIT, SOFTENING};
pub use simulation::parallel::{static_chunks, ParallelFor, SerialExecutor, WorkerExecutor, PoolExecutor};
pub use simulation::kernel::{ForceKernel, GravityKernel, KernelKind, SerialKernel, WorkerKernel, LoopParallelKernel};
pub use simulation::scenario::Scenario;
pub use simulation::engine::{run_scenario, RunSummary};

pub use configuration::config::{ScenarioConfig, EngineConfig, ParametersConfig, BodiesConfig, BodyConfig, UniformConfig, GalaxyConfig};

pub use benchmark::benchmark::{seconds_per_step, thread_sweep, size_sweep, SweepConfig, SweepRecord};
