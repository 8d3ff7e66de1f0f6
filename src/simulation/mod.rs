pub mod error;
pub mod states;
pub mod store;
pub mod params;
pub mod forces;
pub mod parallel;
pub mod integrator;
pub mod flat;
pub mod kernel;
pub mod scenario;
pub mod engine;
