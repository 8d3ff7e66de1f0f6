//! Step loop for a built [`Scenario`]
//!
//! Runs the scenario's kernel for its configured number of steps and, when
//! asked, samples positions into a trajectory every `record_every` steps
//! (step 0 is the initial state).

use std::io::Write;

use anyhow::Result;
use log::{info, Level};

use crate::io::trajectory::TrajectoryWriter;
use crate::periodic_logger::PeriodicLogger;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::NVec3;

/// Summary of a finished run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub steps: usize,
    pub frames: usize,
    pub seconds: f64,
    pub center_of_mass: NVec3, // final
    pub momentum: NVec3,       // final
}

pub fn run_scenario<W: Write>(scenario: &mut Scenario, mut trajectory: Option<&mut TrajectoryWriter<W>>) -> Result<RunSummary> {
    let steps = scenario.steps;
    let every = scenario.record_every;
    let mut frames = 0;

    let mut record = |step: usize, scenario: &Scenario| -> Result<()> {
        if let Some(w) = trajectory.as_deref_mut() {
            if every > 0 && step % every == 0 {
                w.record(step, scenario.store.bodies())?;
                frames += 1;
            }
        }
        Ok(())
    };

    record(0, scenario)?;

    let start = std::time::Instant::now();
    let mut periodic = PeriodicLogger::new(
        &format!("running {} steps with the {} kernel", steps, scenario.kernel.name()),
        Level::Info,
    );
    for step in 1..=steps {
        scenario.kernel.step(&mut scenario.store, &scenario.params);
        record(step, scenario)?;
        periodic.log(format_args!("step {step} / {steps}"));
    }
    let seconds = start.elapsed().as_secs_f64();

    let store = &scenario.store;
    let com = store.center_of_mass();
    let p = store.momentum();
    info!("finished {} steps in {:.3} s", steps, seconds);
    info!(
        "total mass = {:.6e}, center of mass = ({:.3e}, {:.3e}, {:.3e}), net momentum = ({:.3e}, {:.3e}, {:.3e})",
        store.total_mass(),
        com.x,
        com.y,
        com.z,
        p.x,
        p.y,
        p.z
    );

    Ok(RunSummary {
        steps,
        frames,
        seconds,
        center_of_mass: com,
        momentum: p,
    })
}
