//! Sampled trajectory output
//!
//! Long-format CSV, one row per body per recorded step:
//! `step,body,x,y,z`. Rows of the same step are contiguous, so a plotter
//! can group by `step` to get one frame.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::simulation::states::Body;

pub struct TrajectoryWriter<W: Write> {
    out: W,
    frames: usize,
}

impl TrajectoryWriter<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "step,body,x,y,z")?;
        Ok(Self { out, frames: 0 })
    }

    pub fn record(&mut self, step: usize, bodies: &[Body]) -> Result<()> {
        for (i, b) in bodies.iter().enumerate() {
            writeln!(self.out, "{},{},{},{},{}", step, i, b.x.x, b.x.y, b.x.z)?;
        }
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
