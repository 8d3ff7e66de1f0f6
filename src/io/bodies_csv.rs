//! Plain CSV initial conditions
//!
//! One header line, then one body per line: `x,y,z,vx,vy,vz,mass`.
//! Blank lines are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::simulation::error::NbodyError;
use crate::simulation::states::Body;

pub const BODIES_HEADER: &str = "x,y,z,vx,vy,vz,mass";

pub fn read_bodies_csv(path: &Path) -> Result<Vec<Body>> {
    let file = File::open(path)?;
    parse_bodies(BufReader::new(file))
}

/// Parse bodies from any reader; the first line is always treated as a header
pub fn parse_bodies<R: BufRead>(reader: R) -> Result<Vec<Body>> {
    let mut bodies = Vec::new();
    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let fields = trimmed
            .split(',')
            .map(|f| f.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(|e| NbodyError::Csv { line: line_no, message: e.to_string() })?;

        let &[x, y, z, vx, vy, vz, m] = fields.as_slice() else {
            return Err(NbodyError::Csv {
                line: line_no,
                message: format!("expected 7 columns, found {}", fields.len()),
            }
            .into());
        };
        bodies.push(Body::from_components(x, y, z, vx, vy, vz, m));
    }
    Ok(bodies)
}

pub fn write_bodies_csv(path: &Path, bodies: &[Body]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{BODIES_HEADER}")?;
    for b in bodies {
        writeln!(out, "{},{},{},{},{},{},{}", b.x.x, b.x.y, b.x.z, b.v.x, b.v.y, b.v.z, b.m)?;
    }
    out.flush()?;
    Ok(())
}
