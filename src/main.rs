use nbsim::{ScenarioConfig, Scenario, run_scenario};
use nbsim::{seconds_per_step, thread_sweep, size_sweep, SweepConfig};
use nbsim::{BodyStore, GalaxyConfig, KernelKind, StepParams, UniformConfig};
use nbsim::benchmark::benchmark::{create_csv, write_size_csv, write_sweep_csv};
use nbsim::io::bodies_csv::write_bodies_csv;
use nbsim::io::trajectory::TrajectoryWriter;
use nbsim::periodic_logger::set_default_interval;
use nbsim::simulation::scenario::{galaxy_bodies, uniform_bodies};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "nbsim", about = "Brute-force N-body step kernels and timing harness")]
struct Args {
    /// Seconds between progress lines of long loops
    #[arg(long, global = true, default_value_t = 1.0)]
    log_interval: f64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a YAML scenario, optionally writing a trajectory CSV
    Run {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Time one kernel on a random system
    Bench {
        #[arg(long, default_value_t = 1000)]
        n: usize,
        #[arg(long, value_enum, default_value_t = KernelKind::Threads)]
        kernel: KernelKind,
        #[arg(long, default_value_t = 4)]
        threads: usize,
        #[arg(long, default_value_t = 100)]
        steps: usize,
        #[arg(long = "gravity", default_value_t = 0.001)]
        gravity: f64,
        #[arg(long, default_value_t = 0.001)]
        dt: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Thread-scaling (or serial size) sweep written as CSV
    Sweep {
        #[arg(long, value_delimiter = ',', default_values_t = vec![500, 1000, 2000, 4000, 5000])]
        ns: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_values_t = vec![1, 2, 4, 8, 16, 32])]
        threads: Vec<usize>,
        #[arg(long, value_enum, default_value_t = KernelKind::Threads)]
        kernel: KernelKind,
        #[arg(long, default_value_t = 100)]
        steps: usize,
        #[arg(long = "gravity", default_value_t = 0.001)]
        gravity: f64,
        #[arg(long, default_value_t = 0.001)]
        dt: f64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Time only the serial kernel per n, ignoring --threads
        #[arg(long)]
        serial_only: bool,
        #[arg(short, long, default_value = "times.csv")]
        output: PathBuf,
    },
    /// Write generated initial conditions as a bodies CSV
    Generate {
        #[arg(value_enum)]
        kind: Generator,
        #[arg(long, default_value_t = 200)]
        n: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// G the galaxy orbital speeds are tuned for
        #[arg(long = "gravity", default_value_t = 0.001)]
        gravity: f64,
        #[arg(long, default_value_t = 5000.0)]
        core_mass: f64,
        #[arg(long, default_value_t = 3.0)]
        speed_factor: f64,
        #[arg(short, long, default_value = "system.csv")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Generator {
    Uniform,
    Galaxy,
}

// load here to keep main clean
fn load_scenario_from_yaml(path: &Path) -> Result<ScenarioConfig> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    Ok(scenario_cfg)
}

fn run(file: &Path, output: Option<&Path>) -> Result<()> {
    let cfg = load_scenario_from_yaml(file)?;
    let base_dir = file.parent().unwrap_or(Path::new("."));
    let mut scenario = Scenario::build_scenario(cfg, base_dir)?;

    match output {
        Some(path) => {
            let mut writer = TrajectoryWriter::create(path)?;
            let summary = run_scenario(&mut scenario, Some(&mut writer))?;
            writer.finish()?;
            info!("wrote {} frames to {}", summary.frames, path.display());
        }
        None => {
            run_scenario::<File>(&mut scenario, None)?;
        }
    }

    for (i, b) in scenario.store.bodies().iter().enumerate().take(10) {
        println!(
            "Body {i} with mass {:.3}: Pos({:.3}, {:.3}, {:.3}) Vel({:.3}, {:.3}, {:.3})",
            b.m, b.x.x, b.x.y, b.x.z, b.v.x, b.v.y, b.v.z
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn bench(n: usize, kernel: KernelKind, threads: usize, steps: usize, g: f64, dt: f64, seed: u64) -> Result<()> {
    let params = StepParams::new(g, dt)?;
    let kernel = kernel.build(threads)?;
    let bodies = uniform_bodies(&UniformConfig {
        n,
        seed,
        pos_range: [-50.0, 50.0],
        vel_range: [-1.0, 1.0],
        mass_range: [0.1, 10.0],
    });
    let mut store = BodyStore::from_bodies(bodies)?;
    let t = seconds_per_step(kernel.as_ref(), &mut store, &params, steps)?;
    println!("N = {n:5}, kernel = {} x{}, {:.6} s/step", kernel.name(), kernel.workers(), t);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let interval = Duration::try_from_secs_f64(args.log_interval)
        .with_context(|| format!("invalid --log-interval {}", args.log_interval))?;
    set_default_interval(interval);

    match args.command {
        Command::Run { file, output } => run(&file, output.as_deref())?,
        Command::Bench { n, kernel, threads, steps, gravity, dt, seed } => {
            bench(n, kernel, threads, steps, gravity, dt, seed)?
        }
        Command::Sweep { ns, threads, kernel, steps, gravity, dt, seed, serial_only, output } => {
            let cfg = SweepConfig { kernel, ns, threads, steps, G: gravity, dt, seed };
            let out = create_csv(&output)?;
            if serial_only {
                write_size_csv(out, &size_sweep(&cfg)?)?;
            } else {
                write_sweep_csv(out, &thread_sweep(&cfg)?)?;
            }
            info!("wrote {}", output.display());
        }
        Command::Generate { kind, n, seed, gravity, core_mass, speed_factor, output } => {
            let bodies = match kind {
                Generator::Uniform => uniform_bodies(&UniformConfig {
                    n,
                    seed,
                    pos_range: [-50.0, 50.0],
                    vel_range: [-1.0, 1.0],
                    mass_range: [0.1, 10.0],
                }),
                Generator::Galaxy => galaxy_bodies(&GalaxyConfig {
                    n,
                    seed,
                    G: gravity,
                    r_max: 280.0,
                    thickness: 15.0,
                    core_mass,
                    star_mass: [0.5, 3.0],
                    speed_factor,
                }),
            };
            write_bodies_csv(&output, &bodies)?;
            info!("wrote {} bodies to {}", bodies.len(), output.display());
        }
    }

    Ok(())
}
