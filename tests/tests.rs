use nbsim::io::bodies_csv::{read_bodies_csv, write_bodies_csv};
use nbsim::simulation::scenario::{lattice_bodies, uniform_bodies};
use nbsim::{static_chunks, Body, BodyStore, ForceKernel, KernelKind, NVec3, NbodyError, ScenarioConfig, StepParams, UniformConfig};
use nbsim::{seconds_per_step, LoopParallelKernel, SerialKernel, WorkerKernel, G_SI};

/// Build a 2-body store separated along the x-axis, at rest
pub fn two_body_store(dist: f64, m1: f64, m2: f64) -> BodyStore {
    BodyStore::from_bodies(vec![
        Body::new(NVec3::new(-dist / 2.0, 0.0, 0.0), NVec3::zeros(), m1),
        Body::new(NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros(), m2),
    ])
    .unwrap()
}

/// Default step parameters for tests
pub fn test_params() -> StepParams {
    StepParams::new(0.1, 0.001).unwrap()
}

/// Every kernel flavour the crate offers, with the given worker count
pub fn all_kernels(threads: usize) -> Vec<Box<dyn ForceKernel>> {
    vec![
        Box::new(SerialKernel::new()),
        Box::new(WorkerKernel::new(threads).unwrap()),
        Box::new(LoopParallelKernel::new(threads).unwrap()),
    ]
}

fn rel_close(a: f64, b: f64, rel: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1e-300);
    (a - b).abs() <= rel * scale
}

fn assert_vec_close(a: &NVec3, b: &NVec3, rel: f64) {
    for k in 0..3 {
        assert!(rel_close(a[k], b[k], rel), "component {k}: {a:?} vs {b:?}");
    }
}

// ==================================================================================
// Body store
// ==================================================================================

#[test]
fn store_set_get_roundtrip() {
    let mut store = BodyStore::new(4);
    store.set_components(2, 1.5, -2.0, 3.25, 0.1, 0.2, -0.3, 7.0).unwrap();

    let b = store.get(2).unwrap();
    assert_eq!(b, Body::from_components(1.5, -2.0, 3.25, 0.1, 0.2, -0.3, 7.0));
    assert_eq!(store.get(0).unwrap(), Body::default());
    assert_eq!(store.size(), 4);
}

#[test]
fn store_out_of_range_is_an_error() {
    let mut store = BodyStore::new(3);
    assert!(matches!(store.get(3), Err(NbodyError::IndexOutOfBounds { index: 3, len: 3 })));
    assert!(matches!(
        store.set(7, Body::from_components(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0)),
        Err(NbodyError::IndexOutOfBounds { index: 7, len: 3 })
    ));
}

#[test]
fn store_rejects_non_positive_mass() {
    let mut store = BodyStore::new(1);
    assert!(matches!(
        store.set_components(0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        Err(NbodyError::InvalidMass { index: 0, .. })
    ));
    assert!(store.set_components(0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, f64::NAN).is_err());
}

#[test]
fn bulk_load_length_mismatch() {
    let mut store = BodyStore::new(2);
    let two = [0.0, 1.0];
    let one = [1.0];
    let err = store.bulk_load(&two, &two, &two, &two, &two, &two, &one).unwrap_err();
    assert!(matches!(err, NbodyError::LengthMismatch { expected: 2, found: 1, .. }));
}

#[test]
fn bulk_load_maps_every_column() {
    let mut store = BodyStore::new(2);
    store
        .bulk_load(&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0], &[0.1, 0.2], &[0.3, 0.4], &[0.5, 0.6], &[7.0, 8.0])
        .unwrap();

    assert_eq!(store.get(0).unwrap(), Body::from_components(1.0, 3.0, 5.0, 0.1, 0.3, 0.5, 7.0));
    assert_eq!(store.get(1).unwrap(), Body::from_components(2.0, 4.0, 6.0, 0.2, 0.4, 0.6, 8.0));
}

#[test]
fn bulk_load_bad_mass_leaves_store_untouched() {
    let mut store = BodyStore::new(2);
    store.set_components(0, 9.0, 9.0, 9.0, 0.0, 0.0, 0.0, 1.0).unwrap();
    let col = [1.0, 2.0];
    assert!(store.bulk_load(&col, &col, &col, &col, &col, &col, &[1.0, -1.0]).is_err());
    assert_eq!(store.get(0).unwrap(), Body::from_components(9.0, 9.0, 9.0, 0.0, 0.0, 0.0, 1.0));
}

// ==================================================================================
// Partitioning
// ==================================================================================

#[test]
fn partition_covers_every_index_once() {
    for n in [0, 1, 2, 7, 10, 64, 101] {
        for threads in 1..=12 {
            let chunks = static_chunks(n, threads).unwrap();
            assert_eq!(chunks.len(), threads);

            let mut seen = vec![0usize; n];
            for r in &chunks {
                for i in r.clone() {
                    seen[i] += 1;
                }
            }
            assert!(seen.iter().all(|&c| c == 1), "n = {n}, threads = {threads}");
        }
    }
}

#[test]
fn partition_rejects_zero_threads() {
    assert!(matches!(static_chunks(10, 0), Err(NbodyError::InvalidThreadCount(0))));
}

// ==================================================================================
// Gravity
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let mut store = two_body_store(1.0, 2.0, 3.0);
    let p = test_params();
    let before = store.momentum();

    SerialKernel::new().step(&mut store, &p);

    // momentum change m1*a1*dt + m2*a2*dt cancels
    let after = store.momentum();
    assert!((after - before).norm() < 1e-15, "net momentum changed: {:?}", after - before);

    let b0 = store.get(0).unwrap();
    let b1 = store.get(1).unwrap();
    assert!(b0.v.x > 0.0 && b1.v.x < 0.0, "bodies are not attracted to each other");
}

#[test]
fn gravity_inverse_square_law() {
    let kernel = SerialKernel::new();
    let p = test_params();

    let acc_r = kernel.accelerations(two_body_store(1.0, 1.0, 1.0).bodies(), &p);
    let acc_2r = kernel.accelerations(two_body_store(2.0, 1.0, 1.0).bodies(), &p);

    let ratio = acc_r[0].norm() / acc_2r[0].norm();
    assert!((ratio - 4.0).abs() < 1e-6, "Expected ~4x, got {}", ratio);
}

#[test]
fn concrete_two_body_step() {
    // m = 1e10 kg one metre apart in SI units
    let mut store = BodyStore::new(2);
    store.set_components(0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1e10).unwrap();
    store.set_components(1, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1e10).unwrap();
    let p = StepParams::new(G_SI, 1e-3).unwrap();

    for kernel in all_kernels(2) {
        let mut s = store.clone();
        kernel.step(&mut s, &p);
        let b0 = s.get(0).unwrap();
        let b1 = s.get(1).unwrap();

        let expected_v = G_SI * 1e10 * 1e-3;
        assert!(rel_close(b0.v.x, expected_v, 1e-6), "{}: v0 = {}", kernel.name(), b0.v.x);
        assert!(rel_close(b1.v.x, -expected_v, 1e-6), "{}: v1 = {}", kernel.name(), b1.v.x);
        assert_eq!(b0.v.x, -b1.v.x);

        // positions move with the updated velocity
        assert!(rel_close(b0.x.x, b0.v.x * 1e-3, 1e-12));
        assert!(rel_close(b1.x.x, 1.0 + b1.v.x * 1e-3, 1e-12));
        assert_eq!(b0.x.y, 0.0);
        assert_eq!(b0.v.z, 0.0);
    }
}

#[test]
fn circular_orbit_keeps_separation() {
    let g: f64 = 1.0;
    let m = 1.0;
    let d = 1.0;
    // each body circles the barycentre at radius d/2
    let v = (g * m * (d / 2.0) / (d * d)).sqrt();

    let mut store = BodyStore::from_bodies(vec![
        Body::from_components(-d / 2.0, 0.0, 0.0, 0.0, -v, 0.0, m),
        Body::from_components(d / 2.0, 0.0, 0.0, 0.0, v, 0.0, m),
    ])
    .unwrap();
    let p = StepParams::new(g, 1e-3).unwrap();
    let kernel = WorkerKernel::new(2).unwrap();

    for step in 0..5000 {
        kernel.step(&mut store, &p);
        let sep = (store.get(1).unwrap().x - store.get(0).unwrap().x).norm();
        assert!((sep - d).abs() < 0.05 * d, "step {step}: separation {sep}");
    }
}

#[test]
fn single_body_drifts_freely() {
    let mut store = BodyStore::new(1);
    store.set_components(0, 1.0, 2.0, 3.0, 0.5, -0.25, 1.0, 4.0).unwrap();
    let p = StepParams::new(1.0, 0.1).unwrap();

    for kernel in all_kernels(4) {
        let mut s = store.clone();
        kernel.step(&mut s, &p);
        let b = s.get(0).unwrap();
        assert_eq!(b.v, NVec3::new(0.5, -0.25, 1.0));
        assert_vec_close(&b.x, &NVec3::new(1.05, 1.975, 3.1), 1e-12);
    }
}

#[test]
fn empty_store_step_is_noop() {
    for kernel in all_kernels(3) {
        let mut store = BodyStore::new(0);
        kernel.step(&mut store, &test_params());
        assert!(store.is_empty());
    }
}

// ==================================================================================
// Cross-kernel equivalence
// ==================================================================================

#[test]
fn kernels_agree() {
    let p = StepParams::new(0.5, 1e-3).unwrap();
    let initial = BodyStore::from_bodies(lattice_bodies(37)).unwrap();

    let mut reference = initial.clone();
    let serial = SerialKernel::new();
    for _ in 0..5 {
        serial.step(&mut reference, &p);
    }

    for threads in [1, 2, 3, 8, 50] {
        for kind in [KernelKind::Threads, KernelKind::Pool] {
            let kernel = kind.build(threads).unwrap();
            let mut s = initial.clone();
            for _ in 0..5 {
                kernel.step(&mut s, &p);
            }
            for (a, b) in s.bodies().iter().zip(reference.bodies()) {
                assert_vec_close(&a.x, &b.x, 1e-9);
                assert_vec_close(&a.v, &b.v, 1e-9);
                assert_eq!(a.m, b.m);
            }
        }
    }
}

#[test]
fn flat_interface_matches_store() {
    let bodies = uniform_bodies(&UniformConfig {
        n: 20,
        seed: 7,
        pos_range: [-5.0, 5.0],
        vel_range: [-1.0, 1.0],
        mass_range: [0.5, 2.0],
    });
    let masses: Vec<f64> = bodies.iter().map(|b| b.m).collect();
    let mut pos: Vec<f64> = bodies.iter().flat_map(|b| [b.x.x, b.x.y, b.x.z]).collect();
    let mut vel: Vec<f64> = bodies.iter().flat_map(|b| [b.v.x, b.v.y, b.v.z]).collect();
    let mut store = BodyStore::from_bodies(bodies).unwrap();
    let p = test_params();

    let kernel = LoopParallelKernel::new(3).unwrap();
    for _ in 0..3 {
        kernel.step(&mut store, &p);
        kernel.step_flat(&masses, &mut pos, &mut vel, &p).unwrap();
    }

    for (i, b) in store.bodies().iter().enumerate() {
        assert_eq!([b.x.x, b.x.y, b.x.z], pos[3 * i..3 * i + 3]);
        assert_eq!([b.v.x, b.v.y, b.v.z], vel[3 * i..3 * i + 3]);
    }
}

#[test]
fn flat_interface_rejects_bad_lengths() {
    let kernel = SerialKernel::new();
    let mut pos = vec![0.0; 6];
    let mut vel = vec![0.0; 5];
    let err = kernel.step_flat(&[1.0, 1.0], &mut pos, &mut vel, &test_params()).unwrap_err();
    assert!(matches!(err, NbodyError::LengthMismatch { .. }));
}

// ==================================================================================
// Benchmark
// ==================================================================================

#[test]
fn timed_steps_accumulate_state() {
    let p = StepParams::new(0.5, 1e-3).unwrap();
    let mut timed = BodyStore::from_bodies(lattice_bodies(9)).unwrap();
    let mut stepped = timed.clone();

    let kernel = LoopParallelKernel::new(3).unwrap();
    let t = seconds_per_step(&kernel, &mut timed, &p, 7).unwrap();
    assert!(t >= 0.0);

    let serial = SerialKernel::new();
    for _ in 0..7 {
        serial.step(&mut stepped, &p);
    }
    assert_eq!(timed.bodies(), stepped.bodies());

    // one step fewer must not match
    let mut short = BodyStore::from_bodies(lattice_bodies(9)).unwrap();
    for _ in 0..6 {
        serial.step(&mut short, &p);
    }
    assert_ne!(timed.bodies(), short.bodies());
}

// ==================================================================================
// I/O and configuration
// ==================================================================================

#[test]
fn bodies_csv_roundtrip() {
    let bodies = uniform_bodies(&UniformConfig {
        n: 12,
        seed: 99,
        pos_range: [-50.0, 50.0],
        vel_range: [-1.0, 1.0],
        mass_range: [0.1, 10.0],
    });
    let path = std::env::temp_dir().join(format!("nbsim-roundtrip-{}.csv", std::process::id()));

    write_bodies_csv(&path, &bodies).unwrap();
    let loaded = read_bodies_csv(&path).unwrap();
    std::fs::remove_file(&path).ok();

    // `{}` formatting of f64 round-trips exactly
    assert_eq!(loaded, bodies);
}

#[test]
fn yaml_scenario_runs() {
    let text = r#"
engine:
  kernel: pool
  threads: 2
parameters:
  G: 1.0
  dt: 0.01
  steps: 20
  record_every: 10
bodies:
  inline:
    - { x: [-0.5, 0.0, 0.0], v: [0.0, -0.5, 0.0], m: 1.0 }
    - { x: [0.5, 0.0, 0.0], v: [0.0, 0.5, 0.0], m: 1.0 }
"#;
    let cfg: ScenarioConfig = serde_yaml::from_str(text).unwrap();
    let mut scenario = nbsim::Scenario::build_scenario(cfg, std::path::Path::new(".")).unwrap();
    assert_eq!(scenario.kernel.name(), "pool");

    let mut w = nbsim::io::trajectory::TrajectoryWriter::new(Vec::new()).unwrap();
    let summary = nbsim::run_scenario(&mut scenario, Some(&mut w)).unwrap();
    assert_eq!(summary.steps, 20);
    assert_eq!(summary.frames, 3);

    let csv = String::from_utf8(w.finish().unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 1 + 3 * 2);
    assert!(scenario.store.momentum().norm() < 1e-12);
}
