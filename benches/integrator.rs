//! Integrator and simulation loop benchmarks
//!
//! - Cost of one frame step at several tolerances - Lower time is better
//! - Cost of a full frame including the trace pass - Lower time is better
//! - Dense output construction and lookup - Lower time is better

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use double_pendulum::physics::dynamics::{DoublePendulum, PendulumState};
use double_pendulum::physics::integrators::DormandPrince;
use double_pendulum::physics::parameters::PendulumParameters;
use double_pendulum::physics::simulation::SimulationContext;

fn bench_frame_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_step");
    let system = DoublePendulum::new(PendulumParameters::default());
    let initial = PendulumState::INITIAL.to_array();

    for tolerance in [1e-6, 1e-8, 1e-10] {
        let solver = DormandPrince::new(tolerance);
        group.bench_function(BenchmarkId::new("tolerance", tolerance), |b| {
            b.iter(|| solver.integrate(black_box(&system), 0.0, 0.5, black_box(initial)))
        });
    }

    group.finish();
}

fn bench_simulation_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");

    group.bench_function("advance_frame_full_trace", |b| {
        let mut context = SimulationContext::default();
        for _ in 0..2000 {
            context.advance_frame();
        }
        b.iter(|| black_box(context.advance_frame()))
    });

    group.bench_function("step_only", |b| {
        let mut context = SimulationContext::default();
        b.iter(|| black_box(context.step()))
    });

    group.finish();
}

fn bench_dense_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_output");
    let system = DoublePendulum::new(PendulumParameters::default());
    let solver = DormandPrince::default();
    let initial = PendulumState::INITIAL.to_array();

    group.bench_function("solve_10s", |b| {
        b.iter(|| solver.solve(black_box(&system), 0.0, 10.0, black_box(initial)))
    });

    let trajectory = solver.solve(&system, 0.0, 10.0, initial);
    group.bench_function("at", |b| b.iter(|| trajectory.at(black_box(7.3))));

    group.finish();
}

criterion_group!(steps, bench_frame_step, bench_simulation_frames);
criterion_group!(dense, bench_dense_output);
criterion_main!(steps, dense);
