use RustedSolve::numerical::solve::Solver;
use RustedSolve::numerical::solve_settings::SolveSettings;
use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use std::hint::black_box;

fn quiet_solver() -> Solver {
    Solver::new(SolveSettings::default().set_loglevel(None)).unwrap()
}

fn bench_quadratic(c: &mut Criterion) {
    let solver = quiet_solver();
    c.bench_function("quadratic with parameters", |b| {
        b.iter(|| solver.solve(black_box("a*x^2+b*x+c=0"), "x"))
    });
}

fn bench_random_cubics(c: &mut Criterion) {
    let solver = quiet_solver();
    let mut rng = rand::rng();
    let inputs: Vec<String> = (0..16)
        .map(|_| {
            let (p, q): (i32, i32) = (rng.random_range(-9..10), rng.random_range(-9..10));
            format!("x^3{:+}*x{:+}", p, q)
        })
        .collect();
    c.bench_function("random cubics", |b| {
        b.iter(|| {
            for input in &inputs {
                let _ = solver.solve(black_box(input), "x");
            }
        })
    });
}

fn bench_transcendental(c: &mut Criterion) {
    let solver = quiet_solver();
    c.bench_function("cos(x)=x", |b| b.iter(|| solver.solve(black_box("cos(x)=x"), "x")));
}

fn bench_nonlinear_system(c: &mut Criterion) {
    let solver = quiet_solver();
    c.bench_function("circle and line", |b| {
        b.iter(|| solver.solve_system(black_box(&["x^2+y^2=10", "x-y=4"]), None))
    });
}

criterion_group!(
    benches,
    bench_quadratic,
    bench_random_cubics,
    bench_transcendental,
    bench_nonlinear_system
);
criterion_main!(benches);
