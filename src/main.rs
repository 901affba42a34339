#![allow(non_snake_case)]
use RustedSolve::Utils::logger::init_logger;
use RustedSolve::numerical::NR::NR;
use RustedSolve::numerical::solve::Solver;
use RustedSolve::numerical::solve_error::SolveError;
use RustedSolve::numerical::solve_settings::SolveSettings;
use RustedSolve::symbolic::symbolic_engine::Expr;
use log::{error, info};

/// settings are read from the TOML file given as the first argument, defaults otherwise
fn load_settings() -> Result<SolveSettings, SolveError> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| SolveError::InvalidSettings(format!("{}: {}", path, e)))?;
            SolveSettings::from_toml_str(&text)
        }
        None => Ok(SolveSettings::default()),
    }
}

fn run(example: usize, settings: SolveSettings) -> Result<(), SolveError> {
    let solver = Solver::new(settings.clone())?;
    match example {
        0 => {
            // SINGLE EQUATIONS
            for (input, var) in [
                ("x^2-5*x+6=0", "x"),
                ("a*x^2+b*x+c=0", "x"),
                ("x^3-2=0", "x"),
                ("sqrt(x+1)=x-1", "x"),
                ("sin(x)=1/2", "x"),
                ("2^x=10", "x"),
                ("log(x)=y", "x"),
            ] {
                let roots = solver.solve(input, var)?;
                let printed: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
                info!("{} for {}: {:?}", input, var, printed);
            }
        }
        1 => {
            // LINEAR SYSTEMS: with and without parameters
            let solution = solver.solve_system(&["x+y=3", "x-y=1"], None)?;
            info!("x = {:?}, y = {:?}", solution.get("x"), solution.get("y"));
            let solution = solver.solve_system(&["a*x+y=b", "x-y=0"], Some(&["x", "y"]))?;
            info!("with parameters a, b: {:?}", solution);
        }
        2 => {
            // NONLINEAR SYSTEMS
            let solution = solver.solve_system(&["x^2+y^2=10", "x-y=4"], None)?;
            info!("circle and line: {:?}", solution);
            let eq_system = Expr::parse_vector_expression(vec!["x*y-6", "x-y+1"])?;
            let mut NR_instance = NR::with_settings(&settings);
            NR_instance.set_equation_system(eq_system, None);
            let result = NR_instance.solve()?;
            info!("result = {:?} after {} restarts", result, NR_instance.restarts);
        }
        _ => info!("no example number {}", example),
    }
    Ok(())
}

fn main() {
    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    match settings.level_filter() {
        Ok(level) => {
            init_logger(level, false);
        }
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    }
    for example in 0..3 {
        if let Err(e) = run(example, settings.clone()) {
            error!("example {} failed: {}", example, e);
        }
    }
}
