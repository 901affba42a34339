//! Equation solving: the equation model, closed-form formulas, numeric root finding, linear and
//! nonlinear systems, and the dispatcher choosing between them.
///  Example#1
/// ```
/// use RustedSolve::numerical::solve::Solver;
/// use RustedSolve::numerical::solve_settings::SolveSettings;
/// let solver = Solver::new(SolveSettings::default().set_loglevel(None)).unwrap();
/// // a polynomial with parameters is solved in closed form
/// let roots = solver.solve("a*x^2-b=0", "x").unwrap();
/// assert_eq!(roots.len(), 2);
/// // transcendental equations fall back to Newton's method on a grid of seeds
/// let roots = solver.solve("cos(x)=x", "x").unwrap();
/// assert_eq!(roots.len(), 1);
///  ```
/// Example#2
/// ```
/// use RustedSolve::numerical::NR::NR;
/// use RustedSolve::numerical::solve_settings::SolveSettings;
/// use RustedSolve::symbolic::symbolic_engine::Expr;
/// // nonlinear systems can be handed to Newton-Raphson directly
/// let eq_system = Expr::parse_vector_expression(vec!["x^2+y^2-10", "x-y-4"]).unwrap();
/// let mut NR_instance = NR::with_settings(&SolveSettings::default().set_loglevel(None));
/// NR_instance.set_equation_system(eq_system, None);
/// let result = NR_instance.solve().unwrap();
/// assert_eq!(result.len(), 2);
/// ```
/// errors shared by the whole crate
pub mod solve_error;
/// solver configuration
pub mod solve_settings;
/// equation model: two sides normalized to one expression equal to zero
pub mod equation;
/// isolation of the unknown by inverse operations
pub mod rewrite;
/// closed-form roots of polynomials up to the fourth degree and of a*x^n + b
pub mod closed_form;
/// Newton's method from a grid of seeds for equations in one variable
pub mod root_finder;
/// exact solution of linear systems
pub mod linear_system;
/// Newton-Raphson for nonlinear systems
pub mod NR;
/// the solver front end
pub mod solve;
mod solve_tests;
