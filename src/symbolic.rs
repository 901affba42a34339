#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedSolve::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2*log(x+y)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1(&["x", "y"]).unwrap();
/// println!("Rust function: {}", parsed_function(&[1.0, 2.0]));
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the canonical expression type
/// 2) answers questions about it: variables, functions, powers
/// 3) substitutes values and prints expressions in a form the parser reads back
///# Example#
/// ```
/// use RustedSolve::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x^2+2*x*y").unwrap();
/// assert_eq!(f.variables(), vec!["x".to_string(), "y".to_string()]);
/// let g = f.substitute("y", &Expr::c(3));
/// assert_eq!(g.to_string(), "x^2+6*x");
/// // differentiate with respect to x
/// let df_dx = g.diff("x");
/// assert_eq!(df_dx.to_string(), "2*x+6");
/// // convert symbolic expression to a Rust function and evaluate the function
/// let df = df_dx.lambdify1D("x").unwrap();
/// assert_eq!(df(1.0), 8.0);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// canonical sums, products, powers and expansion
pub mod symbolic_simplify;
/// compile expressions into closures, evaluate with complex numbers
pub mod symbolic_lambdify;
/// coefficients, factoring and numeric roots of polynomials
pub mod symbolic_polynomial;
///________________________________________________________________________________________________________________________________________________
///
/// calculate symbolic jacobian and evaluate it
pub mod symbolic_functions;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions mainly for bracket parsing and exact rational numbers
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
mod symbolic_engine_tests;
