#![allow(non_camel_case_types)]

use crate::numerical::solve_error::SolveError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::LambdaFn;
use nalgebra::{DMatrix, DVector};
///
/// calculate symbolic jacobian and evaluate it
/// Example#
/// ```
/// use RustedSolve::symbolic::symbolic_functions::Jacobian;
/// let mut Jacobian_instance = Jacobian::new();
/// // set vector of functions
/// Jacobian_instance
///     .set_funcvecor_from_str(vec!["2*x^3+y", "x-y"])
///     .unwrap();
/// // set vector of variables
/// Jacobian_instance.set_variables(vec!["x", "y"]);
/// // calculate symbolic jacobian
/// Jacobian_instance.calc_jacobian();
/// // generate jacobian and function vector made of regular rust functions
/// Jacobian_instance.jacobian_generate().unwrap();
/// Jacobian_instance.lambdify_funcvector().unwrap();
/// let jac = Jacobian_instance.evaluate_func_jacobian_DMatrix(&[1.0, 2.0]);
/// assert_eq!(jac[(0, 0)], 6.0);
/// let f = Jacobian_instance.evaluate_funvector_lambdified_DVector(&[1.0, 2.0]);
/// assert_eq!(f[1], -1.0);
/// ```
pub struct Jacobian {
    pub vector_of_functions: Vec<Expr>, // vector of symbolic functions/expressions
    pub variable_string: Vec<String>,   // names of the unknowns, column order of the jacobian
    pub symbolic_jacobian: Vec<Vec<Expr>>, // symbolic partial derivatives
    pub lambdified_functions: Vec<LambdaFn>, // symbolic functions converted to rust functions
    pub function_jacobian: Vec<Vec<LambdaFn>>, // partial derivatives converted to rust functions
}

impl Default for Jacobian {
    fn default() -> Self {
        Self::new()
    }
}

impl Jacobian {
    pub fn new() -> Self {
        Self {
            vector_of_functions: Vec::new(),
            variable_string: Vec::new(),
            symbolic_jacobian: Vec::new(),
            lambdified_functions: Vec::new(),
            function_jacobian: Vec::new(),
        }
    }

    pub fn from_vectors(vector_of_functions: Vec<Expr>, variables: Vec<String>) -> Self {
        let mut jac = Self::new();
        jac.vector_of_functions = vector_of_functions;
        jac.variable_string = variables;
        jac
    }

    pub fn set_funcvecor_from_str(&mut self, value: Vec<&str>) -> Result<(), SolveError> {
        self.vector_of_functions = Expr::parse_vector_expression(value)?;
        Ok(())
    }

    pub fn set_variables(&mut self, varvec: Vec<&str>) {
        self.variable_string = varvec.iter().map(|s| s.to_string()).collect();
    }

    /// calculate the symbolic jacobian
    pub fn calc_jacobian(&mut self) {
        self.symbolic_jacobian = self
            .vector_of_functions
            .iter()
            .map(|func| {
                self.variable_string
                    .iter()
                    .map(|var| func.diff(var))
                    .collect()
            })
            .collect();
    }

    /// turn jacobian into readable format
    pub fn readable_jacobian(&self) -> Vec<Vec<String>> {
        self.symbolic_jacobian
            .iter()
            .map(|row| row.iter().map(|e| e.to_string()).collect())
            .collect()
    }

    fn vars(&self) -> Vec<&str> {
        self.variable_string.iter().map(|s| s.as_str()).collect()
    }

    /// creating function jacobian a matrix of functions with partial derivatives
    pub fn jacobian_generate(&mut self) -> Result<(), SolveError> {
        let vars = self.vars();
        let compiled = self
            .symbolic_jacobian
            .iter()
            .map(|row| {
                row.iter()
                    .map(|element| element.lambdify_borrowed_thread_safe(&vars))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.function_jacobian = compiled;
        Ok(())
    }

    pub fn lambdify_funcvector(&mut self) -> Result<(), SolveError> {
        let vars = self.vars();
        let compiled = self
            .vector_of_functions
            .iter()
            .map(|func| func.lambdify_borrowed_thread_safe(&vars))
            .collect::<Result<Vec<_>, _>>()?;
        self.lambdified_functions = compiled;
        Ok(())
    }

    // evaluate jacobian to nalgebra DMatrix
    pub fn evaluate_func_jacobian_DMatrix(&self, x: &[f64]) -> DMatrix<f64> {
        let rows = self.function_jacobian.len();
        let cols = self.variable_string.len();
        DMatrix::from_fn(rows, cols, |i, j| self.function_jacobian[i][j](x))
    }

    pub fn evaluate_funvector_lambdified_DVector(&self, x: &[f64]) -> DVector<f64> {
        DVector::from_iterator(
            self.lambdified_functions.len(),
            self.lambdified_functions.iter().map(|f| f(x)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_jacobian() {
        let mut jac = Jacobian::new();
        jac.set_funcvecor_from_str(vec!["x^2+y^2-1", "x*y"]).unwrap();
        jac.set_variables(vec!["x", "y"]);
        jac.calc_jacobian();
        assert_eq!(
            jac.readable_jacobian(),
            vec![
                vec!["2*x".to_string(), "2*y".to_string()],
                vec!["y".to_string(), "x".to_string()]
            ]
        );
    }

    #[test]
    fn test_evaluated_jacobian() {
        let mut jac = Jacobian::from_vectors(
            Expr::parse_vector_expression(vec!["x^2+y^2-1", "x-y"]).unwrap(),
            vec!["x".to_string(), "y".to_string()],
        );
        jac.calc_jacobian();
        jac.jacobian_generate().unwrap();
        jac.lambdify_funcvector().unwrap();
        let m = jac.evaluate_func_jacobian_DMatrix(&[0.5, 2.0]);
        assert_eq!(m, DMatrix::from_row_slice(2, 2, &[1.0, 4.0, 1.0, -1.0]));
        let f = jac.evaluate_funvector_lambdified_DVector(&[0.5, 2.0]);
        assert_eq!(f, DVector::from_vec(vec![3.25, -1.5]));
    }
}
