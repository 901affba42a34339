//! Systems of linear equations solved exactly through the inverse of the coefficient matrix.
use crate::numerical::solve_error::SolveError;
use crate::somelinalg::symbolic_matrix::SymMatrix;
use crate::symbolic::symbolic_engine::Expr;
use std::collections::BTreeMap;

/// values of the unknowns of a system, in the shape chosen by `solutions_as_object`
#[derive(Clone, Debug, PartialEq)]
pub enum SystemSolution {
    Pairs(Vec<(String, Expr)>),
    Map(BTreeMap<String, Expr>),
}

impl SystemSolution {
    pub fn new(vars: &[String], values: Vec<Expr>, as_object: bool) -> SystemSolution {
        let pairs = vars.iter().cloned().zip(values);
        if as_object {
            SystemSolution::Map(pairs.collect())
        } else {
            SystemSolution::Pairs(pairs.collect())
        }
    }

    pub fn empty(as_object: bool) -> SystemSolution {
        SystemSolution::new(&[], Vec::new(), as_object)
    }

    pub fn get(&self, var: &str) -> Option<&Expr> {
        match self {
            SystemSolution::Pairs(pairs) => pairs.iter().find(|(v, _)| v == var).map(|(_, e)| e),
            SystemSolution::Map(map) => map.get(var),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SystemSolution::Pairs(pairs) => pairs.is_empty(),
            SystemSolution::Map(map) => map.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SystemSolution::Pairs(pairs) => pairs.len(),
            SystemSolution::Map(map) => map.len(),
        }
    }
}

/// sorted union of the variables of all equations
pub fn system_variables(equations: &[Expr]) -> Vec<String> {
    let mut vars: Vec<String> = equations.iter().flat_map(|e| e.variables()).collect();
    vars.sort();
    vars.dedup();
    vars
}

/// every equation is of first degree in each variable and no term mixes two of them
pub fn all_linear(equations: &[Expr], vars: &[String]) -> bool {
    equations.iter().all(|eq| {
        let expanded = eq.expand();
        let no_mixed_terms = expanded
            .terms()
            .iter()
            .all(|t| vars.iter().filter(|v| t.contains_var(v)).count() <= 1);
        no_mixed_terms
            && vars.iter().all(|v| match expanded.coeffs(v) {
                Ok(c) => c.len() <= 2 && c.iter().all(|k| !k.contains_var(v)),
                Err(_) => false,
            })
    })
}

fn solve_matrix(m: &SymMatrix, c: &SymMatrix) -> Result<Vec<Expr>, SolveError> {
    if m.det()?.is_zero() {
        return Err(SolveError::SingularSystem(
            "System does not have a distinct solution".to_string(),
        ));
    }
    let result = m.inverse()?.multiply(c)?;
    Ok(result.data.into_iter().map(|row| row[0].expand()).collect())
}

/// linear system in the union of its variables: entry (i, j) collects the coefficients of
/// variable j in equation i, the constant vector holds the negated remainders
pub fn solve_linear_default(equations: &[Expr], vars: &[String]) -> Result<Vec<Expr>, SolveError> {
    let n = equations.len();
    if vars.len() != n {
        return Err(SolveError::SingularSystem(format!(
            "{} equations in {} unknowns",
            n,
            vars.len()
        )));
    }
    let mut m = SymMatrix::zeros(n, n);
    let mut constants = Vec::with_capacity(n);
    for (i, eq) in equations.iter().enumerate() {
        let expanded = eq.expand();
        for (j, v) in vars.iter().enumerate() {
            let coefficient = Expr::sum_from_terms(
                expanded
                    .terms()
                    .iter()
                    .filter(|t| t.contains_var(v))
                    .map(|t| t.divide(&Expr::var(v)))
                    .collect(),
            );
            m.set(i, j, coefficient);
        }
        let remainder = Expr::sum_from_terms(
            expanded
                .terms()
                .into_iter()
                .filter(|t| vars.iter().all(|v| !t.contains_var(v)))
                .collect(),
        );
        constants.push(remainder.negate());
    }
    solve_matrix(&m, &SymMatrix::column(constants))
}

/// linear system in the listed variables; anything else in the equations is a parameter.
/// The constant vector keeps the sign of the remainders, so the product is negated at the end.
pub fn solve_linear_explicit(equations: &[Expr], vars: &[String]) -> Result<Vec<Expr>, SolveError> {
    let n = equations.len();
    if vars.len() != n {
        return Err(SolveError::SingularSystem(format!(
            "{} equations in {} unknowns",
            n,
            vars.len()
        )));
    }
    let mut m = SymMatrix::zeros(n, n);
    let mut constants = Vec::with_capacity(n);
    for (i, eq) in equations.iter().enumerate() {
        let mut row = vec![Vec::new(); n];
        let mut rest = Vec::new();
        for term in eq.expand().terms() {
            let found: Vec<usize> = (0..n).filter(|&j| term.contains_var(&vars[j])).collect();
            match found.as_slice() {
                [] => rest.push(term),
                [j] => {
                    let v = &vars[*j];
                    let coefficient = term.divide(&Expr::var(v));
                    if coefficient.contains_var(v) {
                        return Err(SolveError::NonLinearTerm(term.to_string()));
                    }
                    row[*j].push(coefficient);
                }
                _ => return Err(SolveError::NonLinearTerm(term.to_string())),
            }
        }
        for (j, parts) in row.into_iter().enumerate() {
            m.set(i, j, Expr::sum_from_terms(parts));
        }
        constants.push(Expr::sum_from_terms(rest));
    }
    let values = solve_matrix(&m, &SymMatrix::column(constants))?;
    Ok(values.into_iter().map(|v| v.negate().expand()).collect())
}
