//! Dense matrices of symbolic expressions.
//!
//! Determinant and inverse are exact: matrices of rational constants go through
//! Gauss-Jordan elimination over the rationals, matrices with symbolic entries use cofactor
//! expansion and the adjugate.
use crate::numerical::solve_error::SolveError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::Rational;
use num::{One, Zero};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct SymMatrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<Expr>>,
}

impl SymMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        SymMatrix {
            rows,
            cols,
            data: vec![vec![Expr::c(0); cols]; rows],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = SymMatrix::zeros(n, n);
        for i in 0..n {
            m.data[i][i] = Expr::c(1);
        }
        m
    }

    pub fn from_rows(data: Vec<Vec<Expr>>) -> Result<Self, SolveError> {
        let rows = data.len();
        let cols = data.first().map_or(0, |r| r.len());
        if data.iter().any(|r| r.len() != cols) {
            return Err(SolveError::SingularSystem(
                "rows of different length".to_string(),
            ));
        }
        Ok(SymMatrix { rows, cols, data })
    }

    /// column vector
    pub fn column(values: Vec<Expr>) -> Self {
        let rows = values.len();
        SymMatrix {
            rows,
            cols: 1,
            data: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    pub fn get(&self, i: usize, j: usize) -> &Expr {
        &self.data[i][j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: Expr) {
        self.data[i][j] = value;
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    fn as_rational(&self) -> Option<Vec<Vec<Rational>>> {
        self.data
            .iter()
            .map(|row| row.iter().map(|e| e.as_const().cloned()).collect())
            .collect()
    }

    pub fn multiply(&self, other: &SymMatrix) -> Result<SymMatrix, SolveError> {
        if self.cols != other.rows {
            return Err(SolveError::SingularSystem(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = SymMatrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let terms = (0..self.cols)
                    .map(|k| self.data[i][k].times(&other.data[k][j]))
                    .collect();
                out.data[i][j] = Expr::sum_from_terms(terms).expand();
            }
        }
        Ok(out)
    }

    fn minor(&self, row: usize, col: usize) -> SymMatrix {
        let data = self
            .data
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != row)
            .map(|(_, r)| {
                r.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != col)
                    .map(|(_, e)| e.clone())
                    .collect()
            })
            .collect();
        SymMatrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            data,
        }
    }

    fn cofactor_det(&self) -> Expr {
        match self.rows {
            0 => Expr::c(1),
            1 => self.data[0][0].clone(),
            2 => self.data[0][0]
                .times(&self.data[1][1])
                .minus(&self.data[0][1].times(&self.data[1][0]))
                .expand(),
            n => {
                let mut terms = Vec::with_capacity(n);
                for j in 0..n {
                    if self.data[0][j].is_zero() {
                        continue;
                    }
                    let sign = if j % 2 == 0 { Expr::c(1) } else { Expr::c(-1) };
                    terms.push(
                        sign.times(&self.data[0][j])
                            .times(&self.minor(0, j).cofactor_det()),
                    );
                }
                Expr::sum_from_terms(terms).expand()
            }
        }
    }

    /// exact determinant
    pub fn det(&self) -> Result<Expr, SolveError> {
        if !self.is_square() {
            return Err(SolveError::SingularSystem(
                "determinant of a non-square matrix".to_string(),
            ));
        }
        Ok(match self.as_rational() {
            Some(m) => Expr::Const(rational_det(m)),
            None => self.cofactor_det(),
        })
    }

    /// exact inverse; a zero determinant is a singular system
    pub fn inverse(&self) -> Result<SymMatrix, SolveError> {
        if !self.is_square() {
            return Err(SolveError::SingularSystem(
                "inverse of a non-square matrix".to_string(),
            ));
        }
        if let Some(m) = self.as_rational() {
            let inv = rational_inverse(m).ok_or_else(singular)?;
            return Ok(SymMatrix {
                rows: self.rows,
                cols: self.cols,
                data: inv
                    .into_iter()
                    .map(|r| r.into_iter().map(Expr::Const).collect())
                    .collect(),
            });
        }
        let det = self.cofactor_det();
        if det.is_zero() {
            return Err(singular());
        }
        let n = self.rows;
        let mut out = SymMatrix::zeros(n, n);
        if n == 1 {
            out.data[0][0] = Expr::c(1).divide(&det);
            return Ok(out);
        }
        for i in 0..n {
            for j in 0..n {
                // adjugate is the transposed cofactor matrix
                let cofactor = self.minor(j, i).cofactor_det();
                let sign = if (i + j) % 2 == 0 { Expr::c(1) } else { Expr::c(-1) };
                out.data[i][j] = sign.times(&cofactor).divide(&det);
            }
        }
        Ok(out)
    }
}

fn singular() -> SolveError {
    SolveError::SingularSystem("System does not have a distinct solution".to_string())
}

fn rational_det(mut m: Vec<Vec<Rational>>) -> Rational {
    let n = m.len();
    let mut det = Rational::one();
    for col in 0..n {
        let Some(pivot) = (col..n).find(|&r| !m[r][col].is_zero()) else {
            return Rational::zero();
        };
        if pivot != col {
            m.swap(pivot, col);
            det = -det;
        }
        let p = m[col][col].clone();
        det *= &p;
        for r in col + 1..n {
            let factor = &m[r][col] / &p;
            if factor.is_zero() {
                continue;
            }
            for c in col..n {
                let delta = &factor * &m[col][c];
                m[r][c] -= delta;
            }
        }
    }
    det
}

fn rational_inverse(mut m: Vec<Vec<Rational>>) -> Option<Vec<Vec<Rational>>> {
    let n = m.len();
    let mut inv: Vec<Vec<Rational>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { Rational::one() } else { Rational::zero() })
                .collect()
        })
        .collect();
    for col in 0..n {
        let pivot = (col..n).find(|&r| !m[r][col].is_zero())?;
        m.swap(pivot, col);
        inv.swap(pivot, col);
        let p = m[col][col].clone();
        for c in 0..n {
            m[col][c] /= &p;
            inv[col][c] /= &p;
        }
        for r in 0..n {
            if r == col || m[r][col].is_zero() {
                continue;
            }
            let factor = m[r][col].clone();
            for c in 0..n {
                let dm = &factor * &m[col][c];
                m[r][c] -= dm;
                let di = &factor * &inv[col][c];
                inv[r][c] -= di;
            }
        }
    }
    Some(inv)
}

impl fmt::Display for SymMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.data {
            let line = row.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ");
            writeln!(f, "[{}]", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<&str>>) -> SymMatrix {
        SymMatrix::from_rows(
            rows.into_iter()
                .map(|r| {
                    r.into_iter()
                        .map(|s| Expr::parse_expression(s).unwrap())
                        .collect()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_rational_det_and_inverse() {
        let a = m(vec![vec!["1", "1"], vec!["1", "-1"]]);
        assert_eq!(a.det().unwrap(), Expr::c(-2));
        let inv = a.inverse().unwrap();
        assert_eq!(inv.multiply(&a).unwrap(), SymMatrix::identity(2));
        let b = m(vec![vec!["2", "0", "1"], vec!["1", "3", "2"], vec!["1", "1", "2"]]);
        assert_eq!(b.det().unwrap(), Expr::c(6));
        assert_eq!(b.inverse().unwrap().multiply(&b).unwrap(), SymMatrix::identity(3));
    }

    #[test]
    fn test_singular() {
        let a = m(vec![vec!["1", "1"], vec!["2", "2"]]);
        assert_eq!(a.det().unwrap(), Expr::c(0));
        assert!(matches!(a.inverse(), Err(SolveError::SingularSystem(_))));
    }

    #[test]
    fn test_symbolic_inverse() {
        let a = m(vec![vec!["a", "1"], vec!["0", "b"]]);
        assert_eq!(a.det().unwrap(), Expr::parse_expression("a*b").unwrap());
        let inv = a.inverse().unwrap();
        assert_eq!(inv.get(0, 0), &Expr::parse_expression("a^(-1)").unwrap());
        assert_eq!(inv.get(0, 1), &Expr::parse_expression("-1/(a*b)").unwrap());
        assert_eq!(inv.get(1, 1), &Expr::parse_expression("1/b").unwrap());
        assert!(inv.get(1, 0).is_zero());
    }
}
