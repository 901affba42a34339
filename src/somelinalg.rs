//! some linear algebra functions used throughout the code
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// dense matrices of symbolic expressions: determinant, inverse, products
pub mod symbolic_matrix;
