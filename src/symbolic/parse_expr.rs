use crate::numerical::solve_error::SolveError;
use crate::symbolic::symbolic_engine::{Expr, FuncName};
use crate::symbolic::utils::{brackets_balanced, parse_decimal, wrapped_in_brackets};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedSolve::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("2x^2+3*x-sin(x)/4").unwrap();
/// assert_eq!(parsed_expression.to_string(), "2*x^2+3*x-1/4*sin(x)");
/// ```
//                  search recursion diagram
//                "y^2+exp(x)+log(x)/y-x^2.3"       |
//                |       left  | right             |
//                |_________________________________|
//                |   split at rightmost + or -     |
//                |_________________________________|
//                | y^2+exp(x)+log(x)/y | x^2.3     |
//                |       |             |    |      |
//                |______\|/____________|___\|/_____|
//                | split at rightmost  | split at  |
//                |     * or /          |  first ^  |
//                |_____________________|___________|
//                  etc...
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("number pattern is valid")
});
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));
// 2x -> 2*x, 3(x+1) -> 3*(x+1); the digits must not be the tail of an identifier and `e`/`E`
// directly after digits is left for scientific notation
static IMPLICIT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^A-Za-z0-9_.])(\d+\.?\d*)\s*([A-DF-Za-df-z_(])")
        .expect("implicit multiplication pattern is valid")
});
// 2e -> 2*e, 2exp(x) -> 2*exp(x): `e` after digits that is not an exponent
static IMPLICIT_EULER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^A-Za-z0-9_.])(\d+\.?\d*)([eE])($|[^0-9+\-])")
        .expect("implicit euler pattern is valid")
});
// (x+1)(x-1) -> (x+1)*(x-1), (x+1)x -> (x+1)*x
static IMPLICIT_BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\)\s*([A-Za-z0-9_(])").expect("implicit bracket pattern is valid")
});

/// inserts the `*` that people leave out when writing `2x` or `(x+1)(x-1)`
pub fn insert_implicit_multiplication(input: &str) -> String {
    let mut s = input.to_string();
    // replacements can overlap ("2x3y"), so run until nothing changes
    loop {
        let next = IMPLICIT_EULER.replace_all(&s, "$1$2*$3$4").to_string();
        let next = IMPLICIT_NUMBER.replace_all(&next, "$1$2*$3").to_string();
        let next = IMPLICIT_BRACKET.replace_all(&next, ")*$1").to_string();
        if next == s {
            return s;
        }
        s = next;
    }
}

// sign belongs to an exponent of a literal like 1.5e-3
fn is_exponent_sign(bytes: &[u8], i: usize) -> bool {
    if i < 2 || !(bytes[i - 1] == b'e' || bytes[i - 1] == b'E') {
        return false;
    }
    let mut j = i - 1;
    let mut saw_digit = false;
    while j > 0 {
        let c = bytes[j - 1];
        if c.is_ascii_digit() {
            saw_digit = true;
        } else if c != b'.' {
            return saw_digit && !(c.is_ascii_alphabetic() || c == b'_');
        }
        j -= 1;
    }
    saw_digit
}

// a minus/plus at i is unary when nothing operand-like precedes it
fn is_unary(bytes: &[u8], i: usize) -> bool {
    let mut j = i;
    while j > 0 {
        let c = bytes[j - 1];
        if c == b' ' {
            j -= 1;
            continue;
        }
        return matches!(c, b'+' | b'-' | b'*' | b'/' | b'^' | b'(' | b',');
    }
    true
}

// function to find the rightmost occurrence of operators at the same precedence level,
fn find_rightmost_operator_outside_brackets(
    input: &str,
    operators: &[u8],
    skip_unary: bool,
) -> Option<(usize, u8)> {
    let bytes = input.as_bytes();
    let mut bracket_depth = 0;
    let mut last_op = None;
    for (i, &c) in bytes.iter().enumerate() {
        match c {
            b'(' => bracket_depth += 1,
            b')' => bracket_depth -= 1,
            _ if bracket_depth == 0 && operators.contains(&c) => {
                if skip_unary && (is_unary(bytes, i) || is_exponent_sign(bytes, i)) {
                    continue;
                }
                last_op = Some((i, c));
            }
            _ => {}
        }
    }
    last_op
}

fn find_first_operator_outside_brackets(input: &str, op: u8) -> Option<usize> {
    let mut bracket_depth = 0;
    for (i, &c) in input.as_bytes().iter().enumerate() {
        match c {
            b'(' => bracket_depth += 1,
            b')' => bracket_depth -= 1,
            _ if bracket_depth == 0 && c == op => return Some(i),
            _ => {}
        }
    }
    None
}

fn split_arguments(input: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                out.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&input[start..]);
    out
}

fn parse_function(name: &str, arguments: &str, original: &str) -> Result<Expr, SolveError> {
    let args = split_arguments(arguments)
        .into_iter()
        .map(|a| parse_expression_func(a, original))
        .collect::<Result<Vec<Expr>, SolveError>>()?;
    if args.len() != 1 {
        return Err(SolveError::parse(
            original,
            format!("function {} takes one argument, got {}", name, args.len()),
        ));
    }
    let arg = args.into_iter().next().unwrap_or_else(|| Expr::c(0));
    if name == "exp" {
        return Ok(Expr::exp_of(&arg));
    }
    match FuncName::from_str(name) {
        Ok(FuncName::sqrt) => Ok(Expr::sqrt_of(&arg)),
        Ok(func) => Ok(Expr::func(func, arg)),
        Err(_) => Err(SolveError::parse(
            original,
            format!("unknown function {}", name),
        )),
    }
}

/// recursive descent over the string: + - first, then * /, unary signs, ^ (right
/// associative), then function calls, numbers and names
pub fn parse_expression_func(input: &str, original: &str) -> Result<Expr, SolveError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SolveError::parse(original, "empty operand"));
    }
    if wrapped_in_brackets(input) {
        return parse_expression_func(&input[1..input.len() - 1], original);
    }
    // Handling addition and subtraction
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, b"+-", true) {
        let left = parse_expression_func(&input[..pos], original)?;
        let right = parse_expression_func(&input[pos + 1..], original)?;
        return Ok(if op == b'+' {
            left.plus(&right)
        } else {
            left.minus(&right)
        });
    }
    // Handling multiplication and division
    if let Some((pos, op)) = find_rightmost_operator_outside_brackets(input, b"*/", false) {
        let left = parse_expression_func(&input[..pos], original)?;
        let right = parse_expression_func(&input[pos + 1..], original)?;
        return Ok(if op == b'*' {
            left.times(&right)
        } else {
            left.divide(&right)
        });
    }
    // unary signs
    if let Some(rest) = input.strip_prefix('-') {
        return Ok(parse_expression_func(rest, original)?.negate());
    }
    if let Some(rest) = input.strip_prefix('+') {
        return parse_expression_func(rest, original);
    }
    // power, right associative: split at the first ^
    if let Some(pos) = find_first_operator_outside_brackets(input, b'^') {
        let base = parse_expression_func(&input[..pos], original)?;
        let exponent = parse_expression_func(&input[pos + 1..], original)?;
        return Ok(base.pow_expr(&exponent));
    }
    // function call: name(...)
    if let Some(open) = input.find('(') {
        let name = input[..open].trim();
        if input.ends_with(')') && IDENTIFIER.is_match(name) {
            return parse_function(name, &input[open + 1..input.len() - 1], original);
        }
        return Err(SolveError::parse(original, format!("cannot parse '{}'", input)));
    }
    if NUMBER.is_match(input) {
        return parse_decimal(input)
            .map(Expr::Const)
            .ok_or_else(|| SolveError::parse(original, format!("bad number '{}'", input)));
    }
    if IDENTIFIER.is_match(input) {
        return Ok(Expr::var(input));
    }
    Err(SolveError::parse(original, format!("unexpected token '{}'", input)))
}

impl Expr {
    /// parses a string into a canonical expression
    pub fn parse_expression(input: &str) -> Result<Expr, SolveError> {
        if !input.is_ascii() {
            return Err(SolveError::parse(input, "only ASCII input is supported"));
        }
        if !brackets_balanced(input) {
            return Err(SolveError::parse(input, "unbalanced brackets"));
        }
        let prepared = insert_implicit_multiplication(input);
        parse_expression_func(&prepared, input)
    }

    pub fn parse_vector_expression(inputs: Vec<&str>) -> Result<Vec<Expr>, SolveError> {
        inputs.into_iter().map(Expr::parse_expression).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(p("1+2*3").to_string(), "7");
        assert_eq!(p("2^3^2").to_string(), "512");
        assert_eq!(p("-2^2").to_string(), "-4");
        assert_eq!(p("8/4/2").to_string(), "1");
        assert_eq!(p("x-y-z").to_string(), p("x-(y+z)").to_string());
    }

    #[test]
    fn test_unary_and_scientific() {
        assert_eq!(p("2*-3"), Expr::c(-6));
        assert_eq!(p("1.5e-3"), Expr::frac(3, 2000));
        assert_eq!(p("x^-1"), Expr::var("x").powi(-1));
        assert_eq!(p("2e-3+x").to_string(), "x+1/500");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(insert_implicit_multiplication("2x"), "2*x");
        assert_eq!(insert_implicit_multiplication("3(x+1)"), "3*(x+1)");
        assert_eq!(insert_implicit_multiplication("(x+1)(x-1)"), "(x+1)*(x-1)");
        assert_eq!(insert_implicit_multiplication("x2+y"), "x2+y");
        assert_eq!(insert_implicit_multiplication("1e-3"), "1e-3");
        assert_eq!(insert_implicit_multiplication("2exp(x)"), "2*exp(x)");
        assert_eq!(p("2x+3x"), Expr::var("x").scale(&crate::symbolic::utils::rat_int(5)));
    }

    #[test]
    fn test_functions() {
        assert_eq!(p("ln(x)"), p("log(x)"));
        assert_eq!(p("tg(x)").to_string(), "tan(x)");
        assert_eq!(p("sqrt(9)"), Expr::c(3));
        assert_eq!(p("exp(x)").to_string(), "e^(x)");
        assert_eq!(p("log(e)"), Expr::c(1));
        assert!(Expr::parse_expression("foo(x)").is_err());
    }

    #[test]
    fn test_errors() {
        assert!(Expr::parse_expression("(x+1").is_err());
        assert!(Expr::parse_expression("x+").is_err());
        assert!(Expr::parse_expression("x $ y").is_err());
    }

    #[test]
    fn test_display_reparses() {
        for s in ["x^2+2*x+1", "3/2*x-sin(x)^2", "(x+1)^(-1)*y", "e^(x+1)-2^(1/2)", "x^(1/3)"] {
            let e = p(s);
            assert_eq!(p(&e.to_string()), e, "{}", s);
        }
    }
}
