// the collection of utility functions: bracket parsing, exact rational helpers, rounding
use num::{BigInt, BigRational, Integer, One, Signed, ToPrimitive, Zero};

/// exact rational number used for every multiplier and power in the engine
pub type Rational = BigRational;

pub fn rat(numer: i64, denom: i64) -> Rational {
    Rational::new(BigInt::from(numer), BigInt::from(denom))
}

pub fn rat_int(n: i64) -> Rational {
    Rational::from_integer(BigInt::from(n))
}

pub fn rat_to_f64(r: &Rational) -> f64 {
    r.to_f64().unwrap_or(f64::NAN)
}

/// integer value of a rational, if it is one and fits into i64
pub fn rat_to_i64(r: &Rational) -> Option<i64> {
    if r.is_integer() { r.to_integer().to_i64() } else { None }
}

/// r^n for integer n; None for 0^(negative)
pub fn rat_pow(r: &Rational, n: i64) -> Option<Rational> {
    if n >= 0 {
        Some(num_traits::pow(r.clone(), n as usize))
    } else if r.is_zero() {
        None
    } else {
        Some(num_traits::pow(r.recip(), n.unsigned_abs() as usize))
    }
}

pub fn int_lcm(a: &BigInt, b: &BigInt) -> BigInt {
    a.lcm(b)
}

/// exact k-th root of a non-negative integer
pub fn perfect_root(n: &BigInt, k: u32) -> Option<BigInt> {
    if n.is_negative() {
        return None;
    }
    let root = n.nth_root(k);
    if num_traits::pow(root.clone(), k as usize) == *n { Some(root) } else { None }
}

/// splits n = outside^k * inside, pulling out k-th powers of small primes
pub fn extract_root_factors(n: &BigInt, k: u32) -> (BigInt, BigInt) {
    let mut inside = n.abs();
    let mut outside = BigInt::one();
    if k < 2 || inside.is_zero() {
        return (outside, inside);
    }
    let mut p: u32 = 2;
    while p < 1000 {
        let pk = num_traits::pow(BigInt::from(p), k as usize);
        if pk > inside {
            break;
        }
        while (&inside % &pk).is_zero() {
            inside /= &pk;
            outside *= BigInt::from(p);
        }
        p += if p == 2 { 1 } else { 2 };
    }
    (outside, inside)
}

/// parses decimal literals such as `12`, `0.25`, `1.5e-3` into an exact rational
pub fn parse_decimal(s: &str) -> Option<Rational> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], s[pos + 1..].parse::<i32>().ok()?),
        None => (s, 0),
    };
    let (int_part, frac_part) = match mantissa.find('.') {
        Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let digits = format!("{}{}", int_part, frac_part);
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '+') {
        return None;
    }
    let numer: BigInt = digits.parse().ok()?;
    let scale = exponent - frac_part.len() as i32;
    let ten = rat_int(10);
    let factor = rat_pow(&ten, scale as i64)?;
    Some(Rational::from_integer(numer) * factor)
}

/// rounds to `digits` significant digits and returns the exact decimal rational of the
/// rounded value, so 0.30000000000000004 becomes 3/10
pub fn f64_to_rational(x: f64, digits: usize) -> Option<Rational> {
    if !x.is_finite() {
        return None;
    }
    if x == 0.0 {
        return Some(Rational::zero());
    }
    let text = format!("{:.*e}", digits.saturating_sub(1), x);
    parse_decimal(&text)
}

pub fn round_to_decimals(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// best approximation n/d of x with 0 < d < max_den, within tolerance
pub fn best_rational_approximation(x: f64, max_den: i64, tolerance: f64) -> Option<(i64, i64)> {
    if !x.is_finite() {
        return None;
    }
    (1..max_den)
        .map(|d| ((x * d as f64).round() as i64, d))
        .find(|&(n, d)| (x - n as f64 / d as f64).abs() < tolerance)
        .map(|(n, d)| {
            let g = n.gcd(&d);
            if g == 0 { (n, d) } else { (n / g, d / g) }
        })
}

/// brackets are balanced and properly nested
pub fn brackets_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

// code finds the position of the bracket closing the one at bracket_start
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    let mut stack = 0;
    for (i, c) in input.char_indices().skip_while(|(i, _)| *i < bracket_start) {
        if c == '(' {
            stack += 1;
        } else if c == ')' {
            stack -= 1;
            if stack == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// whole string is wrapped in one pair of brackets: "(x+1)" but not "(x+1)*(x-1)"
pub fn wrapped_in_brackets(s: &str) -> bool {
    s.starts_with('(') && find_pair_to_this_bracket(s, 0) == Some(s.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12"), Some(rat_int(12)));
        assert_eq!(parse_decimal("0.25"), Some(rat(1, 4)));
        assert_eq!(parse_decimal("1.5e-3"), Some(rat(3, 2000)));
        assert_eq!(parse_decimal("2E2"), Some(rat_int(200)));
        assert_eq!(parse_decimal(".5"), Some(rat(1, 2)));
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_f64_to_rational_rounds_noise() {
        assert_eq!(f64_to_rational(0.1 + 0.2, 12), Some(rat(3, 10)));
        assert_eq!(f64_to_rational(-2.0000000000001, 12), Some(rat_int(-2)));
        assert_eq!(f64_to_rational(f64::NAN, 12), None);
    }

    #[test]
    fn test_roots() {
        assert_eq!(perfect_root(&BigInt::from(27), 3), Some(BigInt::from(3)));
        assert_eq!(perfect_root(&BigInt::from(26), 3), None);
        assert_eq!(
            extract_root_factors(&BigInt::from(12), 2),
            (BigInt::from(2), BigInt::from(3))
        );
        assert_eq!(
            extract_root_factors(&BigInt::from(7), 2),
            (BigInt::from(1), BigInt::from(7))
        );
    }

    #[test]
    fn test_best_rational_approximation() {
        assert_eq!(best_rational_approximation(0.5, 10, 1e-10), Some((1, 2)));
        assert_eq!(best_rational_approximation(-4.0 / 3.0, 10, 1e-10), Some((-4, 3)));
        assert_eq!(best_rational_approximation(0.123456789, 10, 1e-10), None);
    }

    #[test]
    fn test_brackets() {
        assert!(brackets_balanced("(x+(y-1))"));
        assert!(!brackets_balanced("(x+1))("));
        assert_eq!(find_pair_to_this_bracket("a*(b+(c))", 2), Some(8));
        assert!(wrapped_in_brackets("(x+1)"));
        assert!(!wrapped_in_brackets("(x+1)*(x-1)"));
    }
}
