use std::fmt::Display;

/// Displays a number with exactly two digits after the decimal point.
///
/// Ties (values exactly halfway between two cents) round away from zero, negative zero displays
/// unsigned and magnitudes of 1e21 or more fall back to exponent notation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed2(pub f64);

impl Display for Fixed2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0.0 { "-" } else { "" };
        let magnitude = self.0.abs();

        if magnitude >= 1e21 {
            let exp = format!("{magnitude:e}").replacen('e', "e+", 1);
            return write!(f, "{sign}{exp}");
        }

        // std rounds exact ties to even, so they are resolved here
        match tie_cents(magnitude) {
            Some(cents) => write!(f, "{sign}{}.{:02}", cents / 100, cents % 100),
            None => write!(f, "{sign}{magnitude:.2}"),
        }
    }
}

/// If `magnitude` lies exactly halfway between two cents, returns the cent count rounded away
/// from zero. Works on the binary representation so it stays exact for every finite value.
fn tie_cents(magnitude: f64) -> Option<u128> {
    let bits = magnitude.to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1 << 52) - 1);
    // magnitude == mantissa * 2^exp
    let (mantissa, exp) = match biased_exp {
        0 => (fraction, -1074),
        _ => (fraction | 1 << 52, biased_exp - 1075),
    };
    if mantissa == 0 || exp >= 0 {
        return None;
    }

    // magnitude * 200 == mantissa * 25 * 2^3 / 2^shift, an odd integer only when the shift
    // cancels every factor of two
    let shift = exp.unsigned_abs();
    if mantissa.trailing_zeros() + 3 != shift {
        return None;
    }

    Some(((u128::from(mantissa) * 100) >> shift) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_digits() {
        assert_eq!(Fixed2(1.5).to_string(), "1.50");
        assert_eq!(Fixed2(3.0).to_string(), "3.00");
        assert_eq!(Fixed2(0.0).to_string(), "0.00");
    }

    #[test]
    fn test_display_rounds_inexact_values_by_exact_value() {
        assert_eq!(Fixed2(1.8541).to_string(), "1.85");
        assert_eq!(Fixed2(0.4996).to_string(), "0.50");
        // 2.675 is stored as 2.67499999...
        assert_eq!(Fixed2(2.675).to_string(), "2.67");
        assert_eq!(Fixed2(1.005).to_string(), "1.00");
    }

    #[test]
    fn test_display_exact_ties_round_up() {
        assert_eq!(Fixed2(0.125).to_string(), "0.13");
        assert_eq!(Fixed2(0.375).to_string(), "0.38");
        assert_eq!(Fixed2(-0.125).to_string(), "-0.13");
    }

    #[test]
    fn test_display_large_ties_round_up() {
        // 2^46 + 0.125, the cent product no longer fits a double exactly
        assert_eq!(Fixed2(70368744177664.125).to_string(), "70368744177664.13");
        assert_eq!(Fixed2(1e15 + 0.125).to_string(), "1000000000000000.13");
        assert_eq!(Fixed2(-(1e15 + 0.375)).to_string(), "-1000000000000000.38");
        assert_eq!(Fixed2(1e15 + 0.25).to_string(), "1000000000000000.25");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Fixed2(-2.5).to_string(), "-2.50");
        assert_eq!(Fixed2(-0.001).to_string(), "-0.00");
        assert_eq!(Fixed2(-0.0).to_string(), "0.00");
    }

    #[test]
    fn test_display_huge_uses_exponent() {
        assert_eq!(Fixed2(1e21).to_string(), "1e+21");
        assert_eq!(Fixed2(-1.5e22).to_string(), "-1.5e+22");
    }
}
