use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    sequence::preceded,
};

use crate::common::text::is_blank;

/// nom parser for the leading number of a price field.
///
/// Accepts the longest prefix of the form `[+-]? (Infinity | digits[.digits] | .digits)` followed
/// by an optional exponent, after skipping leading whitespace. Whatever follows the number is left
/// unconsumed.
pub fn parse_float_prefix_nom(initial_input: &str) -> IResult<&str, f64> {
    let (input, _) = take_while(is_blank).parse(initial_input)?;
    let (input, sign) = opt(one_of("+-")).parse(input)?;

    let (input, magnitude) = alt((
        map(tag("Infinity"), |_| f64::INFINITY),
        map_res(
            (mantissa, exponent),
            |((int, frac), exp): ((&str, &str), Option<&str>)| {
                // normalized so std never sees a bare "." or a missing side
                let int = if int.is_empty() { "0" } else { int };
                let frac = if frac.is_empty() { "0" } else { frac };
                format!("{int}.{frac}e{}", exp.unwrap_or("0")).parse::<f64>()
            },
        ),
    ))
    .parse(input)?;

    let value = if sign == Some('-') {
        -magnitude
    } else {
        magnitude
    };

    Ok((input, value))
}

/// Integer and fraction digits, either side may be empty but not both
fn mantissa(input: &str) -> IResult<&str, (&str, &str)> {
    alt((
        map((digit1, opt(preceded(char('.'), digit0))), |(int, frac)| {
            (int, frac.unwrap_or(""))
        }),
        map(preceded(char('.'), digit1), |frac| ("", frac)),
    ))
    .parse(input)
}

/// Signed exponent digits. An `e` without digits is not part of the number.
fn exponent(input: &str) -> IResult<&str, Option<&str>> {
    opt(preceded(
        one_of("eE"),
        recognize((opt(one_of("+-")), digit1)),
    ))
    .parse(input)
}

/// Returns the leading number of `text`, or None if it doesn't start with one
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    parse_float_prefix_nom(text).ok().map(|(_, value)| value)
}
