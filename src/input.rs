//! Parsing of the host's text-entry fields.
//!
//! # Accepted forms
//!
//! - Depth: `18`, `18.5`, `18m`, `18 msw`
//! - Bottom time: `40`, `40min`, `40 minutes`, `40'`
//! - Gas: `air`, `EAN32`, `nx32`, `32`, `32%` (bare numbers are oxygen percent)
//! - Plan: `<depth> <time> [gas]`, fields separated by whitespace or `/`,
//!   e.g. `40m 30min EAN32` or `18m/40min`. The gas defaults to air.
//!
//! # Example
//!
//! ```
//! use submerge_deco::input::parse_dive_plan;
//!
//! let params = parse_dive_plan("30m/25min EAN32").expect("plan should parse");
//! assert_eq!(params.depth_m, 30.0);
//! assert_eq!(params.bottom_time_min, 25);
//! assert!((params.oxygen_fraction - 0.32).abs() < 1e-12);
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, multispace0, multispace1, u32 as parse_u32},
    combinator::{map, opt, recognize, value},
    number::complete::double,
    sequence::{preceded, terminated},
    IResult, Parser,
};

use crate::error::{DecoError, InputError};
use crate::gas::AIR_OXYGEN_FRACTION;
use crate::models::{validate_depth, validate_oxygen_fraction, DiveParameters, SafetyFactor};

/// Parse a depth in metres.
pub fn parse_depth(text: &str) -> Result<f64, InputError> {
    let depth = run("depth", text, depth_m)?;
    Ok(validate_depth(depth)?)
}

/// Parse a bottom time in whole minutes.
pub fn parse_bottom_time(text: &str) -> Result<i32, InputError> {
    let minutes = run("bottom time", text, bottom_time_min)?;
    Ok(minutes_to_i32(minutes)?)
}

/// Parse a gas and return its oxygen fraction.
pub fn parse_oxygen_fraction(text: &str) -> Result<f64, InputError> {
    let fraction = run("gas", text, oxygen_fraction)?;
    Ok(validate_oxygen_fraction(fraction)?)
}

/// Parse a compact plan into validated dive parameters.
pub fn parse_dive_plan(text: &str) -> Result<DiveParameters, InputError> {
    let (depth, minutes, gas) = run("dive plan", text, dive_plan)?;
    let params = DiveParameters {
        depth_m: depth,
        bottom_time_min: minutes_to_i32(minutes)?,
        oxygen_fraction: gas.unwrap_or(AIR_OXYGEN_FRACTION),
        safety_factor: SafetyFactor::default().level(),
    };
    params.validate()?;
    Ok(params)
}

fn minutes_to_i32(minutes: u32) -> Result<i32, DecoError> {
    i32::try_from(minutes).map_err(|_| {
        DecoError::invalid_input("bottom_time_min", format!("{minutes} min is out of range"))
    })
}

/// Run `parser` over the trimmed `text`, requiring it to consume everything.
fn run<'a, O, P>(field: &'static str, text: &'a str, mut parser: P) -> Result<O, InputError>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    let input = text.trim();
    if input.is_empty() {
        return Err(InputError::Empty { field });
    }

    match parser.parse(input) {
        Ok((remaining, output)) => {
            if remaining.is_empty() {
                Ok(output)
            } else {
                Err(InputError::Parse {
                    field,
                    position: input.len() - remaining.len(),
                    message: format!("unexpected characters: '{}'", remaining.trim()),
                })
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(InputError::Parse {
            field,
            position: input.len() - e.input.len(),
            message: format!("unexpected input ({:?})", e.code),
        }),
        Err(nom::Err::Incomplete(_)) => Err(InputError::Parse {
            field,
            position: input.len(),
            message: "incomplete input".to_string(),
        }),
    }
}

fn depth_m(input: &str) -> IResult<&str, f64> {
    terminated(
        double,
        opt(preceded(
            multispace0,
            alt((tag_no_case("msw"), tag_no_case("m"))),
        )),
    )
    .parse(input)
}

fn bottom_time_min(input: &str) -> IResult<&str, u32> {
    terminated(
        parse_u32,
        opt(preceded(
            multispace0,
            alt((
                tag_no_case("minutes"),
                tag_no_case("mins"),
                tag_no_case("min"),
                tag("'"),
            )),
        )),
    )
    .parse(input)
}

fn oxygen_fraction(input: &str) -> IResult<&str, f64> {
    alt((
        value(AIR_OXYGEN_FRACTION, tag_no_case("air")),
        map(
            preceded(alt((tag_no_case("ean"), tag_no_case("nx"))), double),
            from_percent,
        ),
        map(
            terminated(double, opt(preceded(multispace0, char('%')))),
            from_percent,
        ),
    ))
    .parse(input)
}

fn from_percent(percent: f64) -> f64 {
    percent / 100.0
}

fn separator(input: &str) -> IResult<&str, &str> {
    alt((
        recognize((multispace0, char('/'), multispace0)),
        multispace1,
    ))
    .parse(input)
}

fn dive_plan(input: &str) -> IResult<&str, (f64, u32, Option<f64>)> {
    (
        depth_m,
        preceded(separator, bottom_time_min),
        opt(preceded(separator, oxygen_fraction)),
    )
        .parse(input)
}
