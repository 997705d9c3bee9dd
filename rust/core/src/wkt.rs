// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! POLYHEDRALSURFACE text reader/writer using nom
//!
//! Grammar accepted by [`parse_polyhedral_surface`]:
//!
//! ```text
//! ["SRID=<int>;"] POLYHEDRALSURFACE [Z|ZM|M] ( <polygon> {, <polygon>} )
//! ["SRID=<int>;"] POLYHEDRALSURFACE [Z|ZM|M] EMPTY
//! <polygon> ::= "(" <ring> ")"
//! <ring>    ::= "(" <vertex> {"," <vertex>} ")"
//! <vertex>  ::= <lon> <lat> <alt> [<measure>]
//! ```
//!
//! Polygons carry exactly one ring; holes are rejected. The structure is
//! matched with nom, while coordinate tokens are parsed one by one so
//! that errors can name the offending token.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_till},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geo::{GeoTriangle, GeoVertex};

/// Decimal places written per coordinate component by default
pub const DEFAULT_PRECISION: usize = 8;

/// Most decimal places that still carry information for an f64 component
pub const MAX_PRECISION: usize = 17;

/// Max per-component difference between the first and last ring vertex
pub const RING_CLOSURE_TOLERANCE: f64 = 1e-9;

/// Minimum coordinate tokens in a ring (3 unique + closing repeat)
pub const MIN_RING_TOKENS: usize = 4;

/// Coordinate dimension qualifier following the geometry keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    /// No qualifier present
    #[default]
    Unspecified,
    Z,
    M,
    ZM,
}

/// Parsed surface with closed rings (first vertex repeated at the end)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyhedralSurface {
    pub srid: Option<i32>,
    pub dimension: Dimension,
    pub rings: Vec<Vec<GeoVertex>>,
}

impl PolyhedralSurface {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// Raw layout: SRID, dimension, and per polygon the raw ring bodies
type RawSurface<'a> = (Option<i32>, Dimension, Option<Vec<Vec<&'a str>>>);

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

/// Separator between list items: optional whitespace around a comma
fn comma(input: &str) -> IResult<&str, char> {
    delimited(ws, char(','), ws)(input)
}

/// Parse SRID prefix: SRID=4326;
fn srid(input: &str) -> IResult<&str, i32> {
    delimited(
        pair(tag_no_case("SRID"), delimited(ws, char('='), ws)),
        map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
            s.parse::<i32>()
        }),
        pair(ws, char(';')),
    )(input)
}

/// Parse dimension qualifier: Z, M, ZM
fn dimension(input: &str) -> IResult<&str, Dimension> {
    alt((
        value(Dimension::ZM, tag_no_case("ZM")),
        value(Dimension::Z, tag_no_case("Z")),
        value(Dimension::M, tag_no_case("M")),
    ))(input)
}

/// Parse geometry keyword and optional qualifier
fn header(input: &str) -> IResult<&str, Dimension> {
    map(
        preceded(
            pair(tag_no_case("POLYHEDRALSURFACE"), ws),
            opt(terminated(dimension, ws)),
        ),
        |d| d.unwrap_or_default(),
    )(input)
}

/// Parse one ring, returning the raw text between its parentheses
fn ring(input: &str) -> IResult<&str, &str> {
    delimited(char('('), take_till(|c| c == '(' || c == ')'), char(')'))(input)
}

/// Parse one polygon: a parenthesized list of rings
fn polygon(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        pair(char('('), ws),
        separated_list1(comma, ring),
        pair(ws, char(')')),
    )(input)
}

/// Parse the polygon list, or EMPTY
fn body(input: &str) -> IResult<&str, Option<Vec<Vec<&str>>>> {
    alt((
        value(None, tag_no_case("EMPTY")),
        map(
            delimited(
                pair(char('('), ws),
                separated_list1(comma, polygon),
                pair(ws, char(')')),
            ),
            Some,
        ),
    ))(input)
}

fn surface(input: &str) -> IResult<&str, RawSurface<'_>> {
    all_consuming(map(
        tuple((opt(terminated(srid, ws)), header, body, ws)),
        |(srid, dimension, polygons, _)| (srid, dimension, polygons),
    ))(input)
}

/// Parse a single numeric field of a coordinate token
fn parse_number(token: &str, field: &str) -> Result<f64> {
    match fast_float::parse::<f64, _>(field) {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(Error::coordinate(token, format!("'{}' is not finite", field))),
        Err(_) => Err(Error::coordinate(token, format!("'{}' is not a number", field))),
    }
}

/// Parse `lon lat alt [measure]`; the measure is checked and dropped
fn parse_vertex(token: &str) -> Result<GeoVertex> {
    let fields: Vec<&str> = token.split_whitespace().collect();

    if fields.len() < 3 {
        return Err(Error::coordinate(
            token,
            format!(
                "expected 'longitude latitude altitude', found {} value(s)",
                fields.len()
            ),
        ));
    }
    if fields.len() > 4 {
        return Err(Error::coordinate(
            token,
            format!("expected at most 4 values, found {}", fields.len()),
        ));
    }

    let longitude = parse_number(token, fields[0])?;
    let latitude = parse_number(token, fields[1])?;
    let altitude = parse_number(token, fields[2])?;
    if let Some(measure) = fields.get(3) {
        parse_number(token, measure)?;
    }

    Ok(GeoVertex::new(longitude, latitude, altitude))
}

/// Parse the body of one ring and check that it closes
fn parse_ring(raw: &str) -> Result<Vec<GeoVertex>> {
    let tokens: Vec<&str> = raw.split(',').collect();
    if tokens.len() < MIN_RING_TOKENS {
        return Err(Error::RingTooShort {
            count: tokens.len(),
        });
    }

    let vertices = tokens
        .iter()
        .map(|token| parse_vertex(token))
        .collect::<Result<Vec<_>>>()?;

    let first = vertices[0];
    let last = vertices[vertices.len() - 1];
    if !first.approx_eq(&last, RING_CLOSURE_TOLERANCE) {
        return Err(Error::RingNotClosed {
            first: first.to_string(),
            last: last.to_string(),
        });
    }

    Ok(vertices)
}

/// Parse POLYHEDRALSURFACE text into closed rings.
///
/// Rings are returned as written, closing vertex included. `EMPTY`
/// surfaces yield no rings.
pub fn parse_polyhedral_surface(text: &str) -> Result<PolyhedralSurface> {
    let input = text.trim();

    let (_, (srid, dimension, polygons)) = surface(input).map_err(|_| Error::grammar(input))?;

    let mut rings = Vec::new();
    for (index, polygon) in polygons.unwrap_or_default().into_iter().enumerate() {
        if polygon.len() > 1 {
            return Err(Error::UnsupportedFeature(format!(
                "interior rings are not supported (polygon {} has {} rings)",
                index,
                polygon.len()
            )));
        }
        for raw in polygon {
            rings.push(parse_ring(raw)?);
        }
    }

    Ok(PolyhedralSurface {
        srid,
        dimension,
        rings,
    })
}

fn push_vertex(out: &mut String, v: &GeoVertex, precision: usize) {
    out.push_str(&format!(
        "{:.*} {:.*} {:.*}",
        precision, v.longitude, precision, v.latitude, precision, v.altitude
    ));
}

/// Write triangles as `POLYHEDRALSURFACE Z (((v0, v1, v2, v0)), ...)`.
///
/// Every component uses `precision` fixed decimals, clamped to
/// [`MAX_PRECISION`]. An empty slice is written as
/// `POLYHEDRALSURFACE Z EMPTY`.
pub fn write_polyhedral_surface(triangles: &[GeoTriangle], precision: usize) -> String {
    if triangles.is_empty() {
        return "POLYHEDRALSURFACE Z EMPTY".to_string();
    }
    let precision = precision.min(MAX_PRECISION);

    // ~3 numbers * (integer part + separators + decimals) * 4 vertices
    let per_triangle = 4 * 3 * (precision + 8);
    let mut out = String::with_capacity(24 + triangles.len() * per_triangle);

    out.push_str("POLYHEDRALSURFACE Z (");
    for (i, tri) in triangles.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str("((");
        for (j, v) in [tri.v0, tri.v1, tri.v2, tri.v0].iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            push_vertex(&mut out, v, precision);
        }
        out.push_str("))");
    }
    out.push(')');

    out
}
