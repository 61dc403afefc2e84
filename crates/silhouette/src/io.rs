//! Plain-text outline serialization: one `x y` row per point, the format the
//! cluster's simulation jobs consume (`contour.dat`).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Result, SilhouetteError};
use crate::types::Outline;

pub fn outline_to_string(outline: &Outline) -> String {
    let mut out = String::new();
    for [x, y] in &outline.points {
        let _ = writeln!(out, "{x} {y}");
    }
    out
}

pub fn parse_outline(text: &str) -> Result<Outline> {
    let mut points = Vec::new();
    for (line_number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let x = parse_coordinate(tokens.next(), line_number)?;
        let y = parse_coordinate(tokens.next(), line_number)?;
        if tokens.next().is_some() {
            return Err(SilhouetteError::ContourParse(format!(
                "line {}: expected two columns",
                line_number + 1
            )));
        }
        points.push([x, y]);
    }
    Ok(Outline::new(points))
}

fn parse_coordinate(token: Option<&str>, line_number: usize) -> Result<i32> {
    let token = token.ok_or_else(|| {
        SilhouetteError::ContourParse(format!("line {}: missing coordinate", line_number + 1))
    })?;
    // Accept float formatting from other tooling, truncating toward zero.
    token
        .parse::<f64>()
        .map(|v| v as i32)
        .map_err(|_| {
            SilhouetteError::ContourParse(format!(
                "line {}: invalid coordinate {token:?}",
                line_number + 1
            ))
        })
}

pub fn write_outline<P: AsRef<Path>>(path: P, outline: &Outline) -> Result<()> {
    fs::write(path, outline_to_string(outline))?;
    Ok(())
}

pub fn read_outline<P: AsRef<Path>>(path: P) -> Result<Outline> {
    let text = fs::read_to_string(path)?;
    parse_outline(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_text() {
        let outline = Outline::new(vec![[1, 2], [3, -4], [0, 0]]);
        let text = outline_to_string(&outline);
        assert_eq!(text, "1 2\n3 -4\n0 0\n");
        assert_eq!(parse_outline(&text).unwrap(), outline);
    }

    #[test]
    fn tolerates_blank_lines_and_float_columns() {
        let outline = parse_outline("1.0 2.5\n\n3 4\n").unwrap();
        assert_eq!(outline.points, vec![[1, 2], [3, 4]]);
    }

    #[test]
    fn rejects_malformed_rows() {
        assert!(parse_outline("1\n").is_err());
        assert!(parse_outline("1 2 3\n").is_err());
        assert!(parse_outline("a b\n").is_err());
    }
}
