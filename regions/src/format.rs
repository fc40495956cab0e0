//! Reading and writing regions as ASCII shape lists or JSON.
//!
//! The ASCII form puts one term per line. Within a line the first shape may be
//! negated with a leading `-` or `!`, later shapes are joined with `*`/`&`
//! (and) or `-` (and not), and `|`/`+` start a new term. `#` starts a comment.
//!
//! ```text
//! # background annulus for source 1
//! annulus(4096.5,4101.2,4.1,25.7)-circle(4110,4100,3.2)
//! ```

use crate::error::{RegionError, Result};
use crate::geometry::{
    create_annulus, create_circle, create_ellipse, create_polygon_flat, create_rectangle,
};
use crate::region::{Inclusion, Logic, Region, RegionEntry};
use crate::shape::Shape;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use strum_macros::{Display, EnumString};

static SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z]+)\s*\(([^()]*)\)\s*$").expect("shape pattern is a valid regex")
});

/// Shape names accepted in region files
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum ShapeKind {
    Field,
    Circle,
    Annulus,
    Ellipse,
    Rotbox,
    #[strum(serialize = "box")]
    Rectangle,
    Polygon,
}

/// Persisted region formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RegionFormat {
    Ascii,
    Json,
}

impl RegionFormat {
    /// `.json` files are JSON, everything else is ASCII
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RegionFormat::Json,
            _ => RegionFormat::Ascii,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            RegionFormat::Ascii => "reg",
            RegionFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Or,
    And,
    AndNot,
    Not,
}

#[derive(Debug)]
enum Token<'a> {
    Op(Op),
    Shape(&'a str),
}

/// Write a region in canonical ASCII form, one term per line
pub fn to_ascii(region: &Region) -> String {
    region
        .terms()
        .into_iter()
        .map(|term| {
            term.iter()
                .enumerate()
                .map(|(pos, entry)| match (pos, entry.inclusion) {
                    (0, Inclusion::Include) => entry.shape.to_string(),
                    (0, Inclusion::Exclude) => format!("-{}", entry.shape),
                    (_, Inclusion::Include) => format!("*{}", entry.shape),
                    (_, Inclusion::Exclude) => format!("-{}", entry.shape),
                })
                .join("")
        })
        .map(|line| line + "\n")
        .collect()
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_ascii(self))
    }
}

/// Parse an ASCII region. Blank and comment-only input yields the empty region.
pub fn parse_region(text: &str) -> Result<Region> {
    let mut entries: Vec<RegionEntry> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let mut pending = Some(Logic::Or);
        let mut exclude = false;
        for token in tokenize(line, line_no)? {
            match token {
                Token::Op(Op::Or) => {
                    pending = Some(Logic::Or);
                    exclude = false;
                }
                Token::Op(Op::And) => pending = Some(Logic::And),
                Token::Op(Op::AndNot) => {
                    pending.get_or_insert(Logic::And);
                    exclude = true;
                }
                Token::Op(Op::Not) => exclude = true,
                Token::Shape(shape_text) => {
                    let logic = pending.take().ok_or_else(|| {
                        RegionError::parse_error(
                            line_no,
                            format!("missing operator before '{}'", shape_text),
                        )
                    })?;
                    let logic = if entries.is_empty() {
                        Logic::NoOp
                    } else {
                        logic
                    };
                    let inclusion = if exclude {
                        Inclusion::Exclude
                    } else {
                        Inclusion::Include
                    };
                    entries.push(RegionEntry::new(
                        parse_shape(shape_text, line_no)?,
                        inclusion,
                        logic,
                    ));
                    exclude = false;
                }
            }
        }
        if pending.is_some() || exclude {
            return Err(RegionError::parse_error(
                line_no,
                "line ends with a dangling operator",
            ));
        }
    }

    Region::from_entries(entries)
}

fn tokenize(line: &str, line_no: usize) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '|' | '+' => tokens.push(Token::Op(Op::Or)),
            '&' | '*' => tokens.push(Token::Op(Op::And)),
            '-' => tokens.push(Token::Op(Op::AndNot)),
            '!' => tokens.push(Token::Op(Op::Not)),
            c if c.is_ascii_alphabetic() => {
                // A shape runs to its closing parenthesis
                let mut depth = 0i32;
                let mut end = None;
                for (offset, ch) in line[start..].char_indices() {
                    match ch {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                end = Some(start + offset + 1);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let end = end.ok_or_else(|| {
                    RegionError::parse_error(
                        line_no,
                        format!("unterminated shape '{}'", &line[start..]),
                    )
                })?;
                tokens.push(Token::Shape(&line[start..end]));
                while chars.next_if(|&(i, _)| i < end).is_some() {}
            }
            other => {
                return Err(RegionError::parse_error(
                    line_no,
                    format!("unexpected character '{}'", other),
                ));
            }
        }
    }
    Ok(tokens)
}

fn parse_shape(text: &str, line_no: usize) -> Result<Shape> {
    let caps = SHAPE_RE
        .captures(text)
        .ok_or_else(|| RegionError::parse_error(line_no, format!("bad shape '{}'", text)))?;
    let kind: ShapeKind = caps[1].parse().map_err(|_| {
        RegionError::parse_error(line_no, format!("unknown shape '{}'", &caps[1]))
    })?;
    let args = parse_args(&caps[2], line_no)?;

    let shape = match (kind, args.as_slice()) {
        (ShapeKind::Field, []) => Ok(Shape::Field),
        (ShapeKind::Circle, &[x, y, r]) => create_circle(x, y, r),
        (ShapeKind::Annulus, &[x, y, r0, r1]) => create_annulus(x, y, r0, r1),
        (ShapeKind::Ellipse, &[x, y, rx, ry]) => create_ellipse(x, y, rx, ry, 0.0),
        (ShapeKind::Ellipse, &[x, y, rx, ry, angle]) => create_ellipse(x, y, rx, ry, angle),
        (ShapeKind::Rectangle, &[x, y, w, h]) => create_rectangle(x, y, w, h, 0.0),
        (ShapeKind::Rectangle | ShapeKind::Rotbox, &[x, y, w, h, angle]) => {
            create_rectangle(x, y, w, h, angle)
        }
        (ShapeKind::Polygon, coords) => create_polygon_flat(coords),
        (kind, args) => {
            return Err(RegionError::parse_error(
                line_no,
                format!("{} does not take {} arguments", kind, args.len()),
            ));
        }
    };
    shape.map_err(|e| RegionError::parse_error(line_no, e.to_string()))
}

fn parse_args(text: &str, line_no: usize) -> Result<Vec<f64>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|arg| {
            let arg = arg.trim();
            arg.parse::<f64>().map_err(|_| {
                RegionError::parse_error(line_no, format!("'{}' is not a number", arg))
            })
        })
        .collect()
}

/// Serialize a region as pretty-printed JSON
pub fn to_json(region: &Region) -> Result<String> {
    Ok(serde_json::to_string_pretty(region)?)
}

/// Parse a JSON region; the entry list is validated while deserializing
pub fn from_json(text: &str) -> Result<Region> {
    Ok(serde_json::from_str(text)?)
}

/// Read a region file, picking the format from the extension
pub fn read_region_file(path: impl AsRef<Path>) -> Result<Region> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| RegionError::io(path, e))?;
    let region = match RegionFormat::from_path(path) {
        RegionFormat::Ascii => parse_region(&text),
        RegionFormat::Json => from_json(&text),
    };
    region.map_err(|e| e.with_context(path.display().to_string()))
}

/// Write a region file in the given format
pub fn write_region_file(
    path: impl AsRef<Path>,
    region: &Region,
    format: RegionFormat,
) -> Result<()> {
    let path = path.as_ref();
    let text = match format {
        RegionFormat::Ascii => to_ascii(region),
        RegionFormat::Json => to_json(region)?,
    };
    std::fs::write(path, text).map_err(|e| RegionError::io(path, e))
}
