//! Plain-text source and event lists.
//!
//! One row per line, columns separated by whitespace or commas. `#` starts a
//! comment; blank lines are skipped.

use anyhow::{Context, Result, bail};
use fixedbkg_rs::Source;
use skyreg::{Region, read_region_file};
use std::path::{Path, PathBuf};

/// Numeric columns of every data line, with 1-based line numbers
fn numeric_rows(text: &str) -> Result<Vec<(usize, Vec<f64>)>> {
    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let values = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty())
            .map(|field| -> Result<f64> {
                let value = field
                    .parse::<f64>()
                    .with_context(|| format!("line {}: '{}' is not a number", idx + 1, field))?;
                if !value.is_finite() {
                    bail!("line {}: '{}' is not a finite number", idx + 1, field);
                }
                Ok(value)
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push((idx + 1, values));
    }
    Ok(rows)
}

/// Parse `x y inner_radius [theta phi]` rows into 1-based sources
pub fn parse_positions(text: &str) -> Result<Vec<Source>> {
    numeric_rows(text)?
        .into_iter()
        .enumerate()
        .map(|(i, (line, values))| {
            let source = match values.as_slice() {
                &[x, y, r] => Source::new(i + 1, x, y, r),
                &[x, y, r, theta, phi] => Source::new(i + 1, x, y, r).with_angles(theta, phi),
                other => bail!(
                    "line {}: expected 'x y inner_radius [theta phi]', found {} columns",
                    line,
                    other.len()
                ),
            };
            Ok(source)
        })
        .collect()
}

/// Parse `x y` event rows
pub fn parse_events(text: &str) -> Result<Vec<(f64, f64)>> {
    numeric_rows(text)?
        .into_iter()
        .map(|(line, values)| match values.as_slice() {
            &[x, y] => Ok((x, y)),
            other => bail!("line {}: expected 'x y', found {} columns", line, other.len()),
        })
        .collect()
}

pub fn read_positions(path: &Path) -> Result<Vec<Source>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read positions from {}", path.display()))?;
    parse_positions(&text).with_context(|| format!("Invalid positions file {}", path.display()))
}

pub fn read_events(path: &Path) -> Result<Vec<(f64, f64)>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    parse_events(&text).with_context(|| format!("Invalid events file {}", path.display()))
}

/// Resolve the `--exclude` argument: `none` disables extra exclusions
pub fn exclusion_paths(list: Option<&str>) -> Option<Vec<PathBuf>> {
    let list = list?.trim();
    if list.is_empty() || list.eq_ignore_ascii_case("none") {
        return None;
    }
    Some(
        list.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect(),
    )
}

pub fn read_regions(paths: &[PathBuf]) -> Result<Vec<Region>> {
    paths
        .iter()
        .map(|path| {
            read_region_file(path)
                .with_context(|| format!("Failed to read region file {}", path.display()))
        })
        .collect()
}
