use crate::config::FixedCountsConfig;
use crate::error::{FixedBkgError, Result};
use crate::pipeline::{FixedCountsResult, SourceResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-source row of the run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReport {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phi: Option<f64>,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub enclosed_counts: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    pub clipped: bool,
    pub clamped: bool,
    pub insufficient_background: bool,
    pub high_count_fraction: bool,
    /// Output file written for this source, filled in by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_file: Option<String>,
}

impl From<&SourceResult> for SourceReport {
    fn from(result: &SourceResult) -> Self {
        Self {
            index: result.source.index,
            x: result.source.x,
            y: result.source.y,
            theta: result.source.theta,
            phi: result.source.phi,
            inner_radius: result.source.inner_radius,
            outer_radius: result.outer_radius,
            enclosed_counts: result.diagnostics.enclosed_counts,
            area: result.area,
            clipped: result.clipped,
            clamped: result.diagnostics.clamped,
            insufficient_background: result.diagnostics.insufficient_background,
            high_count_fraction: result.diagnostics.high_count_fraction,
            region_file: None,
        }
    }
}

/// JSON summary of a fixed-counts run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCountsReport {
    pub config: FixedCountsConfig,
    pub n_sources: usize,
    pub n_events: usize,
    pub n_background: usize,
    /// Sources with at least one diagnostic raised
    pub n_flagged: usize,
    pub sources: Vec<SourceReport>,
}

impl FixedCountsReport {
    pub fn new(result: &FixedCountsResult, config: &FixedCountsConfig) -> Self {
        let sources: Vec<SourceReport> = result.sources.iter().map(SourceReport::from).collect();
        let n_flagged = sources
            .iter()
            .filter(|s| s.clamped || s.insufficient_background || s.high_count_fraction)
            .count();
        Self {
            config: config.clone(),
            n_sources: sources.len(),
            n_events: result.n_events,
            n_background: result.n_background,
            n_flagged,
            sources,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| FixedBkgError::io(path, e))
    }
}
