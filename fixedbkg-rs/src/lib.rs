//! Fixed-counts background regions for point sources
//!
//! For every source in a detector image this crate builds a background
//! annulus around the source that
//!
//! - avoids the PSF footprints of all sources and any extra exclusion shapes,
//! - is clipped to the field of view when the field of view cuts it, and
//! - reaches out just far enough to enclose a requested number of background
//!   events, optionally capped at a maximum radius.
//!
//! Regions come from the [`skyreg`] region algebra.
//!
//! # Quick Start
//!
//! ```rust
//! use fixedbkg_rs::{FixedCountsConfig, Source, run_fixed_counts};
//!
//! let sources = vec![Source::new(1, 100.0, 100.0, 5.0)];
//! let events = vec![(110.0, 100.0), (100.0, 120.0), (70.0, 100.0), (101.0, 101.0)];
//! let config = FixedCountsConfig {
//!     min_counts: 2,
//!     ..Default::default()
//! };
//!
//! let result = run_fixed_counts(&sources, &events, None, None, &config)?;
//! let bkg = &result.sources[0];
//!
//! // (101, 101) lies inside the footprint and is not background
//! assert_eq!(result.n_background, 3);
//! assert_eq!(bkg.outer_radius, 20.0);
//! assert!(bkg.region.contains(100.0, 115.0));
//! # Ok::<(), fixedbkg_rs::FixedBkgError>(())
//! ```
//!
//! # Components
//!
//! - [`build_exclusion`]: the swiss-cheese region of everything not excluded
//! - [`classify_events`]: background events, in input order
//! - [`solve_radius`]: order-statistic outer radius with diagnostics
//! - [`assemble_annulus`]: final region with FOV clipping and own-circle repair
//! - [`run_fixed_counts`]: all of the above, sources processed on rayon

pub mod annulus;
pub mod classify;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod index;
pub mod pipeline;
pub mod radius;
pub mod report;
pub mod source;

pub use annulus::{AssembledAnnulus, assemble_annulus, remove_own_circle};
pub use classify::classify_events;
pub use config::FixedCountsConfig;
pub use error::{FixedBkgError, Result};
pub use exclusion::{Exclusion, build_exclusion};
pub use index::EventIndex;
pub use pipeline::{FixedCountsResult, SourceResult, run_fixed_counts};
pub use radius::{HIGH_COUNT_FRACTION, SolvedRadius, solve_radius};
pub use report::{FixedCountsReport, SourceReport};
pub use source::Source;
