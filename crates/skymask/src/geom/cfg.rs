//! Tolerance defaults for cap geometry (internal).
//!
//! Policy
//! - Fixed constants; loader-facing knobs live in `io::LoadCfg` and default to
//!   these values.

use std::f64::consts::PI;

/// Largest accepted deviation of a cap axis from unit norm.
pub(crate) const NORM_TOL: f64 = 1e-6;
/// Angular padding (radians) applied to bounding extents before pixel coverage.
pub(crate) const EXTENT_PAD: f64 = 1e-9;
/// Fibonacci lattice size for area estimates of multi-cap polygons.
pub(crate) const AREA_SAMPLES: usize = 20_000;
/// Solid angle of the full sphere (steradians).
pub(crate) const FOUR_PI: f64 = 4.0 * PI;
