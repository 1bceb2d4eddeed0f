//! Flat query surface for host-language bindings.
//!
//! Important
//! - Bindings coerce scalars/arrays into `&[f64]` slices and republish the
//!   properties; everything here is a thin pass-through to `Mask`.
//! - Outputs keep the binding contract: `-1` for "no polygon", `0` weight and
//!   `0` flag outside the mask, parallel vectors of the input length.

pub use crate::mask::{Mask, MaskProperties, QueryError, NO_POLYGON};
pub use crate::pixel::pixel_number;

use crate::io::{load_path, LoadCfg, LoadError};
use std::path::Path;

/// Open a mask with the default loader configuration.
pub fn open(path: impl AsRef<Path>) -> Result<Mask, LoadError> {
    load_path(path, &LoadCfg::default())
}

/// `(polyid, weight)` per point.
pub fn polyid_and_weight(mask: &Mask, ra: &[f64], dec: &[f64]) -> Result<(Vec<i64>, Vec<f64>), QueryError> {
    mask.polyid_and_weight(ra, dec)
}

pub fn polyid(mask: &Mask, ra: &[f64], dec: &[f64]) -> Result<Vec<i64>, QueryError> {
    mask.polyid(ra, dec)
}

pub fn weight(mask: &Mask, ra: &[f64], dec: &[f64]) -> Result<Vec<f64>, QueryError> {
    mask.weight(ra, dec)
}

pub fn contains(mask: &Mask, ra: &[f64], dec: &[f64]) -> Result<Vec<u8>, QueryError> {
    mask.contains(ra, dec)
}

/// Simple-scheme pixel numbers at `res` (the binding's `calc_simplepix`).
pub fn simple_pixel(ra: &[f64], dec: &[f64], res: i64) -> Result<Vec<i64>, QueryError> {
    pixel_number(ra, dec, 's', res)
}

pub fn properties(mask: &Mask) -> MaskProperties {
    mask.properties()
}
