//! JSON views of masks and single-point lookups printed by the CLI.

use serde::Serialize;
use skymask::prelude::*;

/// Mask-level properties as reported by `skymask info`.
#[derive(Debug, Clone, Serialize)]
pub struct MaskSummary {
    pub filename: String,
    pub npoly: usize,
    /// Steradians.
    pub area: f64,
    pub pixelization: String,
    pub pixel_scheme: char,
    pub pixel_resolution: Option<u32>,
    pub max_pixel: Option<u64>,
    pub snapped: bool,
    pub balkanized: bool,
}

impl From<&Mask> for MaskSummary {
    fn from(mask: &Mask) -> Self {
        let props = mask.properties();
        Self {
            filename: props.filename,
            npoly: props.npoly,
            area: props.area,
            pixelization: mask.pixelization().to_string(),
            pixel_scheme: props.pixel_scheme,
            pixel_resolution: props.pixel_resolution,
            max_pixel: props.max_pixel,
            snapped: props.is_snapped,
            balkanized: props.is_balkanized,
        }
    }
}

/// Result of `skymask point`.
#[derive(Debug, Clone, Serialize)]
pub struct PointReport {
    pub ra: f64,
    pub dec: f64,
    pub polyid: i64,
    pub weight: f64,
    pub contains: bool,
    /// Pixel at the mask resolution, when pixelized.
    pub pixel: Option<u64>,
}

impl PointReport {
    pub fn lookup(mask: &Mask, ra: f64, dec: f64) -> Self {
        let p = SkyPoint::from_radec(ra, dec);
        let hit = mask.resolve(&p);
        Self {
            ra,
            dec,
            polyid: hit.map_or(NO_POLYGON, |h| h.id),
            weight: hit.map_or(0.0, |h| h.weight),
            contains: hit.is_some(),
            pixel: mask.pixelization().pixel_of(&p),
        }
    }
}
