//! Pixelization: sphere partitions and the polygon index built on them.
//!
//! Purpose
//! - Map a point to a pixel number (`Pixelization::pixel_of`, `pixel_number`).
//! - Map a pixel number to the ordered list of polygons that may contain points
//!   of that pixel (`PixelIndex`), so that a query tests a handful of polygons
//!   instead of the whole mask.
//!
//! Scheme `'s'` (simple)
//! - Resolution `r` splits the sphere into `2^r` equal-area bands in
//!   `cos(theta)` and `2^r` equal-step sectors in `phi`, i.e. `4^r` pixels.
//! - Pixel numbers of resolution `r` start after all lower resolutions, at
//!   `(4^r − 1) / 3`, so a number alone identifies its resolution.
//! - Pixels nest: every pixel at resolution `r` splits into `4^(r'−r)` pixels
//!   at resolution `r' > r`.
//!
//! Index contract
//! - Bucket contents are polygon positions in mask order; iteration merges a
//!   bucket with the polygons filed everywhere, so the first match of an
//!   indexed query is the first match of a full scan.
//!
//! Code cross-refs: `crate::mask::Mask::resolve`, `crate::geom::Polygon::bounding_cap`.

mod cover;
mod index;
mod scheme;
mod simple;

pub use index::{Candidates, PixelAssignment, PixelError, PixelIndex, MAX_FILED_PIXELS};
pub use scheme::{pixel_number, Pixelization, SchemeError, MAX_SIMPLE_RES};
