//! Spherical caps and cap-intersection polygons.
//!
//! Purpose
//! - Provide the leaf geometry of a mask: `Cap` (a spherical half-space or its
//!   complement) and `Polygon` (a conjunction of caps with weight/area metadata).
//! - Keep the membership test a single scalar comparison per cap so that the
//!   query engine can stay branch-light on the hot path.
//!
//! Conventions
//! - Points are unit 3-vectors built from colatitude `theta = 90° − dec` and
//!   longitude `phi = ra` (see `SkyPoint`).
//! - A cap stores `cm = 1 − cos(radius)`. A negative `cm` (sign bit set) marks
//!   the complement cap of radius `|cm|`.
//! - Membership is strict (`d < cm`, `d > |cm|`), except that `cm >= 2` covers
//!   the entire sphere including the antipode of the axis.
//!
//! Code cross-refs: `crate::pixel` (bounding extents), `crate::mask` (queries).

mod cap;
pub(crate) mod cfg;
mod point;
mod polygon;

pub use cap::{Cap, GeomError};
pub use point::SkyPoint;
pub use polygon::Polygon;

pub(crate) use point::CapFrame;

#[cfg(test)]
mod tests;
