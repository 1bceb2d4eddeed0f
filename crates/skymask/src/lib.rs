//! Point-membership queries against spherical polygon masks.
//!
//! A mask is an ordered set of polygons on the celestial sphere, each the
//! intersection of spherical caps and carrying a weight. Given (ra, dec) in
//! degrees the engine reports which polygon contains the point, its weight,
//! and whether it is inside the mask at all. A pixel index keeps each query
//! down to the few polygons filed under the point's pixel.
//!
//! Layout
//! - `geom`: caps, polygons, sky points.
//! - `pixel`: pixelization schemes and the polygon index.
//! - `mask`: the immutable mask aggregate, queries, random sampling.
//! - `io`: polygon-file loader and writer.
//! - `api`: the flat surface a host-language binding wraps.

pub mod api;
pub mod geom;
pub mod io;
pub mod mask;
pub mod pixel;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom::{Cap, Polygon, SkyPoint};
pub use io::{load_path, load_str, LoadCfg, LoadError};
pub use mask::{Hit, Mask, QueryError};
pub use pixel::{pixel_number, Pixelization};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom::{Cap, GeomError, Polygon, SkyPoint};
    pub use crate::io::{load_path, load_reader, load_str, write_mask, LoadCfg, LoadError};
    pub use crate::mask::{
        Hit, Mask, MaskProperties, MaskTraits, QueryError, SampleCfg, SampleError, NO_POLYGON,
    };
    pub use crate::pixel::{pixel_number, PixelAssignment, PixelIndex, Pixelization};
    pub use nalgebra::Vector3 as Vec3;
}
