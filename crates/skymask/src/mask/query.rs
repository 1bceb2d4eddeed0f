//! Point resolution: first containing polygon in mask order wins.

use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geom::SkyPoint;
use crate::pixel::SchemeError;

use super::types::Mask;

/// Polygon id reported for points outside every polygon.
pub const NO_POLYGON: i64 = -1;

/// The polygon a point resolved to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Position in the mask.
    pub index: usize,
    /// The polygon's id.
    pub id: i64,
    pub weight: f64,
}

/// Input contract violations; nothing is computed when one is raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    LengthMismatch { ra: usize, dec: usize },
    Scheme(SchemeError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::LengthMismatch { ra, dec } => {
                write!(f, "ra and dec must have the same length ({ra} vs {dec})")
            }
            QueryError::Scheme(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<SchemeError> for QueryError {
    fn from(e: SchemeError) -> Self {
        QueryError::Scheme(e)
    }
}

impl Mask {
    /// Resolve through the pixel index. Non-finite points never match.
    #[inline]
    pub fn resolve(&self, p: &SkyPoint) -> Option<Hit> {
        if !p.is_finite() {
            return None;
        }
        self.first_match(self.index().candidates(p), p)
    }

    /// Resolve by scanning every polygon in mask order.
    pub fn resolve_linear(&self, p: &SkyPoint) -> Option<Hit> {
        if !p.is_finite() {
            return None;
        }
        self.first_match(0..self.npoly(), p)
    }

    /// Scalar convenience for one (ra, dec) in degrees.
    #[inline]
    pub fn locate(&self, ra: f64, dec: f64) -> Option<Hit> {
        self.resolve(&SkyPoint::from_radec(ra, dec))
    }

    /// Positions of every polygon containing `p`, in mask order.
    pub fn matches(&self, p: &SkyPoint) -> Vec<usize> {
        if !p.is_finite() {
            return Vec::new();
        }
        self.polygons()
            .iter()
            .enumerate()
            .filter(|(_, poly)| poly.contains(&p.v))
            .map(|(k, _)| k)
            .collect()
    }

    #[inline]
    fn first_match(&self, candidates: impl Iterator<Item = usize>, p: &SkyPoint) -> Option<Hit> {
        let polys = self.polygons();
        candidates
            .map(|k| (k, &polys[k]))
            .find(|(_, poly)| poly.contains(&p.v))
            .map(|(k, poly)| Hit {
                index: k,
                id: poly.id(),
                weight: poly.weight(),
            })
    }

    /// Polygon id and weight per point; `(-1, 0)` outside the mask.
    pub fn polyid_and_weight(&self, ra: &[f64], dec: &[f64]) -> Result<(Vec<i64>, Vec<f64>), QueryError> {
        let hits = self.resolve_all(ra, dec)?;
        Ok(hits
            .into_iter()
            .map(|h| h.map_or((NO_POLYGON, 0.0), |h| (h.id, h.weight)))
            .unzip())
    }

    /// Polygon id per point; `-1` outside the mask.
    pub fn polyid(&self, ra: &[f64], dec: &[f64]) -> Result<Vec<i64>, QueryError> {
        self.map_points(ra, dec, |h| h.map_or(NO_POLYGON, |h| h.id))
    }

    /// Weight per point; `0` outside the mask.
    pub fn weight(&self, ra: &[f64], dec: &[f64]) -> Result<Vec<f64>, QueryError> {
        self.map_points(ra, dec, |h| h.map_or(0.0, |h| h.weight))
    }

    /// `1` where a polygon contains the point (whatever its weight), else `0`.
    pub fn contains(&self, ra: &[f64], dec: &[f64]) -> Result<Vec<u8>, QueryError> {
        self.map_points(ra, dec, |h| u8::from(h.is_some()))
    }

    fn resolve_all(&self, ra: &[f64], dec: &[f64]) -> Result<Vec<Option<Hit>>, QueryError> {
        self.map_points(ra, dec, |h| h)
    }

    fn map_points<T, F>(&self, ra: &[f64], dec: &[f64], f: F) -> Result<Vec<T>, QueryError>
    where
        T: Send,
        F: Fn(Option<Hit>) -> T + Sync + Send,
    {
        if ra.len() != dec.len() {
            return Err(QueryError::LengthMismatch {
                ra: ra.len(),
                dec: dec.len(),
            });
        }
        let one = |(&r, &d): (&f64, &f64)| f(self.locate(r, d));
        #[cfg(feature = "parallel")]
        let out = ra.par_iter().zip(dec.par_iter()).map(one).collect();
        #[cfg(not(feature = "parallel"))]
        let out = ra.iter().zip(dec.iter()).map(one).collect();
        Ok(out)
    }
}
