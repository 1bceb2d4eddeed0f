use std::fmt;

use crate::geom::{Polygon, SkyPoint};

use super::cover::cap_coverage;
use super::scheme::Pixelization;
use super::simple;

/// Where polygons are filed when building an index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelAssignment {
    /// Use each polygon's recorded pixel number; polygons without one are
    /// filed by coverage.
    #[default]
    Declared,
    /// Ignore recorded numbers and file every polygon by the extent of its
    /// bounding cap.
    Coverage,
}

/// A recorded pixel number that does not belong to the index resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelError {
    /// Position of the polygon in the mask.
    pub polygon: usize,
    pub pixel: u64,
    pub res: u32,
}

impl fmt::Display for PixelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "polygon {}: pixel {} is not a simple pixel at resolution <= {}",
            self.polygon, self.pixel, self.res
        )
    }
}

impl std::error::Error for PixelError {}

/// Most pixels one polygon is filed under; larger polygons go to the
/// everywhere list instead.
pub const MAX_FILED_PIXELS: u64 = 1 << 16;

/// Pixel → polygon buckets in compressed sparse rows.
///
/// Invariants:
/// - `pixels` is strictly increasing; bucket `i` is
///   `members[offsets[i]..offsets[i + 1]]`, ascending (mask order).
/// - `everywhere` holds polygons that would span more than half the pixels
///   or more than `MAX_FILED_PIXELS` (or have no bounding cap); they are
///   candidates for every point.
/// - Unpixelized: no buckets, every query scans `0..npoly`.
#[derive(Clone, Debug, Default)]
pub struct PixelIndex {
    pixelization: Pixelization,
    npoly: usize,
    pixels: Vec<u64>,
    offsets: Vec<usize>,
    members: Vec<u32>,
    everywhere: Vec<u32>,
}

impl PixelIndex {
    /// Index that hands out every polygon for every point.
    pub fn unpixelized(npoly: usize) -> Self {
        Self {
            npoly,
            ..Self::default()
        }
    }

    /// File `polys` under `pixelization`.
    ///
    /// Recorded pixels of a coarser resolution are expanded to all nested
    /// pixels at the index resolution. Fails on recorded numbers finer than
    /// the index resolution.
    pub fn build(
        polys: &[Polygon],
        pixelization: Pixelization,
        assignment: PixelAssignment,
    ) -> Result<Self, PixelError> {
        let Some(res) = pixelization.resolution() else {
            return Ok(Self::unpixelized(polys.len()));
        };
        let npix = 1u64 << (2 * res);
        let budget = (npix / 2).min(MAX_FILED_PIXELS);
        let mut pairs: Vec<(u64, u32)> = Vec::new();
        let mut everywhere: Vec<u32> = Vec::new();

        for (k, poly) in polys.iter().enumerate() {
            let idx = k as u32;
            match (assignment, poly.pixel()) {
                (PixelAssignment::Declared, Some(pix)) => {
                    let err = || PixelError {
                        polygon: k,
                        pixel: pix,
                        res,
                    };
                    let (pres, _, _) = simple::decompose(pix, res).ok_or_else(err)?;
                    let count = 1u64 << (2 * (res - pres));
                    if count > budget {
                        everywhere.push(idx);
                    } else {
                        let nested = simple::descendants(pix, res).ok_or_else(err)?;
                        pairs.extend(nested.into_iter().map(|p| (p, idx)));
                    }
                }
                _ => match poly.bounding_cap().map(|cap| cap_coverage(cap, res)) {
                    Some(cov) if cov.len() <= budget => {
                        pairs.extend(cov.pixels().map(|p| (p, idx)));
                    }
                    _ => everywhere.push(idx),
                },
            }
        }

        // stable: keeps mask order inside each pixel
        pairs.sort_by_key(|&(pix, _)| pix);
        pairs.dedup();

        let mut pixels = Vec::new();
        let mut offsets = Vec::new();
        let mut members = Vec::with_capacity(pairs.len());
        for (pix, idx) in pairs {
            if pixels.last() != Some(&pix) {
                pixels.push(pix);
                offsets.push(members.len());
            }
            members.push(idx);
        }
        offsets.push(members.len());

        tracing::debug!(
            res,
            buckets = pixels.len(),
            filed = members.len(),
            everywhere = everywhere.len(),
            "built pixel index"
        );

        Ok(Self {
            pixelization,
            npoly: polys.len(),
            pixels,
            offsets,
            members,
            everywhere,
        })
    }

    #[inline]
    pub fn pixelization(&self) -> Pixelization {
        self.pixelization
    }

    /// Number of non-empty buckets.
    #[inline]
    pub fn num_buckets(&self) -> usize {
        self.pixels.len()
    }

    /// Largest pixel number holding at least one polygon.
    #[inline]
    pub fn max_pixel(&self) -> Option<u64> {
        self.pixels.last().copied()
    }

    /// Polygons filed under exactly `pixel` (mask order).
    pub fn bucket(&self, pixel: u64) -> &[u32] {
        match self.pixels.binary_search(&pixel) {
            Ok(i) => &self.members[self.offsets[i]..self.offsets[i + 1]],
            Err(_) => &[],
        }
    }

    /// Polygons that are candidates for every point (mask order).
    #[inline]
    pub fn everywhere(&self) -> &[u32] {
        &self.everywhere
    }

    /// Polygon positions to test for `p`, ascending.
    #[inline]
    pub fn candidates(&self, p: &SkyPoint) -> Candidates<'_> {
        if !self.pixelization.is_pixelized() {
            return Candidates::All(0..self.npoly);
        }
        let bucket = match self.pixelization.pixel_of(p) {
            Some(pix) => self.bucket(pix),
            None => &[],
        };
        Candidates::Merge {
            bucket,
            everywhere: &self.everywhere,
        }
    }
}

/// Ascending polygon positions for one query.
#[derive(Clone, Debug)]
pub enum Candidates<'a> {
    /// Full scan.
    All(std::ops::Range<usize>),
    /// Ordered merge of a bucket with the everywhere list.
    Merge {
        bucket: &'a [u32],
        everywhere: &'a [u32],
    },
}

impl<'a> Iterator for Candidates<'a> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        match self {
            Candidates::All(range) => range.next(),
            Candidates::Merge { bucket, everywhere } => {
                let from_bucket = match (bucket.first(), everywhere.first()) {
                    (Some(a), Some(b)) => a < b,
                    (Some(_), None) => true,
                    (None, Some(_)) => false,
                    (None, None) => return None,
                };
                let src: &mut &'a [u32] = if from_bucket { bucket } else { everywhere };
                let slice: &'a [u32] = *src;
                let (&head, rest) = slice.split_first()?;
                *src = rest;
                Some(head as usize)
            }
        }
    }
}
