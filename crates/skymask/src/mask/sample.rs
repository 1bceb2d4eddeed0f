//! Random points drawn from a mask, accepted with probability = weight.
//!
//! Model
//! - Draw uniformly on the sphere (or an RA/Dec box: uniform in RA and in
//!   `sin(dec)`), resolve the point, and keep it iff it lands in a polygon and
//!   `u < weight` for a fresh uniform `u` (weights ≥ 1 are always kept).
//! - Draws stop with an error once the attempt budget is spent, so an empty
//!   or zero-weight mask cannot loop forever.

use std::fmt;

use rand::Rng;

use crate::geom::SkyPoint;

use super::types::Mask;

/// Sampling configuration.
#[derive(Clone, Copy, Debug)]
pub struct SampleCfg {
    /// Total draws allowed per requested point before giving up.
    pub attempts_per_point: u64,
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            attempts_per_point: 1_000_000,
        }
    }
}

/// Errors surfaced by mask sampling.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleError {
    /// RA/Dec box outside `[0, 360] × [-90, 90]` or with `min >= max`.
    Range { reason: String },
    /// No polygon carries positive weight.
    EmptyMask,
    /// The attempt budget ran out.
    Exhausted { accepted: usize, requested: usize, attempts: u64 },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Range { reason } => write!(f, "invalid sampling range: {reason}"),
            SampleError::EmptyMask => write!(f, "mask has no polygon with positive weight"),
            SampleError::Exhausted {
                accepted,
                requested,
                attempts,
            } => write!(
                f,
                "accepted {accepted}/{requested} points after {attempts} draws"
            ),
        }
    }
}

impl std::error::Error for SampleError {}

/// Sampling window: RA in degrees, `z = sin(dec)`.
#[derive(Clone, Copy, Debug)]
struct Window {
    ra: (f64, f64),
    z: (f64, f64),
}

impl Window {
    const ALL_SKY: Window = Window {
        ra: (0.0, 360.0),
        z: (-1.0, 1.0),
    };

    fn new(ra_min: f64, ra_max: f64, dec_min: f64, dec_max: f64) -> Result<Self, SampleError> {
        let range = |reason: &str| SampleError::Range {
            reason: reason.to_string(),
        };
        if !(0.0..=360.0).contains(&ra_min) || !(0.0..=360.0).contains(&ra_max) {
            return Err(range("ra must lie in [0, 360]"));
        }
        if !(-90.0..=90.0).contains(&dec_min) || !(-90.0..=90.0).contains(&dec_max) {
            return Err(range("dec must lie in [-90, 90]"));
        }
        if ra_min >= ra_max {
            return Err(range("ra_min must be less than ra_max"));
        }
        if dec_min >= dec_max {
            return Err(range("dec_min must be less than dec_max"));
        }
        Ok(Self {
            ra: (ra_min, ra_max),
            z: (dec_min.to_radians().sin(), dec_max.to_radians().sin()),
        })
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> SkyPoint {
        let ra = rng.gen_range(self.ra.0..self.ra.1);
        let z: f64 = rng.gen_range(self.z.0..self.z.1);
        SkyPoint::from_radec(ra, z.clamp(-1.0, 1.0).asin().to_degrees())
    }
}

impl Mask {
    /// `n` weighted-random points anywhere in the mask.
    pub fn genrand<R: Rng>(&self, n: usize, rng: &mut R) -> Result<(Vec<f64>, Vec<f64>), SampleError> {
        self.sample_window(n, Window::ALL_SKY, SampleCfg::default(), rng)
    }

    /// `n` weighted-random points inside an RA/Dec box (degrees).
    pub fn genrand_range<R: Rng>(
        &self,
        n: usize,
        ra_min: f64,
        ra_max: f64,
        dec_min: f64,
        dec_max: f64,
        rng: &mut R,
    ) -> Result<(Vec<f64>, Vec<f64>), SampleError> {
        let window = Window::new(ra_min, ra_max, dec_min, dec_max)?;
        self.sample_window(n, window, SampleCfg::default(), rng)
    }

    /// `genrand_range` with an explicit attempt budget; `None` box means all sky.
    pub fn genrand_with<R: Rng>(
        &self,
        n: usize,
        radec_box: Option<[f64; 4]>,
        cfg: SampleCfg,
        rng: &mut R,
    ) -> Result<(Vec<f64>, Vec<f64>), SampleError> {
        let window = match radec_box {
            Some([ra_min, ra_max, dec_min, dec_max]) => {
                Window::new(ra_min, ra_max, dec_min, dec_max)?
            }
            None => Window::ALL_SKY,
        };
        self.sample_window(n, window, cfg, rng)
    }

    /// Draw `samples` uniform points and count those claimed by more than
    /// one polygon. A balkanized mask should report zero.
    pub fn count_overlaps<R: Rng>(&self, samples: usize, rng: &mut R) -> usize {
        let overlaps = (0..samples)
            .filter(|_| self.matches(&Window::ALL_SKY.draw(rng)).len() > 1)
            .count();
        if overlaps > 0 && self.is_balkanized() {
            tracing::warn!(overlaps, samples, "balkanized mask has overlapping polygons");
        }
        overlaps
    }

    fn sample_window<R: Rng>(
        &self,
        n: usize,
        window: Window,
        cfg: SampleCfg,
        rng: &mut R,
    ) -> Result<(Vec<f64>, Vec<f64>), SampleError> {
        if n == 0 {
            return Ok((Vec::new(), Vec::new()));
        }
        if !self.polygons().iter().any(|p| p.weight() > 0.0) {
            return Err(SampleError::EmptyMask);
        }
        let budget = cfg.attempts_per_point.saturating_mul(n as u64);
        let mut ra = Vec::with_capacity(n);
        let mut dec = Vec::with_capacity(n);
        let mut attempts = 0u64;
        while ra.len() < n {
            if attempts >= budget {
                return Err(SampleError::Exhausted {
                    accepted: ra.len(),
                    requested: n,
                    attempts,
                });
            }
            attempts += 1;
            let p = window.draw(rng);
            let Some(hit) = self.resolve(&p) else {
                continue;
            };
            if hit.weight >= 1.0 || rng.gen::<f64>() < hit.weight {
                ra.push(p.ra);
                dec.push(p.dec);
            }
        }
        tracing::debug!(n, attempts, "sampled mask points");
        Ok((ra, dec))
    }
}
