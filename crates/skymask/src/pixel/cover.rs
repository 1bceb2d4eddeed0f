//! Conservative simple-pixel coverage of a cap's angular extent.

use std::f64::consts::{PI, TAU};
use std::ops::RangeInclusive;

use crate::geom::cfg::EXTENT_PAD;
use crate::geom::Cap;

use super::simple;

/// Rows × columns of simple pixels that the cap's extent touches.
///
/// Columns are an unwrapped sector range; numbers past either end wrap
/// around in longitude.
#[derive(Clone, Debug)]
pub(crate) struct Coverage {
    res: u32,
    rows: RangeInclusive<u64>,
    cols: RangeInclusive<i64>,
}

impl Coverage {
    pub fn len(&self) -> u64 {
        let nrows = self.rows.end() - self.rows.start() + 1;
        let ncols = (self.cols.end() - self.cols.start() + 1) as u64;
        nrows.saturating_mul(ncols)
    }

    pub fn pixels(&self) -> impl Iterator<Item = u64> + '_ {
        let p2 = simple::side(self.res) as i64;
        self.rows.clone().flat_map(move |r| {
            self.cols
                .clone()
                .map(move |c| simple::compose(self.res, r, c.rem_euclid(p2) as u64))
        })
    }
}

/// Every pixel at `res` that can hold a point of `cap` (non-complement).
///
/// The colatitude range is `theta0 ± radius`; the longitude half-width is
/// `asin(sin radius / sin theta0)` unless the cap reaches a pole, in which
/// case all sectors of the touched bands are returned. Both ranges are padded
/// by `EXTENT_PAD` so rounding never drops a boundary pixel.
pub(crate) fn cap_coverage(cap: &Cap, res: u32) -> Coverage {
    let a = cap.axis().normalize();
    let theta0 = a.z.clamp(-1.0, 1.0).acos();
    let phi0 = a.y.atan2(a.x).rem_euclid(TAU);
    let radius = cap.angle() + EXTENT_PAD;
    let t_lo = theta0 - radius;
    let t_hi = theta0 + radius;
    let p2 = simple::side(res) as i64;

    let rows = simple::row(res, t_lo.max(0.0).cos())..=simple::row(res, t_hi.min(PI).cos());
    let all_cols = 0..=p2 - 1;
    let cols = if t_lo <= 0.0 || t_hi >= PI {
        all_cols
    } else {
        let ratio = radius.sin() / theta0.sin();
        if ratio >= 1.0 {
            all_cols
        } else {
            let half = ratio.asin() + EXTENT_PAD;
            let scale = p2 as f64 / TAU;
            let lo = ((phi0 - half) * scale).floor() as i64;
            let hi = ((phi0 + half) * scale).floor() as i64;
            if hi - lo + 1 >= p2 {
                all_cols
            } else {
                lo..=hi
            }
        }
    };
    Coverage { res, rows, cols }
}
