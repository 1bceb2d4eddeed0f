//! Simple-scheme pixel arithmetic (bands in cos θ, sectors in φ).

use std::f64::consts::TAU;

/// First pixel number of resolution `res`: `(4^res − 1) / 3`.
#[inline]
pub(crate) fn offset(res: u32) -> u64 {
    ((1u64 << (2 * res)) - 1) / 3
}

/// Pixels per side at resolution `res`.
#[inline]
pub(crate) fn side(res: u32) -> u64 {
    1u64 << res
}

/// Band index for `cth = cos(theta)`; band 0 touches the north pole.
#[inline]
pub(crate) fn row(res: u32, cth: f64) -> u64 {
    let p2 = side(res);
    if cth >= 1.0 {
        return 0;
    }
    let r = ((1.0 - cth) * 0.5 * p2 as f64).ceil() as u64;
    r.saturating_sub(1).min(p2 - 1)
}

/// Sector index for longitude `phi` in `[0, 2π]`.
#[inline]
pub(crate) fn col(res: u32, phi: f64) -> u64 {
    let p2 = side(res);
    ((phi / TAU * p2 as f64).floor() as u64).min(p2 - 1)
}

#[inline]
pub(crate) fn compose(res: u32, row: u64, col: u64) -> u64 {
    offset(res) + side(res) * row + col
}

/// Pixel number of colatitude `theta` / longitude `phi` (radians).
#[inline]
pub(crate) fn pixel(res: u32, theta: f64, phi: f64) -> u64 {
    compose(res, row(res, theta.cos()), col(res, phi))
}

/// Split a pixel number into `(res, row, col)`; `None` past `max_res`.
pub(crate) fn decompose(pixel: u64, max_res: u32) -> Option<(u32, u64, u64)> {
    let res = (0..=max_res).find(|&r| pixel < offset(r + 1))?;
    let local = pixel - offset(res);
    let p2 = side(res);
    Some((res, local / p2, local % p2))
}

/// Every pixel at `target` resolution nested inside `pixel`.
pub(crate) fn descendants(pixel: u64, target: u32) -> Option<Vec<u64>> {
    let (res, r, c) = decompose(pixel, target)?;
    let k = side(target - res);
    let mut out = Vec::with_capacity((k * k) as usize);
    for rr in r * k..(r + 1) * k {
        for cc in c * k..(c + 1) * k {
            out.push(compose(target, rr, cc));
        }
    }
    Some(out)
}
