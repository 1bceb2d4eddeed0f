//! Query timing demo for a synthetic survey footprint.
//!
//! Purpose
//! - Build a band-limited footprint (a thick equatorial strip with a few
//!   star holes), write it to text, load it back, and time batch queries with
//!   and without the pixel index.
//!
//! Why this shape
//! - Holes are complement caps inside the strip polygon, so every lookup
//!   exercises multi-cap membership.
//! - The text round trip goes through the same loader a real mask file uses.

use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};
use skymask::prelude::*;

fn main() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut polys = Vec::new();
    for k in 0..36 {
        let ra0 = 10.0 * k as f64;
        // strip between dec -20 and +20, cut into 10-degree RA sectors
        let mut caps = vec![
            Cap::around(0.0, 90.0, 110.0).expect("north edge"),
            Cap::around(0.0, -90.0, 110.0).expect("south edge"),
            Cap::around(ra0 - 90.0, 0.0, 90.0).expect("west edge").complement(),
            Cap::around(ra0 + 10.0 - 90.0, 0.0, 90.0).expect("east edge"),
        ];
        for _ in 0..3 {
            let ra = ra0 + rng.gen_range(1.0..9.0);
            let dec = rng.gen_range(-18.0..18.0);
            caps.push(Cap::around(ra, dec, 0.3).expect("hole").complement());
        }
        polys.push(Polygon::new(k, caps, rng.gen_range(0.5..1.0)));
    }
    let built = Mask::new(
        "footprint",
        polys,
        Pixelization::Simple { res: 5 },
        MaskTraits {
            snapped: true,
            balkanized: true,
        },
        PixelAssignment::Coverage,
    )
    .expect("coverage assignment never fails");

    let text = skymask::io::to_text(&built);
    let mask = load_str(&text, &LoadCfg::default()).expect("round trip");
    println!(
        "npoly={} area={:.4} sr pixelization={}",
        mask.npoly(),
        mask.area(),
        mask.pixelization()
    );

    let (ra, dec): (Vec<f64>, Vec<f64>) = (0..200_000)
        .map(|_| {
            (
                rng.gen_range(0.0..360.0),
                rng.gen_range(-1.0f64..1.0).asin().to_degrees(),
            )
        })
        .unzip();

    let t = Instant::now();
    let indexed = mask.polyid(&ra, &dec).expect("same lengths");
    let t_indexed = t.elapsed().as_secs_f64() * 1e3;

    let plain = mask.unpixelized();
    let t = Instant::now();
    let scanned = plain.polyid(&ra, &dec).expect("same lengths");
    let t_scanned = t.elapsed().as_secs_f64() * 1e3;

    assert_eq!(indexed, scanned);
    let inside = indexed.iter().filter(|&&id| id != NO_POLYGON).count();
    println!(
        "points={} inside={} indexed_ms={:.1} scanned_ms={:.1}",
        ra.len(),
        inside,
        t_indexed,
        t_scanned
    );
}
