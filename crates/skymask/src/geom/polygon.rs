use nalgebra::Vector3;

use super::cap::Cap;
use super::cfg::{AREA_SAMPLES, FOUR_PI};
use super::point::{CapFrame, SkyPoint};

/// Region of the sphere defined as the intersection of its caps.
///
/// Invariants:
/// - An empty cap list denotes the whole sphere.
/// - `id` is what point queries report for this polygon.
/// - `test_order` is a permutation of the caps, smallest area first; it only
///   affects how early a failing point is rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    id: i64,
    caps: Vec<Cap>,
    weight: f64,
    area: f64,
    pixel: Option<u64>,
    test_order: Box<[u32]>,
}

impl Polygon {
    /// New polygon; the area is derived from the caps (exact for 0/1 caps,
    /// lattice estimate otherwise).
    pub fn new(id: i64, caps: Vec<Cap>, weight: f64) -> Self {
        let mut poly = Self::recorded(id, caps, weight, 0.0);
        poly.area = poly.estimate_area(AREA_SAMPLES);
        poly
    }

    /// New polygon carrying an area measured elsewhere (e.g. read from file).
    pub fn recorded(id: i64, caps: Vec<Cap>, weight: f64, area: f64) -> Self {
        let test_order = smallest_first(&caps);
        Self {
            id,
            caps,
            weight,
            area,
            pixel: None,
            test_order,
        }
    }

    /// Replace the derived area with a recorded one.
    #[inline]
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Record the pixel this polygon was filed under at build time.
    #[inline]
    pub fn with_pixel(mut self, pixel: u64) -> Self {
        self.pixel = Some(pixel);
        self
    }

    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }
    #[inline]
    pub fn caps(&self) -> &[Cap] {
        &self.caps
    }
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }
    /// Solid angle in steradians.
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }
    #[inline]
    pub fn pixel(&self) -> Option<u64> {
        self.pixel
    }

    /// True iff every cap contains `p`; stops at the first failing cap.
    #[inline]
    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        self.test_order
            .iter()
            .all(|&k| self.caps[k as usize].contains(p))
    }

    #[inline]
    pub fn contains_point(&self, p: &SkyPoint) -> bool {
        self.contains(&p.v)
    }

    /// Smallest non-complement cap that is not the whole sphere. The polygon
    /// lies inside it; `None` means no cap bounds the polygon.
    pub fn bounding_cap(&self) -> Option<&Cap> {
        self.caps
            .iter()
            .filter(|c| !c.is_complement() && c.cm() < 2.0)
            .min_by(|a, b| a.cm().total_cmp(&b.cm()))
    }

    /// Solid angle estimate.
    ///
    /// Exact for zero or one cap. Otherwise counts a Fibonacci lattice of
    /// `samples` points spread evenly over the bounding cap (or the sphere),
    /// so repeated calls return the same value.
    pub fn estimate_area(&self, samples: usize) -> f64 {
        match self.caps.as_slice() {
            [] => return FOUR_PI,
            [cap] => return cap.area(),
            _ => {}
        }
        let (frame, cm) = match self.bounding_cap() {
            Some(b) => (CapFrame::new(b.axis()), b.cm()),
            None => (CapFrame::new(Vector3::z()), 2.0),
        };
        if cm <= 0.0 || samples == 0 {
            return 0.0;
        }
        let inside = fibonacci_cap(frame, cm, samples)
            .filter(|p| self.contains(p))
            .count();
        2.0 * std::f64::consts::PI * cm * (inside as f64) / (samples as f64)
    }
}

fn smallest_first(caps: &[Cap]) -> Box<[u32]> {
    let mut order: Vec<u32> = (0..caps.len() as u32).collect();
    order.sort_by(|&a, &b| caps[a as usize].area().total_cmp(&caps[b as usize].area()));
    order.into_boxed_slice()
}

/// `n` points evenly spread (equal area) over the cap `1 − z < cm` in `frame`.
fn fibonacci_cap(frame: CapFrame, cm: f64, n: usize) -> impl Iterator<Item = Vector3<f64>> {
    let golden = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    (0..n).map(move |i| {
        let z = 1.0 - cm * (i as f64 + 0.5) / (n as f64);
        frame.at(z, golden * i as f64)
    })
}
