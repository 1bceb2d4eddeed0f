use super::*;
use nalgebra::{vector, Vector3};
use proptest::prelude::*;
use std::f64::consts::PI;

fn pt(ra: f64, dec: f64) -> Vector3<f64> {
    SkyPoint::from_radec(ra, dec).v
}

#[test]
fn radec_to_vector_axes() {
    let north = pt(0.0, 90.0);
    assert!((north - Vector3::z()).norm() < 1e-12);
    let x = pt(0.0, 0.0);
    assert!((x - Vector3::x()).norm() < 1e-12);
    let y = pt(90.0, 0.0);
    assert!((y - Vector3::y()).norm() < 1e-12);
    let south = pt(123.0, -90.0);
    assert!((south + Vector3::z()).norm() < 1e-12);
}

#[test]
fn vector_to_radec_wraps_ra() {
    let p = SkyPoint::from_vector(vector![0.0, -2.0, 0.0]).unwrap();
    assert!((p.ra - 270.0).abs() < 1e-12);
    assert!(p.dec.abs() < 1e-12);
    assert!(SkyPoint::from_vector(Vector3::zeros()).is_none());
    assert!(SkyPoint::from_vector(vector![f64::NAN, 0.0, 1.0]).is_none());
}

#[test]
fn declination_beyond_pole_folds_over() {
    let p = SkyPoint::from_radec(45.0, 100.0);
    assert_eq!((p.ra, p.dec), (225.0, 80.0));
    assert!((p.v - pt(225.0, 80.0)).norm() < 1e-12);
    let q = SkyPoint::from_radec(120.0, -130.0);
    assert_eq!((q.ra, q.dec), (300.0, -50.0));
    let r = SkyPoint::from_radec(10.0, 270.0);
    assert_eq!((r.ra, r.dec), (10.0, -90.0));
    let s = SkyPoint::from_radec(10.0, 90.0);
    assert_eq!((s.ra, s.dec), (10.0, 90.0));
}

#[test]
fn cap_inside_and_complement() {
    let cap = Cap::around(10.0, 20.0, 5.0).unwrap();
    assert!(cap.contains(&pt(10.0, 20.0)));
    assert!(cap.contains(&pt(10.0, 24.0)));
    assert!(!cap.contains(&pt(10.0, 26.0)));
    let out = cap.complement();
    assert!(out.is_complement());
    assert!(!out.contains(&pt(10.0, 20.0)));
    assert!(out.contains(&pt(10.0, 26.0)));
    assert!((cap.angle() - 5f64.to_radians()).abs() < 1e-9);
}

#[test]
fn whole_sphere_cap_includes_antipode() {
    let cap = Cap::new(Vector3::z(), 2.0).unwrap();
    assert!(cap.contains(&pt(0.0, -90.0)));
    assert!(cap.contains(&pt(200.0, 3.0)));
    assert!(!cap.contains(&vector![f64::NAN, 0.0, 0.0]));
    assert!((cap.area() - 4.0 * PI).abs() < 1e-12);
}

#[test]
fn empty_cap_contains_nothing_not_even_its_axis() {
    let cap = Cap::new(Vector3::z(), 0.0).unwrap();
    assert!(!cap.contains(&Vector3::z()));
    assert!(!cap.contains(&pt(45.0, 89.999)));
    assert_eq!(cap.area(), 0.0);
    // negative zero is the complement: everything but the axis itself
    let all_but_axis = cap.complement();
    assert!(!all_but_axis.contains(&Vector3::z()));
    assert!(all_but_axis.contains(&pt(45.0, 89.999)));
}

#[test]
fn cap_validation() {
    assert!(matches!(
        Cap::new(vector![0.0, 0.0, 1.1], 0.5),
        Err(GeomError::Direction { .. })
    ));
    assert!(matches!(
        Cap::new(Vector3::zeros(), 0.5),
        Err(GeomError::Direction { .. })
    ));
    assert!(matches!(
        Cap::new(Vector3::z(), 2.5),
        Err(GeomError::CapRange { .. })
    ));
    assert!(matches!(
        Cap::new(Vector3::z(), -2.01),
        Err(GeomError::CapRange { .. })
    ));
    assert!(matches!(
        Cap::new(Vector3::z(), f64::NAN),
        Err(GeomError::NonFinite)
    ));
    assert!(matches!(
        Cap::around(0.0, 0.0, 190.0),
        Err(GeomError::Radius { .. })
    ));
    assert!(Cap::new(vector![0.0, 0.0, 1.0 + 1e-8], -1.5).is_ok());
}

#[test]
fn cap_area_closed_form() {
    let hemi = Cap::new(Vector3::z(), 1.0).unwrap();
    assert!((hemi.area() - 2.0 * PI).abs() < 1e-12);
    let small = Cap::new(Vector3::z(), 0.25).unwrap();
    assert!((small.area() + small.complement().area() - 4.0 * PI).abs() < 1e-12);
}

#[test]
fn polygon_is_conjunction_of_caps() {
    // northern hemisphere ∩ {x > 0} half: a quarter sphere
    let north = Cap::new(Vector3::z(), 1.0).unwrap();
    let east = Cap::new(Vector3::x(), 1.0).unwrap();
    let poly = Polygon::new(7, vec![north, east], 0.3);
    assert!(poly.contains(&pt(0.0, 45.0)));
    assert!(!poly.contains(&pt(180.0, 45.0)));
    assert!(!poly.contains(&pt(0.0, -45.0)));
    assert_eq!(poly.id(), 7);
    assert_eq!(poly.weight(), 0.3);
    assert!((poly.area() - PI).abs() < 0.01 * PI);
}

#[test]
fn zero_caps_is_whole_sphere() {
    let poly = Polygon::new(0, Vec::new(), 1.0);
    assert!(poly.contains(&pt(12.0, -80.0)));
    assert!((poly.area() - 4.0 * PI).abs() < 1e-12);
    assert!(poly.bounding_cap().is_none());
}

#[test]
fn bounding_cap_is_smallest_positive() {
    let big = Cap::around(0.0, 0.0, 30.0).unwrap();
    let small = Cap::around(1.0, 1.0, 5.0).unwrap();
    let hole = Cap::around(1.0, 1.0, 1.0).unwrap().complement();
    let poly = Polygon::new(0, vec![big, hole, small], 1.0);
    assert_eq!(poly.bounding_cap(), Some(&small));
    // annulus area: 2π (cm_small − cm_hole)
    let expected = 2.0 * PI * (small.cm() + hole.cm());
    assert!((poly.area() - expected).abs() < 0.02 * expected);
}

#[test]
fn recorded_area_and_pixel_override() {
    let poly = Polygon::new(3, vec![Cap::whole_sphere()], 0.5)
        .with_area(1.25)
        .with_pixel(17);
    assert_eq!(poly.area(), 1.25);
    assert_eq!(poly.pixel(), Some(17));
}

#[test]
fn area_estimate_is_deterministic() {
    let a = Cap::around(40.0, 10.0, 20.0).unwrap();
    let b = Cap::around(50.0, 15.0, 20.0).unwrap();
    let poly = Polygon::new(0, vec![a, b], 1.0);
    assert_eq!(poly.estimate_area(5000), poly.estimate_area(5000));
}

proptest! {
    #[test]
    fn folding_keeps_the_direction(ra in -360.0f64..720.0, dec in -400.0f64..400.0) {
        let p = SkyPoint::from_radec(ra, dec);
        prop_assert!((-90.0..=90.0).contains(&p.dec));
        let (st, ct) = (90.0 - dec).to_radians().sin_cos();
        let (sp, cp) = ra.to_radians().sin_cos();
        let raw = Vector3::new(st * cp, st * sp, ct);
        prop_assert!((p.v - raw).norm() < 1e-9);
    }

    #[test]
    fn membership_is_deterministic(ra in 0.0f64..360.0, dec in -90.0f64..90.0,
                                   cra in 0.0f64..360.0, cdec in -90.0f64..90.0,
                                   r in 0.0f64..180.0) {
        let cap = Cap::around(cra, cdec, r).unwrap();
        let poly = Polygon::new(0, vec![cap, cap.complement().complement()], 1.0);
        let p = SkyPoint::from_radec(ra, dec);
        let first = poly.contains_point(&p);
        for _ in 0..4 {
            prop_assert_eq!(poly.contains_point(&SkyPoint::from_radec(ra, dec)), first);
        }
        prop_assert_eq!(first, cap.contains(&p.v));
    }

    #[test]
    fn cap_and_complement_partition_off_boundary(ra in 0.0f64..360.0, dec in -89.0f64..89.0,
                                                 r in 1.0f64..179.0) {
        let cap = Cap::around(33.0, -12.0, r).unwrap();
        let p = SkyPoint::from_radec(ra, dec).v;
        let d = 1.0 - cap.axis().dot(&p);
        prop_assume!((d - cap.cm()).abs() > 1e-12);
        prop_assert!(cap.contains(&p) ^ cap.complement().contains(&p));
    }
}
