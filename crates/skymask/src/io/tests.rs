use super::*;
use crate::geom::{Cap, Polygon};
use crate::mask::{Mask, MaskTraits, NO_POLYGON};
use crate::pixel::{PixelAssignment, PixelError, Pixelization, SchemeError};
use std::io::Write as _;

const TWO_DISCS: &str = "\
2 polygons
pixelization 1s
snapped
balkanized
polygon 0 ( 1 caps, 0.2 weight, 1 pixel, 0.0239 str):
 0.0000000000 0.8660254038 0.5000000000 0.0038053019
polygon 1 ( 1 caps, 0.8 weight, 4 pixel, 0.0239 str):
 -0.0000000000 -0.8660254038 -0.5000000000 0.0038053019
";

fn load(text: &str) -> Result<Mask, LoadError> {
    load_str(text, &LoadCfg::default())
}

#[test]
fn loads_pixelized_file() {
    let mask = load(TWO_DISCS).unwrap();
    assert_eq!(mask.npoly(), 2);
    assert_eq!(mask.pixelization(), Pixelization::Simple { res: 1 });
    assert!(mask.is_snapped());
    assert!(mask.is_balkanized());
    assert_eq!(mask.max_pixel(), Some(4));
    assert_eq!(mask.index().bucket(1), &[0]);
    assert_eq!(mask.index().bucket(4), &[1]);
    assert!((mask.area() - 0.0478).abs() < 1e-12);
    assert_eq!(mask.polygon(1).unwrap().pixel(), Some(4));

    let ra = [90.0, 270.0, 90.0, 0.0];
    let dec = [30.0, -30.0, -30.0, 0.0];
    let (ids, weights) = mask.polyid_and_weight(&ra, &dec).unwrap();
    assert_eq!(ids, vec![0, 1, NO_POLYGON, NO_POLYGON]);
    assert_eq!(weights, vec![0.2, 0.8, 0.0, 0.0]);
    assert_eq!(mask.unpixelized().polyid(&ra, &dec).unwrap(), ids);
}

#[test]
fn comments_and_unknown_directives_are_skipped() {
    let text = "\
# generated by hand
2 polygons

real 10
colour blue
pixelization 1s
polygon 0 ( 1 caps, 0.2 weight, 1 pixel, 0.0239 str):
 # a comment between cap lines
 0.0000000000 0.8660254038 0.5000000000 0.0038053019
polygon 1 ( 1 caps, 0.8 weight, 4 pixel, 0.0239 str):
 -0.0000000000 -0.8660254038 -0.5000000000 0.0038053019
";
    let mask = load(text).unwrap();
    assert_eq!(mask.npoly(), 2);
    assert!(!mask.is_snapped());
    assert!(!mask.is_balkanized());
}

#[test]
fn missing_area_is_estimated() {
    let text = "\
1 polygons
polygon 7 ( 1 caps, 1 weight):
 0 0 1 0.5
";
    let mask = load(text).unwrap();
    let poly = mask.polygon(0).unwrap();
    assert_eq!(poly.id(), 7);
    assert_eq!(poly.pixel(), None);
    assert!(!mask.is_pixelized());
    let exact = Cap::new(nalgebra::Vector3::z(), 0.5).unwrap().area();
    assert!((poly.area() - exact).abs() < 1e-12);
}

#[test]
fn coarse_declared_pixel_is_expanded() {
    let text = "\
1 polygons
pixelization 2s
polygon 0 ( 1 caps, 1 weight, 1 pixel, 0.0239 str):
 0.0000000000 0.8660254038 0.5000000000 0.0038053019
";
    let mask = load(text).unwrap();
    for pix in [5, 6, 9, 10] {
        assert_eq!(mask.index().bucket(pix), &[0], "pixel {pix}");
    }
    assert!(mask.index().bucket(7).is_empty());
    assert_eq!(mask.polyid(&[90.0], &[30.0]).unwrap(), vec![0]);
}

#[test]
fn complement_cap_carves_a_hole() {
    let text = "\
1 polygon
polygon 3 ( 2 caps, 1 weight):
 0 0 1 1
 0 0 1 -0.1
";
    let mask = load(text).unwrap();
    // northern hemisphere minus a polar cap
    assert_eq!(mask.polyid(&[0.0, 0.0, 0.0], &[89.0, 30.0, -30.0]).unwrap(), vec![-1, 3, -1]);
}

#[test]
fn header_errors() {
    assert!(matches!(load(""), Err(LoadError::MissingHeader)));
    assert!(matches!(load("# nothing\n"), Err(LoadError::MissingHeader)));
    assert!(matches!(
        load("polygon 0 ( 1 caps, 1 weight):\n 0 0 1 1\n"),
        Err(LoadError::MissingHeader)
    ));
    assert!(matches!(
        load("1 polygons\npixelization 9d\n"),
        Err(LoadError::Scheme {
            line: 2,
            source: SchemeError::Unknown('d')
        })
    ));
    assert!(matches!(
        load("1 polygons\npixelization\n"),
        Err(LoadError::Syntax { line: 2, .. })
    ));
}

#[test]
fn polygon_count_must_match() {
    let one = "polygon 0 ( 1 caps, 1 weight):\n 0 0 1 1\n";
    assert!(matches!(
        load(&format!("2 polygons\n{one}")),
        Err(LoadError::PolygonCount { declared: 2, found: 1 })
    ));
    assert!(matches!(
        load(&format!("1 polygons\n{one}{one}")),
        Err(LoadError::PolygonCount { declared: 1, found: 2 })
    ));
    assert!(matches!(load("0 polygons\n"), Ok(m) if m.npoly() == 0));
}

#[test]
fn huge_declared_counts_are_errors() {
    assert!(matches!(
        load("18446744073709551615 polygons\n"),
        Err(LoadError::PolygonCount { declared: usize::MAX, found: 0 })
    ));
    let text = "1 polygons\npolygon 0 ( 4000000000000000000 caps, 1 weight):\n 0 0 1 1\n";
    assert!(matches!(
        load(text),
        Err(LoadError::CapCount { polygon: 0, declared: 4_000_000_000_000_000_000, found: 1 })
    ));
}

#[test]
fn cap_count_must_match() {
    let short = "\
2 polygons
polygon 0 ( 2 caps, 1 weight):
 0 0 1 1
polygon 1 ( 1 caps, 1 weight):
 0 0 1 1
";
    assert!(matches!(
        load(short),
        Err(LoadError::CapCount { polygon: 0, declared: 2, found: 1 })
    ));
    let long = "\
1 polygons
polygon 0 ( 1 caps, 1 weight):
 0 0 1 1
 0 0 -1 1
";
    assert!(matches!(
        load(long),
        Err(LoadError::CapCount { polygon: 0, declared: 1, found: 2 })
    ));
}

#[test]
fn cap_values_are_validated() {
    let range = "\
2 polygons
polygon 0 ( 1 caps, 1 weight):
 0 0 1 1
polygon 1 ( 2 caps, 1 weight):
 0 0 1 1
 1 0 0 2.5
";
    match load(range) {
        Err(LoadError::CapRange { polygon, cap, cm }) => {
            assert_eq!((polygon, cap), (1, 1));
            assert_eq!(cm, 2.5);
        }
        other => panic!("expected CapRange, got {other:?}"),
    }
    let direction = "1 polygons\npolygon 0 ( 1 caps, 1 weight):\n 0 0 2 1\n";
    assert!(matches!(
        load(direction),
        Err(LoadError::Direction { polygon: 0, cap: 0, .. })
    ));
    let loose = LoadCfg {
        norm_tol: 1.5,
        ..LoadCfg::default()
    };
    assert!(load_str(direction, &loose).is_ok());
}

#[test]
fn record_syntax_errors() {
    let cases = [
        ("1 polygons\npolygon 0 ( 1 caps):\n 0 0 1 1\n", 2),
        ("1 polygons\npolygon x ( 1 caps, 1 weight):\n 0 0 1 1\n", 2),
        ("1 polygons\npolygon 0 ( 1 caps, 1 weight, 3 colours):\n 0 0 1 1\n", 2),
        ("1 polygons\npolygon 0 ( 1 caps, 1 weight, 3):\n 0 0 1 1\n", 2),
        ("1 polygons\npolygon 0 ( 1 caps, nan weight):\n 0 0 1 1\n", 2),
        ("1 polygons\npolygon 0 ( 1 caps, 1 weight):\n 0 0 1\n", 3),
        ("1 polygons\npolygon 0 ( 1 caps, 1 weight):\n 0 0 one 1\n", 3),
        ("1 polygons\npolygon 0 ( 1 caps, 1 weight):\n 0 0 1 1\nstray\n", 4),
    ];
    for (text, expected) in cases {
        match load(text) {
            Err(LoadError::Syntax { line, .. }) => assert_eq!(line, expected, "{text}"),
            other => panic!("expected syntax error for {text:?}, got {other:?}"),
        }
    }
}

#[test]
fn declared_pixel_finer_than_mask_is_rejected() {
    let text = "\
1 polygons
pixelization 1s
polygon 0 ( 1 caps, 1 weight, 12 pixel, 0.0239 str):
 0.0000000000 0.8660254038 0.5000000000 0.0038053019
";
    assert!(matches!(
        load(text),
        Err(LoadError::Pixel(PixelError { polygon: 0, pixel: 12, res: 1 }))
    ));
    let by_coverage = LoadCfg {
        pixel_assignment: PixelAssignment::Coverage,
        ..LoadCfg::default()
    };
    assert_eq!(load_str(text, &by_coverage).unwrap().polyid(&[90.0], &[30.0]).unwrap(), vec![0]);
}

#[test]
fn written_mask_loads_back_identically() {
    let polys = vec![
        Polygon::new(5, vec![Cap::around(12.5, -40.0, 7.0).unwrap()], 0.25).with_pixel(2),
        Polygon::new(
            6,
            vec![
                Cap::around(200.0, 10.0, 30.0).unwrap(),
                Cap::around(210.0, 15.0, 5.0).unwrap().complement(),
            ],
            1.0,
        ),
        Polygon::new(8, Vec::new(), 0.0),
    ];
    let traits = MaskTraits {
        snapped: true,
        balkanized: false,
    };
    let mask = Mask::new("orig.ply", polys, Pixelization::Simple { res: 1 }, traits, PixelAssignment::Coverage).unwrap();
    let text = to_text(&mask);
    let back = load(&text).unwrap();
    assert_eq!(back.polygons(), mask.polygons());
    assert_eq!(back.traits(), mask.traits());
    assert_eq!(back.pixelization(), mask.pixelization());
    assert_eq!(to_text(&back), text);
}

#[test]
fn write_mask_and_to_text_agree() {
    let mask = load(TWO_DISCS).unwrap();
    let mut buf = Vec::new();
    write_mask(&mask, &mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), to_text(&mask));
    assert!(to_text(&mask).starts_with("2 polygons\npixelization 1s\nsnapped\nbalkanized\n"));
}

#[test]
fn load_path_reads_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.ply");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(TWO_DISCS.as_bytes()).unwrap();
    drop(f);

    let mask = load_path(&path, &LoadCfg::default()).unwrap();
    assert_eq!(mask.filename(), path.display().to_string());
    assert_eq!(mask.npoly(), 2);

    let missing = dir.path().join("absent.ply");
    match load_path(&missing, &LoadCfg::default()) {
        Err(e @ LoadError::Io { .. }) => {
            assert!(std::error::Error::source(&e).is_some());
            assert!(e.to_string().contains("absent.ply"));
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn load_reader_keeps_filename() {
    let mask = load_reader(TWO_DISCS.as_bytes(), "mem.ply", &LoadCfg::default()).unwrap();
    assert_eq!(mask.filename(), "mem.ply");
    assert_eq!(mask.properties().filename, "mem.ply");
}
