use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use nalgebra::Vector3;

use crate::geom::cfg::{AREA_SAMPLES, NORM_TOL};
use crate::geom::{Cap, GeomError, Polygon};
use crate::mask::{Mask, MaskTraits};
use crate::pixel::{PixelAssignment, Pixelization};

use super::error::LoadError;

/// Loader configuration.
#[derive(Clone, Copy, Debug)]
pub struct LoadCfg {
    /// Accepted deviation of cap axes from unit norm.
    pub norm_tol: f64,
    /// Lattice size for polygons without a recorded area.
    pub area_samples: usize,
    /// How the pixel index files polygons.
    pub pixel_assignment: PixelAssignment,
}

impl Default for LoadCfg {
    fn default() -> Self {
        Self {
            norm_tol: NORM_TOL,
            area_samples: AREA_SAMPLES,
            pixel_assignment: PixelAssignment::Declared,
        }
    }
}

/// Load a polygon file.
pub fn load_path(path: impl AsRef<Path>, cfg: &LoadCfg) -> Result<Mask, LoadError> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: name.clone(),
        source,
    })?;
    load_reader(BufReader::new(file), &name, cfg)
}

/// Load from any reader; `filename` is kept as provenance only.
pub fn load_reader<R: Read>(mut reader: R, filename: &str, cfg: &LoadCfg) -> Result<Mask, LoadError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| LoadError::Io {
            path: filename.to_string(),
            source,
        })?;
    parse(&text, filename, cfg)
}

/// Load from in-memory text.
pub fn load_str(text: &str, cfg: &LoadCfg) -> Result<Mask, LoadError> {
    parse(text, "", cfg)
}

#[derive(Debug, Default)]
struct Header {
    pixelization: Pixelization,
    traits: MaskTraits,
}

#[derive(Debug)]
struct RecordHeader {
    id: i64,
    ncaps: usize,
    weight: f64,
    pixel: Option<u64>,
    area: Option<f64>,
}

fn syntax(line: usize, reason: impl Into<String>) -> LoadError {
    LoadError::Syntax {
        line,
        reason: reason.into(),
    }
}

fn is_record(line: &str) -> bool {
    line.split_whitespace().next() == Some("polygon")
}

fn parse(text: &str, filename: &str, cfg: &LoadCfg) -> Result<Mask, LoadError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .collect();

    let &(_, first) = lines.first().ok_or(LoadError::MissingHeader)?;
    let declared = parse_count(first).ok_or(LoadError::MissingHeader)?;

    let mut cur = 1;
    let mut header = Header::default();
    while let Some(&(no, line)) = lines.get(cur) {
        if is_record(line) {
            break;
        }
        apply_directive(&mut header, no, line)?;
        cur += 1;
    }
    tracing::debug!(
        declared,
        pixelization = %header.pixelization,
        snapped = header.traits.snapped,
        balkanized = header.traits.balkanized,
        "parsed mask header"
    );

    // counts come from the file; reserve no more than the lines present
    let mut polygons: Vec<Polygon> = Vec::with_capacity(declared.min(lines.len()));
    while let Some(&(no, line)) = lines.get(cur) {
        if !is_record(line) {
            return Err(syntax(no, "expected a polygon record"));
        }
        let rec = parse_record(no, line)?;
        let k = polygons.len();
        cur += 1;

        let mut caps = Vec::with_capacity(rec.ncaps.min(lines.len() - cur));
        let mut found = 0usize;
        while let Some(&(no, line)) = lines.get(cur) {
            if is_record(line) {
                break;
            }
            let [x, y, z, cm] = parse_cap_line(no, line)?;
            if found < rec.ncaps {
                caps.push(make_cap(Vector3::new(x, y, z), cm, k, found, no, cfg)?);
            }
            found += 1;
            cur += 1;
        }
        if found != rec.ncaps {
            return Err(LoadError::CapCount {
                polygon: k,
                declared: rec.ncaps,
                found,
            });
        }

        let mut poly = Polygon::recorded(rec.id, caps, rec.weight, rec.area.unwrap_or(0.0));
        if rec.area.is_none() {
            let area = poly.estimate_area(cfg.area_samples);
            tracing::debug!(polygon = k, area, "estimated missing polygon area");
            poly = poly.with_area(area);
        }
        if let Some(pix) = rec.pixel {
            poly = poly.with_pixel(pix);
        }
        polygons.push(poly);
    }

    if polygons.len() != declared {
        return Err(LoadError::PolygonCount {
            declared,
            found: polygons.len(),
        });
    }

    let mask = Mask::new(
        filename,
        polygons,
        header.pixelization,
        header.traits,
        cfg.pixel_assignment,
    )?;
    tracing::info!(
        filename,
        npoly = mask.npoly(),
        area = mask.area(),
        pixelization = %mask.pixelization(),
        snapped = mask.is_snapped(),
        balkanized = mask.is_balkanized(),
        "loaded mask"
    );
    Ok(mask)
}

/// `<n> polygons`
fn parse_count(line: &str) -> Option<usize> {
    let mut toks = line.split_whitespace();
    let n = toks.next()?.parse::<usize>().ok()?;
    match toks.next()? {
        "polygons" | "polygon" => Some(n),
        _ => None,
    }
}

fn apply_directive(header: &mut Header, no: usize, line: &str) -> Result<(), LoadError> {
    let mut toks = line.split_whitespace();
    match toks.next() {
        Some("pixelization") => {
            let value = toks
                .next()
                .ok_or_else(|| syntax(no, "pixelization needs a value such as 9s"))?;
            header.pixelization = value
                .parse()
                .map_err(|source| LoadError::Scheme { line: no, source })?;
        }
        Some("snapped") => header.traits.snapped = true,
        Some("balkanized") => header.traits.balkanized = true,
        Some("real") => {}
        _ => tracing::warn!(line = no, directive = line, "skipping unknown header directive"),
    }
    Ok(())
}

/// `polygon <id> ( <n> caps, <w> weight[, <pix> pixel][, <area> str]):`
fn parse_record(no: usize, line: &str) -> Result<RecordHeader, LoadError> {
    let cleaned: String = line
        .chars()
        .map(|c| if matches!(c, '(' | ')' | ',' | ':') { ' ' } else { c })
        .collect();
    let mut toks = cleaned.split_whitespace().skip(1);
    let id = toks
        .next()
        .and_then(|t| t.parse::<i64>().ok())
        .ok_or_else(|| syntax(no, "missing polygon id"))?;
    let fields: Vec<&str> = toks.collect();
    if fields.len() % 2 != 0 {
        return Err(syntax(no, "record fields must be '<value> <label>' pairs"));
    }

    let mut ncaps = None;
    let mut weight = None;
    let mut pixel = None;
    let mut area = None;
    for pair in fields.chunks(2) {
        let (value, label) = (pair[0], pair[1]);
        let bad = || syntax(no, format!("bad {label} value '{value}'"));
        match label {
            "caps" | "cap" => ncaps = Some(value.parse::<usize>().map_err(|_| bad())?),
            "weight" => {
                let w = value.parse::<f64>().map_err(|_| bad())?;
                if !w.is_finite() {
                    return Err(bad());
                }
                weight = Some(w);
            }
            "pixel" => pixel = Some(value.parse::<u64>().map_err(|_| bad())?),
            "str" => {
                let a = value.parse::<f64>().map_err(|_| bad())?;
                if !(a.is_finite() && a >= 0.0) {
                    return Err(bad());
                }
                area = Some(a);
            }
            other => return Err(syntax(no, format!("unknown record field '{other}'"))),
        }
    }

    Ok(RecordHeader {
        id,
        ncaps: ncaps.ok_or_else(|| syntax(no, "record lacks a cap count"))?,
        weight: weight.ok_or_else(|| syntax(no, "record lacks a weight"))?,
        pixel,
        area,
    })
}

fn parse_cap_line(no: usize, line: &str) -> Result<[f64; 4], LoadError> {
    let vals: Vec<f64> = line
        .split_whitespace()
        .map(|t| t.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| syntax(no, "cap line must hold numbers 'x y z cm'"))?;
    <[f64; 4]>::try_from(vals)
        .map_err(|v| syntax(no, format!("cap line has {} values, expected 4", v.len())))
}

fn make_cap(
    n: Vector3<f64>,
    cm: f64,
    polygon: usize,
    cap: usize,
    no: usize,
    cfg: &LoadCfg,
) -> Result<Cap, LoadError> {
    Cap::with_tol(n, cm, cfg.norm_tol).map_err(|e| match e {
        GeomError::Direction { norm } => LoadError::Direction { polygon, cap, norm },
        GeomError::CapRange { cm } => LoadError::CapRange { polygon, cap, cm },
        other => syntax(no, other.to_string()),
    })
}
