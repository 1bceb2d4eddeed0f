use std::fmt;
use std::io;

use crate::pixel::{PixelError, SchemeError};

/// Why a polygon file could not become a mask.
///
/// Record-level variants carry `polygon`, the position of the offending
/// record in the file (0-based).
#[derive(Debug)]
pub enum LoadError {
    /// The source could not be read.
    Io { path: String, source: io::Error },
    /// No `<n> polygons` line before the records.
    MissingHeader,
    /// A line could not be parsed.
    Syntax { line: usize, reason: String },
    /// `pixelization` directive names an unusable scheme.
    Scheme { line: usize, source: SchemeError },
    /// Header count differs from the number of records present.
    PolygonCount { declared: usize, found: usize },
    /// Record's cap count differs from the cap lines that follow it.
    CapCount {
        polygon: usize,
        declared: usize,
        found: usize,
    },
    /// `|cm| > 2`.
    CapRange { polygon: usize, cap: usize, cm: f64 },
    /// Cap axis is not a unit vector within tolerance.
    Direction { polygon: usize, cap: usize, norm: f64 },
    /// Recorded pixel number does not fit the mask pixelization.
    Pixel(PixelError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            LoadError::MissingHeader => write!(f, "missing '<n> polygons' header line"),
            LoadError::Syntax { line, reason } => write!(f, "line {line}: {reason}"),
            LoadError::Scheme { line, source } => write!(f, "line {line}: {source}"),
            LoadError::PolygonCount { declared, found } => write!(
                f,
                "header declares {declared} polygons but {found} were found"
            ),
            LoadError::CapCount {
                polygon,
                declared,
                found,
            } => write!(
                f,
                "polygon {polygon}: declares {declared} caps but {found} were found"
            ),
            LoadError::CapRange { polygon, cap, cm } => {
                write!(f, "polygon {polygon}, cap {cap}: cm {cm} outside [-2, 2]")
            }
            LoadError::Direction { polygon, cap, norm } => write!(
                f,
                "polygon {polygon}, cap {cap}: axis norm {norm} is not 1"
            ),
            LoadError::Pixel(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Scheme { source, .. } => Some(source),
            LoadError::Pixel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PixelError> for LoadError {
    fn from(e: PixelError) -> Self {
        LoadError::Pixel(e)
    }
}
