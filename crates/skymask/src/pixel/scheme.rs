use std::fmt;
use std::str::FromStr;

use crate::geom::SkyPoint;
use crate::mask::QueryError;

use super::simple;

/// Highest simple-scheme resolution (pixel numbers stay below 2^62).
pub const MAX_SIMPLE_RES: u32 = 30;

/// Errors for unusable pixelization requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemeError {
    /// Scheme character other than `'u'` / `'s'`.
    Unknown(char),
    /// Resolution outside `0..=MAX_SIMPLE_RES`.
    Resolution { scheme: char, res: i64 },
    /// The scheme has no pixel numbering (`'u'`).
    NoPixels,
    /// Text such as `"9s"` could not be read.
    Syntax(String),
}

impl fmt::Display for SchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeError::Unknown(c) => write!(f, "unrecognized pixelization scheme '{c}'"),
            SchemeError::Resolution { scheme, res } => write!(
                f,
                "resolution {res} out of range for scheme '{scheme}' (0..={MAX_SIMPLE_RES})"
            ),
            SchemeError::NoPixels => write!(f, "unpixelized scheme 'u' has no pixel numbers"),
            SchemeError::Syntax(s) => write!(f, "cannot parse pixelization '{s}'"),
        }
    }
}

impl std::error::Error for SchemeError {}

/// Pixelization scheme and resolution of a mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Pixelization {
    /// No index; queries scan every polygon.
    #[default]
    Unpixelized,
    /// Simple scheme at resolution `res`.
    Simple { res: u32 },
}

impl Pixelization {
    /// From a scheme id and resolution, as found in headers or requested by
    /// callers. `'u'` ignores the resolution.
    pub fn from_parts(scheme: char, res: i64) -> Result<Self, SchemeError> {
        match scheme {
            'u' => Ok(Pixelization::Unpixelized),
            's' => {
                if (0..=MAX_SIMPLE_RES as i64).contains(&res) {
                    Ok(Pixelization::Simple { res: res as u32 })
                } else {
                    Err(SchemeError::Resolution { scheme, res })
                }
            }
            other => Err(SchemeError::Unknown(other)),
        }
    }

    #[inline]
    pub fn scheme_id(&self) -> char {
        match self {
            Pixelization::Unpixelized => 'u',
            Pixelization::Simple { .. } => 's',
        }
    }

    #[inline]
    pub fn resolution(&self) -> Option<u32> {
        match self {
            Pixelization::Unpixelized => None,
            Pixelization::Simple { res } => Some(*res),
        }
    }

    #[inline]
    pub fn is_pixelized(&self) -> bool {
        !matches!(self, Pixelization::Unpixelized)
    }

    /// Pixel numbers valid at this resolution (`None` when unpixelized).
    pub fn pixel_range(&self) -> Option<std::ops::Range<u64>> {
        self.resolution()
            .map(|res| simple::offset(res)..simple::offset(res + 1))
    }

    /// Pixel containing `p`; `None` when unpixelized or `p` is not finite.
    #[inline]
    pub fn pixel_of(&self, p: &SkyPoint) -> Option<u64> {
        match self {
            Pixelization::Unpixelized => None,
            Pixelization::Simple { res } if p.is_finite() => {
                Some(simple::pixel(*res, p.theta(), p.phi()))
            }
            Pixelization::Simple { .. } => None,
        }
    }
}

impl fmt::Display for Pixelization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pixelization::Unpixelized => write!(f, "-1u"),
            Pixelization::Simple { res } => write!(f, "{res}s"),
        }
    }
}

/// Parses header text: `"9s"`, `"0s"`, `"u"`, `"-1u"`.
impl FromStr for Pixelization {
    type Err = SchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let scheme = s
            .chars()
            .last()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| SchemeError::Syntax(s.to_string()))?;
        let digits = &s[..s.len() - scheme.len_utf8()];
        let res = if digits.is_empty() {
            if scheme == 'u' {
                -1
            } else {
                return Err(SchemeError::Syntax(s.to_string()));
            }
        } else {
            digits
                .parse::<i64>()
                .map_err(|_| SchemeError::Syntax(s.to_string()))?
        };
        Pixelization::from_parts(scheme, res)
    }
}

/// Pixel numbers for a batch of coordinates (degrees), independent of any mask.
///
/// Non-finite coordinates map to `-1`.
pub fn pixel_number(ra: &[f64], dec: &[f64], scheme: char, res: i64) -> Result<Vec<i64>, QueryError> {
    if ra.len() != dec.len() {
        return Err(QueryError::LengthMismatch {
            ra: ra.len(),
            dec: dec.len(),
        });
    }
    let pix = Pixelization::from_parts(scheme, res)?;
    if !pix.is_pixelized() {
        return Err(SchemeError::NoPixels.into());
    }
    Ok(ra
        .iter()
        .zip(dec)
        .map(|(&r, &d)| {
            pix.pixel_of(&SkyPoint::from_radec(r, d))
                .map_or(-1, |p| p as i64)
        })
        .collect())
}
