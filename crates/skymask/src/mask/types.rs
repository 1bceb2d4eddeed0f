use crate::geom::Polygon;
use crate::pixel::{PixelAssignment, PixelError, PixelIndex, Pixelization};

/// Build-time guarantees recorded in the mask header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaskTraits {
    /// Cap boundaries were cleaned of near-degenerate artifacts.
    pub snapped: bool,
    /// Polygons are pairwise non-overlapping.
    pub balkanized: bool,
}

/// Immutable polygon mask.
#[derive(Clone, Debug)]
pub struct Mask {
    filename: String,
    polygons: Vec<Polygon>,
    index: PixelIndex,
    traits: MaskTraits,
    area: f64,
}

/// Read-only snapshot of the mask-level properties.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskProperties {
    pub filename: String,
    pub area: f64,
    pub npoly: usize,
    pub is_pixelized: bool,
    pub pixel_scheme: char,
    pub pixel_resolution: Option<u32>,
    pub max_pixel: Option<u64>,
    pub is_snapped: bool,
    pub is_balkanized: bool,
}

impl Mask {
    /// Assemble a mask and index it under `pixelization`.
    pub fn new(
        filename: impl Into<String>,
        polygons: Vec<Polygon>,
        pixelization: Pixelization,
        traits: MaskTraits,
        assignment: PixelAssignment,
    ) -> Result<Self, PixelError> {
        let index = PixelIndex::build(&polygons, pixelization, assignment)?;
        let area = polygons.iter().map(Polygon::area).sum();
        Ok(Self {
            filename: filename.into(),
            polygons,
            index,
            traits,
            area,
        })
    }

    /// Unpixelized mask (full scan per query).
    pub fn unindexed(filename: impl Into<String>, polygons: Vec<Polygon>, traits: MaskTraits) -> Self {
        let index = PixelIndex::unpixelized(polygons.len());
        let area = polygons.iter().map(Polygon::area).sum();
        Self {
            filename: filename.into(),
            polygons,
            index,
            traits,
            area,
        }
    }

    /// A new mask with the same polygons indexed under `pixelization`.
    ///
    /// Recorded pixel numbers are only trusted when the resolution is
    /// unchanged; otherwise polygons are filed by coverage.
    pub fn with_pixelization(&self, pixelization: Pixelization) -> Result<Mask, PixelError> {
        let assignment = if pixelization == self.pixelization() {
            PixelAssignment::Declared
        } else {
            PixelAssignment::Coverage
        };
        Mask::new(
            self.filename.clone(),
            self.polygons.clone(),
            pixelization,
            self.traits,
            assignment,
        )
    }

    /// The same mask without an index.
    pub fn unpixelized(&self) -> Mask {
        Mask::unindexed(self.filename.clone(), self.polygons.clone(), self.traits)
    }

    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }
    /// Sum of polygon areas (steradians).
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }
    #[inline]
    pub fn npoly(&self) -> usize {
        self.polygons.len()
    }
    #[inline]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
    #[inline]
    pub fn polygon(&self, index: usize) -> Option<&Polygon> {
        self.polygons.get(index)
    }
    #[inline]
    pub fn index(&self) -> &PixelIndex {
        &self.index
    }
    #[inline]
    pub fn traits(&self) -> MaskTraits {
        self.traits
    }
    #[inline]
    pub fn pixelization(&self) -> Pixelization {
        self.index.pixelization()
    }
    #[inline]
    pub fn is_pixelized(&self) -> bool {
        self.pixelization().is_pixelized()
    }
    /// `'u'` when unpixelized, `'s'` for the simple scheme.
    #[inline]
    pub fn pixel_scheme(&self) -> char {
        self.pixelization().scheme_id()
    }
    #[inline]
    pub fn pixel_resolution(&self) -> Option<u32> {
        self.pixelization().resolution()
    }
    #[inline]
    pub fn max_pixel(&self) -> Option<u64> {
        self.index.max_pixel()
    }
    #[inline]
    pub fn is_snapped(&self) -> bool {
        self.traits.snapped
    }
    #[inline]
    pub fn is_balkanized(&self) -> bool {
        self.traits.balkanized
    }

    pub fn weights(&self) -> Vec<f64> {
        self.polygons.iter().map(Polygon::weight).collect()
    }

    pub fn areas(&self) -> Vec<f64> {
        self.polygons.iter().map(Polygon::area).collect()
    }

    pub fn properties(&self) -> MaskProperties {
        MaskProperties {
            filename: self.filename.clone(),
            area: self.area,
            npoly: self.npoly(),
            is_pixelized: self.is_pixelized(),
            pixel_scheme: self.pixel_scheme(),
            pixel_resolution: self.pixel_resolution(),
            max_pixel: self.max_pixel(),
            is_snapped: self.is_snapped(),
            is_balkanized: self.is_balkanized(),
        }
    }
}
