//! The mask aggregate and the point-query engine.
//!
//! Purpose
//! - `Mask` owns the ordered polygons, the pixel index, and the global traits
//!   (pixelization, snapped, balkanized). It is immutable once built and can
//!   be shared across threads without locking.
//! - Queries resolve a point to the first polygon, in mask order, that
//!   contains it. For overlapping (non-balkanized) masks the stored order is
//!   the priority; it is never replaced by a weight- or area-based rule.
//!
//! Batch entry points take parallel `ra`/`dec` slices (degrees) and return
//! equal-length outputs; scalar call sites pass one-element slices or use
//! `Mask::locate`.

mod query;
mod sample;
mod types;

pub use query::{Hit, QueryError, NO_POLYGON};
pub use sample::{SampleCfg, SampleError};
pub use types::{Mask, MaskProperties, MaskTraits};
