//! Polygon-file serialization: loader and writer.
//!
//! Format (whitespace separated, one record per line)
//! ```text
//! 2 polygons
//! pixelization 1s
//! snapped
//! balkanized
//! polygon 0 ( 1 caps, 0.2 weight, 1 pixel, 0.0239 str):
//!  0.0000000000 0.8660254038 0.5000000000 0.0038053019
//! polygon 1 ( 1 caps, 0.8 weight, 4 pixel, 0.0239 str):
//!  -0.0000000000 -0.8660254038 -0.5000000000 0.0038053019
//! ```
//! - Header directives precede the first `polygon` record; `real <n>` is
//!   accepted and ignored, unknown directives are logged and skipped.
//! - Record fields in parentheses are `<value> <label>` pairs; `caps` and
//!   `weight` are required, `pixel` and `str` (area in steradians) optional.
//! - Cap lines are `x y z cm`; negative `cm` marks a complement cap.
//! - Blank lines and `#` comments are ignored.

mod error;
mod parse;
mod write;

pub use error::LoadError;
pub use parse::{load_path, load_reader, load_str, LoadCfg};
pub use write::{to_text, write_mask};

#[cfg(test)]
mod tests;
