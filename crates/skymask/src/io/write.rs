use std::io::{self, Write};

use crate::mask::Mask;
use crate::pixel::Pixelization;

/// Serialize `mask` in the polygon text format read by `load_*`.
///
/// Floats use shortest round-trip formatting, so loading the output yields
/// bit-identical caps, weights and areas.
pub fn write_mask<W: Write>(mask: &Mask, mut w: W) -> io::Result<()> {
    writeln!(w, "{} polygons", mask.npoly())?;
    if let Pixelization::Simple { res } = mask.pixelization() {
        writeln!(w, "pixelization {res}s")?;
    }
    if mask.is_snapped() {
        writeln!(w, "snapped")?;
    }
    if mask.is_balkanized() {
        writeln!(w, "balkanized")?;
    }
    for poly in mask.polygons() {
        write!(
            w,
            "polygon {} ( {} caps, {} weight",
            poly.id(),
            poly.caps().len(),
            poly.weight()
        )?;
        if let Some(pix) = poly.pixel() {
            write!(w, ", {pix} pixel")?;
        }
        writeln!(w, ", {} str):", poly.area())?;
        for cap in poly.caps() {
            let n = cap.axis();
            writeln!(w, " {} {} {} {}", n.x, n.y, n.z, cap.cm())?;
        }
    }
    Ok(())
}

/// `write_mask` into a `String`.
pub fn to_text(mask: &Mask) -> String {
    let mut buf = Vec::new();
    if let Err(e) = write_mask(mask, &mut buf) {
        tracing::error!(error = %e, npoly = mask.npoly(), "serializing mask to memory failed");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
