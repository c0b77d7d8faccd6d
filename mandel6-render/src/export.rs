//! PNG export with embedded view metadata (tEXt chunks).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use mandel6_core::{CenterTable, EvalParams, Viewport};

use crate::buffer::RenderBuffer;
use crate::color::ColorParams;
use crate::error::RenderError;

const SOFTWARE: &str = "mandel6";

/// Metadata to embed in an exported PNG as tEXt chunks.
#[derive(Debug, Clone)]
pub struct ExportMetadata {
    pub center_re: f64,
    pub center_im: f64,
    pub zoom: f64,
    pub max_iterations: u32,
    pub color_cycles: f64,
    /// `re,im,scale` per center, `;`-separated.
    pub centers: String,
}

impl ExportMetadata {
    pub fn from_view(
        viewport: &Viewport,
        centers: &CenterTable,
        params: &EvalParams,
        colors: &ColorParams,
    ) -> Self {
        let centers = centers
            .iter()
            .map(|c| format!("{},{},{}", c.position().re, c.position().im, c.scale()))
            .collect::<Vec<_>>()
            .join(";");
        Self {
            center_re: viewport.center.re,
            center_im: viewport.center.im,
            zoom: viewport.zoom,
            max_iterations: params.max_iterations,
            color_cycles: colors.color_cycles,
            centers,
        }
    }

    fn description(&self) -> String {
        format!(
            "Center: {} {}i, Zoom: {}, Iterations: {}",
            self.center_re, self.center_im, self.zoom, self.max_iterations,
        )
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mandel6.CenterRe", self.center_re.to_string()),
            ("mandel6.CenterIm", self.center_im.to_string()),
            ("mandel6.Zoom", self.zoom.to_string()),
            ("mandel6.MaxIterations", self.max_iterations.to_string()),
            ("mandel6.ColorCycles", self.color_cycles.to_string()),
            ("mandel6.Centers", self.centers.clone()),
        ]
    }
}

/// Encode `buffer` as PNG into any writer.
pub fn write_png<W: Write>(
    writer: W,
    buffer: &RenderBuffer,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let expected = buffer.width as usize * buffer.height as usize * 4;
    if buffer.pixels.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: buffer.pixels.len(),
        });
    }
    if buffer.width == 0 || buffer.height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: buffer.width,
            height: buffer.height,
        });
    }

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), SOFTWARE.to_string())?;
    encoder.add_text_chunk("Description".to_string(), metadata.description())?;
    for (key, value) in metadata.pairs() {
        encoder.add_text_chunk(key.to_string(), value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;
    Ok(())
}

/// Write `buffer` to `path` as a PNG with embedded metadata.
pub fn export_png(path: &Path, buffer: &RenderBuffer, metadata: &ExportMetadata) -> crate::Result<()> {
    let file = File::create(path)?;
    write_png(BufWriter::new(file), buffer, metadata)?;
    debug!(
        width = buffer.width,
        height = buffer.height,
        path = %path.display(),
        "Exported PNG"
    );
    Ok(())
}
