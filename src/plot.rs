//! Correlation trace plotting.
//!
//! Draws one user's per-bit correlations as a step plot into a PNG. Purely
//! observational: nothing here feeds back into decoding.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tracing::info;

use crate::decider::SoftBit;
use crate::error::{CdmaError, Result};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([170, 170, 170]);
const GRID: Rgb<u8> = Rgb([230, 230, 230]);
const ONE: Rgb<u8> = Rgb([30, 120, 200]);
const ZERO: Rgb<u8> = Rgb([210, 60, 40]);
const MARGIN: u32 = 4;

/// Consumer of a (bit, correlation) trace.
pub trait TraceSink {
    fn consume(&mut self, trace: &[SoftBit]) -> Result<()>;
}

/// Writes the trace as a step plot PNG.
#[derive(Debug, Clone)]
pub struct PngPlot {
    pub path: PathBuf,
    pub px_per_bit: u32,
    pub height: u32,
}

impl PngPlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            px_per_bit: 8,
            height: 256,
        }
    }
}

impl TraceSink for PngPlot {
    fn consume(&mut self, trace: &[SoftBit]) -> Result<()> {
        let img = render_correlation(trace, self.px_per_bit, self.height)?;
        img.save(&self.path)?;
        info!(path = %self.path.display(), bits = trace.len(), "correlation plot written");
        Ok(())
    }
}

/// Render a step plot: bit index on x, correlation on y, zero axis in grey.
///
/// Bits decided as 1 are blue, bits decided as 0 are red. Each byte boundary
/// gets a light grid line.
pub fn render_correlation(trace: &[SoftBit], px_per_bit: u32, height: u32) -> Result<RgbImage> {
    if trace.is_empty() {
        return Err(CdmaError::InvalidInput("empty correlation trace".into()));
    }
    if px_per_bit == 0 || height <= 2 * MARGIN {
        return Err(CdmaError::InvalidInput(format!(
            "plot geometry {}px/bit x {}px is too small",
            px_per_bit, height
        )));
    }

    let width = u32::try_from(trace.len())
        .ok()
        .and_then(|n| n.checked_mul(px_per_bit))
        .ok_or_else(|| CdmaError::InvalidInput(format!("{} bits is too many to plot", trace.len())))?;

    let peak = trace
        .iter()
        .map(|soft| soft.correlation.abs())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let peak = if peak > 0.0 { peak } else { 1.0 };

    let mid = (height - 1) as f64 / 2.0;
    let span = mid - MARGIN as f64;
    let to_y = |v: f64| -> u32 {
        let v = if v.is_finite() { v } else { 0.0 };
        (mid - v / peak * span).round().clamp(0.0, (height - 1) as f64) as u32
    };

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    for byte_start in (0..trace.len()).step_by(8) {
        let x = byte_start as u32 * px_per_bit;
        for y in 0..height {
            img.put_pixel(x, y, GRID);
        }
    }

    let zero_y = to_y(0.0);
    for x in 0..width {
        img.put_pixel(x, zero_y, AXIS);
    }

    let mut prev_y: Option<u32> = None;
    for (i, soft) in trace.iter().enumerate() {
        let colour = if soft.bit == 1 { ONE } else { ZERO };
        let y = to_y(soft.correlation);
        let x0 = i as u32 * px_per_bit;

        // riser from the previous level
        if let Some(py) = prev_y {
            for yy in py.min(y)..=py.max(y) {
                img.put_pixel(x0, yy, colour);
            }
        }
        for x in x0..x0 + px_per_bit {
            img.put_pixel(x, y, colour);
        }
        prev_y = Some(y);
    }

    Ok(img)
}

/// Render with default geometry and save to `path`.
pub fn save_correlation_png(trace: &[SoftBit], path: impl AsRef<Path>) -> Result<()> {
    PngPlot::new(path.as_ref()).consume(trace)
}
