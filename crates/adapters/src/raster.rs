use std::io::Cursor;

use image::{ImageFormat, ImageReader, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_ellipse_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tracing::debug;
use vehicle_inspect_application::{ApplicationError, EncodedImage, ImageRaster, RasterCanvas};
use vehicle_inspect_domain::{DrawInstruction, ImageDimensions, ImageRef, OverlayGeometry};

use crate::source;

/// Decodes with `image`, strokes overlays with `imageproc`, encodes PNG.
#[derive(Debug, Default)]
pub struct ImageCrateRaster;

impl ImageRaster for ImageCrateRaster {
    fn decode(&self, image: &ImageRef) -> Result<RasterCanvas, ApplicationError> {
        let decoded = match image {
            ImageRef::Inline { bytes, .. } => image::load_from_memory(bytes)
                .map_err(|error| ApplicationError::Decode(error.to_string()))?,
            ImageRef::Uri(uri) => {
                let path = source::local_path(uri)?;
                ImageReader::open(&path)
                    .map_err(|error| ApplicationError::Io(error.to_string()))?
                    .with_guessed_format()
                    .map_err(|error| ApplicationError::Decode(error.to_string()))?
                    .decode()
                    .map_err(|error| ApplicationError::Decode(error.to_string()))?
            }
        };

        let rgba = decoded.to_rgba8();
        let dimensions = ImageDimensions::new(rgba.width(), rgba.height())?;
        Ok(RasterCanvas {
            dimensions,
            rgba: rgba.into_raw(),
        })
    }

    fn draw(
        &self,
        canvas: &mut RasterCanvas,
        instructions: &[DrawInstruction],
    ) -> Result<(), ApplicationError> {
        let mut buffer = to_buffer(canvas.dimensions, std::mem::take(&mut canvas.rgba))?;

        for instruction in instructions {
            let color = Rgba(instruction.stroke.color);
            let width = instruction.stroke.line_width.max(1) as i32;
            if !geometry_is_drawable(&instruction.geometry, canvas.dimensions) {
                debug!(issue = %instruction.issue_id, "skipping overlay with unusable geometry");
                continue;
            }

            for offset in stroke_offsets(width) {
                stroke_once(&mut buffer, &instruction.geometry, offset, color);
            }
        }

        canvas.rgba = buffer.into_raw();
        Ok(())
    }

    fn encode(&self, canvas: &RasterCanvas) -> Result<EncodedImage, ApplicationError> {
        let buffer = to_buffer(canvas.dimensions, canvas.rgba.clone())?;
        let mut bytes = Cursor::new(Vec::new());
        buffer
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|error| ApplicationError::Decode(error.to_string()))?;

        Ok(EncodedImage {
            mime_type: "image/png".to_string(),
            bytes: bytes.into_inner(),
        })
    }
}

fn to_buffer(dimensions: ImageDimensions, rgba: Vec<u8>) -> Result<RgbaImage, ApplicationError> {
    RgbaImage::from_raw(dimensions.width, dimensions.height, rgba).ok_or_else(|| {
        ApplicationError::Decode(format!(
            "pixel buffer does not match {}x{}",
            dimensions.width, dimensions.height
        ))
    })
}

/// Offsets of the one-pixel strokes that make up a line of `width`, centred
/// on the outline.
fn stroke_offsets(width: i32) -> std::ops::Range<i32> {
    let inner = width / 2;
    -inner..width - inner
}

/// Geometry reaching further than this many canvas sizes is not stroked.
const MAX_EXTENT_FACTOR: f64 = 4.0;

fn geometry_is_drawable(geometry: &OverlayGeometry, dimensions: ImageDimensions) -> bool {
    let limit = MAX_EXTENT_FACTOR * f64::from(dimensions.width.max(dimensions.height));
    let within = |values: &[f64]| values.iter().all(|v| v.is_finite() && v.abs() <= limit);
    match *geometry {
        OverlayGeometry::Circle {
            center_x,
            center_y,
            radius,
        } => within(&[center_x, center_y, radius]),
        OverlayGeometry::Ellipse {
            center_x,
            center_y,
            radius_x,
            radius_y,
        } => within(&[center_x, center_y, radius_x, radius_y]),
        OverlayGeometry::Rectangle {
            left,
            top,
            width,
            height,
        } => within(&[left, top, width, height]),
    }
}

fn stroke_once(buffer: &mut RgbaImage, geometry: &OverlayGeometry, offset: i32, color: Rgba<u8>) {
    match *geometry {
        OverlayGeometry::Circle {
            center_x,
            center_y,
            radius,
        } => {
            let radius = radius.round() as i32 + offset;
            if radius >= 0 {
                draw_hollow_circle_mut(buffer, (center_x.round() as i32, center_y.round() as i32), radius, color);
            }
        }
        OverlayGeometry::Ellipse {
            center_x,
            center_y,
            radius_x,
            radius_y,
        } => {
            let rx = radius_x.round() as i32 + offset;
            let ry = radius_y.round() as i32 + offset;
            if rx >= 0 && ry >= 0 {
                draw_hollow_ellipse_mut(
                    buffer,
                    (center_x.round() as i32, center_y.round() as i32),
                    rx,
                    ry,
                    color,
                );
            }
        }
        OverlayGeometry::Rectangle {
            left,
            top,
            width,
            height,
        } => {
            let w = width.round() as i32 + 2 * offset;
            let h = height.round() as i32 + 2 * offset;
            if w > 0 && h > 0 {
                let rect = Rect::at(left.round() as i32 - offset, top.round() as i32 - offset)
                    .of_size(w as u32, h as u32);
                draw_hollow_rect_mut(buffer, rect, color);
            }
        }
    }
}
