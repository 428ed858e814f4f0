//! Projection of normalized issue boxes onto pixel-space overlay geometry.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, ImageDimensions, Issue, IssueId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayShape {
    /// One circle of radius `max(rx, ry)`; drops the box aspect ratio.
    #[default]
    Circle,
    Ellipse,
    Rectangle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationScope {
    #[default]
    FirstReturnPhoto,
    AllReturnPhotos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: [u8; 4],
    pub line_width: u32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: [255, 0, 0, 255],
            line_width: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationSettings {
    pub scope: AnnotationScope,
    pub shape: OverlayShape,
    pub stroke: StrokeStyle,
}

/// Pixel-space outline to stroke on the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayGeometry {
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
    Ellipse {
        center_x: f64,
        center_y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Rectangle {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawInstruction {
    pub issue_id: IssueId,
    pub geometry: OverlayGeometry,
    pub stroke: StrokeStyle,
}

pub fn project_box(
    bbox: &BoundingBox,
    dimensions: ImageDimensions,
    shape: OverlayShape,
) -> OverlayGeometry {
    let w = f64::from(dimensions.width);
    let h = f64::from(dimensions.height);
    let (cx, cy) = bbox.center();
    let center_x = cx * w;
    let center_y = cy * h;
    let radius_x = (bbox.width() / 2.0) * w;
    let radius_y = (bbox.height() / 2.0) * h;

    match shape {
        OverlayShape::Circle => OverlayGeometry::Circle {
            center_x,
            center_y,
            radius: radius_x.max(radius_y),
        },
        OverlayShape::Ellipse => OverlayGeometry::Ellipse {
            center_x,
            center_y,
            radius_x,
            radius_y,
        },
        OverlayShape::Rectangle => OverlayGeometry::Rectangle {
            left: bbox.xmin * w,
            top: bbox.ymin * h,
            width: bbox.width() * w,
            height: bbox.height() * h,
        },
    }
}

/// Drawing instructions for the given issues, in issue order. Issues
/// without a bounding box produce nothing.
pub fn project_issues<'a>(
    issues: impl IntoIterator<Item = &'a Issue>,
    dimensions: ImageDimensions,
    shape: OverlayShape,
    stroke: StrokeStyle,
) -> Vec<DrawInstruction> {
    issues
        .into_iter()
        .filter_map(|issue| {
            let bbox = issue.bounding_box.as_ref()?;
            Some(DrawInstruction {
                issue_id: issue.id.clone(),
                geometry: project_box(bbox, dimensions, shape),
                stroke,
            })
        })
        .collect()
}
