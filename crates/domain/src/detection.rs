use serde::{Deserialize, Serialize};

/// Axis-aligned box in normalized image space, each edge nominally in
/// `[0, 1]`. Ordering of the edges is not validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }

    /// Rescales a box reported in pixels into normalized space.
    pub fn normalized_by(&self, width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        Self {
            xmin: self.xmin / w,
            ymin: self.ymin / h,
            xmax: self.xmax / w,
            ymax: self.ymax / h,
        }
    }
}

/// A single detector finding, as returned by the detection adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub score: f64,
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_is_width_times_height() {
        let bbox = BoundingBox::new(0.1, 0.2, 0.3, 0.3);
        assert!((bbox.width() - 0.2).abs() < 1e-12);
        assert!((bbox.height() - 0.1).abs() < 1e-12);
        assert!((bbox.area() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn detection_reads_detector_json() {
        let raw = r#"[{"label":"dent","score":0.91,"box":{"xmin":0.1,"ymin":0.2,"xmax":0.4,"ymax":0.5}}]"#;
        let parsed: Vec<Detection> = serde_json::from_str(raw).expect("json");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].label, "dent");
        assert_eq!(parsed[0].bounding_box.xmax, 0.4);
    }

    #[test]
    fn pixel_boxes_normalize_by_dimensions() {
        let bbox = BoundingBox::new(100.0, 50.0, 300.0, 150.0).normalized_by(1000, 500);
        assert_eq!(bbox, BoundingBox::new(0.1, 0.1, 0.3, 0.3));
    }
}
