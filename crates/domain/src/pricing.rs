//! Repair cost model: turns a detection into a priced [`Issue`].
//!
//! `estimated_cost = round(base_cost(label) * severity_multiplier(score) *
//! size_multiplier(area))`, rounded half away from zero. The display
//! severity uses its own threshold and is not tied to the multiplier
//! brackets.

use std::collections::BTreeMap;

use crate::{Detection, DomainError, Issue, IssueId, PhotoId, Severity};

pub const DEFAULT_BASE_COST: u32 = 300;
pub const DEFAULT_MAJOR_THRESHOLD: f64 = 0.7;
pub const DEFAULT_SIZE_SCALE: f64 = 2000.0;
pub const DEFAULT_SIZE_FLOOR: f64 = 0.5;
pub const DEFAULT_SIZE_CEILING: f64 = 3.0;

/// A score strictly greater than `above` earns `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBracket {
    pub above: f64,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    pub base_costs: BTreeMap<String, u32>,
    pub default_base_cost: u32,
    /// Ordered from the highest threshold down; the first bracket whose
    /// threshold the score exceeds applies.
    pub severity_brackets: Vec<SeverityBracket>,
    pub baseline_severity_multiplier: f64,
    pub size_scale: f64,
    pub size_floor: f64,
    pub size_ceiling: f64,
    pub major_threshold: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        let base_costs = [("scratch", 100), ("dent", 400), ("crack", 600)]
            .into_iter()
            .map(|(label, cost)| (label.to_string(), cost))
            .collect();

        Self {
            base_costs,
            default_base_cost: DEFAULT_BASE_COST,
            severity_brackets: vec![
                SeverityBracket {
                    above: 0.85,
                    multiplier: 2.0,
                },
                SeverityBracket {
                    above: 0.65,
                    multiplier: 1.5,
                },
                SeverityBracket {
                    above: 0.4,
                    multiplier: 1.2,
                },
            ],
            baseline_severity_multiplier: 1.0,
            size_scale: DEFAULT_SIZE_SCALE,
            size_floor: DEFAULT_SIZE_FLOOR,
            size_ceiling: DEFAULT_SIZE_CEILING,
            major_threshold: DEFAULT_MAJOR_THRESHOLD,
        }
    }
}

/// Every factor that went into one issue's price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub area: f64,
    pub base_cost: u32,
    pub severity_multiplier: f64,
    pub size_multiplier: f64,
    pub estimated_cost: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedIssue {
    pub issue: Issue,
    pub breakdown: CostBreakdown,
}

impl CostModel {
    pub fn with_base_cost(mut self, label: impl Into<String>, cost: u32) -> Self {
        self.base_costs.insert(label.into(), cost);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let non_negative = |value: f64| value.is_finite() && value >= 0.0;

        if !non_negative(self.baseline_severity_multiplier) {
            return Err(DomainError::InvalidCostModel(format!(
                "baseline severity multiplier must be a non-negative number, got {}",
                self.baseline_severity_multiplier
            )));
        }
        for bracket in &self.severity_brackets {
            if !bracket.above.is_finite() || !non_negative(bracket.multiplier) {
                return Err(DomainError::InvalidCostModel(format!(
                    "severity bracket above {} with multiplier {} is not valid",
                    bracket.above, bracket.multiplier
                )));
            }
        }
        if self
            .severity_brackets
            .windows(2)
            .any(|pair| pair[0].above <= pair[1].above)
        {
            return Err(DomainError::InvalidCostModel(
                "severity brackets must be ordered by descending threshold".to_string(),
            ));
        }
        if !non_negative(self.size_scale) {
            return Err(DomainError::InvalidCostModel(format!(
                "size scale must be a non-negative number, got {}",
                self.size_scale
            )));
        }
        if !non_negative(self.size_floor)
            || !non_negative(self.size_ceiling)
            || self.size_floor > self.size_ceiling
        {
            return Err(DomainError::InvalidCostModel(format!(
                "size multiplier bounds must satisfy 0 <= floor <= ceiling, got {}..{}",
                self.size_floor, self.size_ceiling
            )));
        }
        if !self.major_threshold.is_finite() {
            return Err(DomainError::InvalidCostModel(
                "major severity threshold must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn base_cost(&self, label: &str) -> u32 {
        self.base_costs
            .get(label)
            .copied()
            .unwrap_or(self.default_base_cost)
    }

    pub fn severity_multiplier(&self, score: f64) -> f64 {
        self.severity_brackets
            .iter()
            .find(|bracket| score > bracket.above)
            .map(|bracket| bracket.multiplier)
            .unwrap_or(self.baseline_severity_multiplier)
    }

    pub fn size_multiplier(&self, area: f64) -> f64 {
        if !area.is_finite() {
            return self.size_floor;
        }
        (area * self.size_scale)
            .max(self.size_floor)
            .min(self.size_ceiling)
    }

    pub fn severity(&self, score: f64) -> Severity {
        if score > self.major_threshold {
            Severity::Major
        } else {
            Severity::Minor
        }
    }

    pub fn estimate(&self, detection: &Detection) -> CostBreakdown {
        let area = detection.bounding_box.area();
        let base_cost = self.base_cost(&detection.label);
        let severity_multiplier = self.severity_multiplier(detection.score);
        let size_multiplier = self.size_multiplier(area);

        CostBreakdown {
            area,
            base_cost,
            severity_multiplier,
            size_multiplier,
            estimated_cost: round_cost(f64::from(base_cost) * severity_multiplier * size_multiplier),
        }
    }

    pub fn price_detection(
        &self,
        detection: &Detection,
        photo_id: &PhotoId,
        issue_id: IssueId,
    ) -> PricedIssue {
        let breakdown = self.estimate(detection);
        PricedIssue {
            issue: Issue {
                id: issue_id,
                label: detection.label.clone(),
                confidence: detection.score,
                severity: self.severity(detection.score),
                bounding_box: Some(detection.bounding_box),
                photo_id: photo_id.clone(),
                estimated_cost: breakdown.estimated_cost,
            },
            breakdown,
        }
    }

    /// One priced issue per detection, in detection order. Nothing is
    /// filtered, merged or de-duplicated.
    pub fn derive_issues(
        &self,
        photo_id: &PhotoId,
        detections: &[Detection],
        next_issue_id: &mut dyn FnMut() -> IssueId,
    ) -> Vec<PricedIssue> {
        detections
            .iter()
            .map(|detection| self.price_detection(detection, photo_id, next_issue_id()))
            .collect()
    }
}

/// Nearest integer, halves away from zero. Negative or non-finite products
/// price at zero.
fn round_cost(raw: f64) -> u64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundingBox;

    fn detection(label: &str, score: f64, bbox: BoundingBox) -> Detection {
        Detection {
            label: label.to_string(),
            score,
            bounding_box: bbox,
        }
    }

    /// Square box centred in the frame with the requested area.
    fn box_with_area(area: f64) -> BoundingBox {
        let half = area.sqrt() / 2.0;
        BoundingBox::new(0.5 - half, 0.5 - half, 0.5 + half, 0.5 + half)
    }

    fn sequential_ids() -> impl FnMut() -> IssueId {
        let mut next = 0;
        move || {
            next += 1;
            IssueId::new(format!("iss_{next}")).expect("id")
        }
    }

    #[test]
    fn base_costs_follow_label_table() {
        let model = CostModel::default();
        assert_eq!(model.base_cost("scratch"), 100);
        assert_eq!(model.base_cost("dent"), 400);
        assert_eq!(model.base_cost("crack"), 600);
        assert_eq!(model.base_cost("unknown_label"), 300);
        assert_eq!(model.base_cost("Dent"), 300);
    }

    #[test]
    fn base_cost_table_is_configurable() {
        let model = CostModel::default().with_base_cost("bumper", 900);
        assert_eq!(model.base_cost("bumper"), 900);
        assert_eq!(model.base_cost("dent"), 400);
    }

    #[test]
    fn severity_multiplier_thresholds_are_exclusive() {
        let model = CostModel::default();
        assert_eq!(model.severity_multiplier(1.0), 2.0);
        assert_eq!(model.severity_multiplier(0.850_001), 2.0);
        assert_eq!(model.severity_multiplier(0.85), 1.5);
        assert_eq!(model.severity_multiplier(0.7), 1.5);
        assert_eq!(model.severity_multiplier(0.65), 1.2);
        assert_eq!(model.severity_multiplier(0.41), 1.2);
        assert_eq!(model.severity_multiplier(0.4), 1.0);
        assert_eq!(model.severity_multiplier(0.0), 1.0);
    }

    #[test]
    fn non_finite_score_gets_baseline_multiplier_and_minor_severity() {
        let model = CostModel::default();
        assert_eq!(model.severity_multiplier(f64::NAN), 1.0);
        assert_eq!(model.severity(f64::NAN), Severity::Minor);
    }

    #[test]
    fn size_multiplier_is_clamped_linear_in_area() {
        let model = CostModel::default();
        assert_eq!(model.size_multiplier(0.0001), 0.5);
        assert_eq!(model.size_multiplier(0.01), 3.0);
        assert_eq!(model.size_multiplier(0.001), 2.0);
        assert_eq!(model.size_multiplier(0.0), 0.5);
        assert_eq!(model.size_multiplier(-0.2), 0.5);
        assert_eq!(model.size_multiplier(f64::NAN), 0.5);
        assert_eq!(model.size_multiplier(f64::INFINITY), 0.5);
    }

    #[test]
    fn display_severity_uses_its_own_threshold() {
        let model = CostModel::default();
        assert_eq!(model.severity(0.71), Severity::Major);
        assert_eq!(model.severity(0.7), Severity::Minor);
        // 0.68 sits in the 1.5x cost bracket but is still displayed as minor.
        assert_eq!(model.severity(0.68), Severity::Minor);
        assert_eq!(model.severity_multiplier(0.68), 1.5);
    }

    #[test]
    fn dent_with_high_confidence_prices_at_2400() {
        let model = CostModel::default();
        let breakdown = model.estimate(&detection("dent", 0.9, BoundingBox::new(0.0, 0.0, 0.04, 0.05)));
        assert_eq!(breakdown.base_cost, 400);
        assert_eq!(breakdown.severity_multiplier, 2.0);
        assert_eq!(breakdown.size_multiplier, 3.0);
        assert_eq!(breakdown.estimated_cost, 2400);
    }

    #[test]
    fn unknown_label_with_tiny_area_prices_at_180() {
        let model = CostModel::default();
        let breakdown =
            model.estimate(&detection("unknown_label", 0.5, BoundingBox::new(0.0, 0.0, 0.01, 0.01)));
        assert_eq!(breakdown.base_cost, 300);
        assert_eq!(breakdown.severity_multiplier, 1.2);
        assert_eq!(breakdown.size_multiplier, 0.5);
        assert_eq!(breakdown.estimated_cost, 180);
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        let model = CostModel::default().with_base_cost("chip", 5);
        // 5 * 1.0 * 0.5 = 2.5
        let breakdown = model.estimate(&detection("chip", 0.2, BoundingBox::new(0.0, 0.0, 0.001, 0.001)));
        assert_eq!(breakdown.estimated_cost, 3);

        // 100 * 1.2 * 0.5 = 60 exactly, and 100 * 1.5 * 0.5 = 75.
        let scratch = model.estimate(&detection("scratch", 0.5, box_with_area(0.0001)));
        assert_eq!(scratch.estimated_cost, 60);
        let scratch = model.estimate(&detection("scratch", 0.7, box_with_area(0.0001)));
        assert_eq!(scratch.estimated_cost, 75);
    }

    #[test]
    fn estimated_cost_never_negative_for_inverted_boxes() {
        let model = CostModel::default();
        let breakdown = model.estimate(&detection("crack", 0.95, BoundingBox::new(0.6, 0.4, 0.4, 0.5)));
        assert!(breakdown.area < 0.0);
        assert_eq!(breakdown.size_multiplier, 0.5);
        assert_eq!(breakdown.estimated_cost, 600);
    }

    #[test]
    fn every_detection_becomes_one_issue_in_order() {
        let model = CostModel::default();
        let photo = PhotoId::new("p_return").expect("id");
        let detections = vec![
            detection("scratch", 0.1, box_with_area(0.0001)),
            detection("dent", 0.9, BoundingBox::new(0.0, 0.0, 0.04, 0.05)),
            detection("scratch", 0.1, box_with_area(0.0001)),
        ];
        let mut ids = sequential_ids();

        let priced = model.derive_issues(&photo, &detections, &mut ids);

        assert_eq!(priced.len(), 3);
        let labels: Vec<&str> = priced.iter().map(|p| p.issue.label.as_str()).collect();
        assert_eq!(labels, vec!["scratch", "dent", "scratch"]);
        let ids: Vec<&str> = priced.iter().map(|p| p.issue.id.as_str()).collect();
        assert_eq!(ids, vec!["iss_1", "iss_2", "iss_3"]);
        assert!(priced.iter().all(|p| p.issue.photo_id == photo));
        assert_eq!(priced[1].issue.confidence, 0.9);
        assert_eq!(priced[1].issue.severity, Severity::Major);
        assert_eq!(
            priced[1].issue.bounding_box,
            Some(BoundingBox::new(0.0, 0.0, 0.04, 0.05))
        );
        assert_eq!(priced[0].issue.estimated_cost, 50);
    }

    #[test]
    fn derivation_is_deterministic() {
        let model = CostModel::default();
        let photo = PhotoId::new("p_return").expect("id");
        let detections = vec![
            detection("crack", 0.66, box_with_area(0.0007)),
            detection("dent", 0.41, box_with_area(0.003)),
        ];

        let first = model.derive_issues(&photo, &detections, &mut sequential_ids());
        let second = model.derive_issues(&photo, &detections, &mut sequential_ids());
        assert_eq!(first, second);
    }

    #[test]
    fn default_model_is_valid() {
        assert!(CostModel::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_misordered_brackets_and_bounds() {
        let mut model = CostModel::default();
        model.severity_brackets.reverse();
        assert!(matches!(
            model.validate(),
            Err(DomainError::InvalidCostModel(_))
        ));

        let model = CostModel {
            size_floor: 4.0,
            ..CostModel::default()
        };
        assert!(matches!(
            model.validate(),
            Err(DomainError::InvalidCostModel(_))
        ));

        let model = CostModel {
            baseline_severity_multiplier: f64::NAN,
            ..CostModel::default()
        };
        assert!(model.validate().is_err());
    }
}
