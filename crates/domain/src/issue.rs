use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::aggregate::total_estimated_cost;
use crate::{BoundingBox, IssueId, PhotoId};

/// Display label for an issue. Independent of the cost multiplier brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minor => f.write_str("minor"),
            Self::Major => f.write_str("major"),
        }
    }
}

/// A priced damage finding on one return photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: IssueId,
    pub label: String,
    pub confidence: f64,
    pub severity: Severity,
    pub bounding_box: Option<BoundingBox>,
    pub photo_id: PhotoId,
    pub estimated_cost: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub total_estimated_cost: u64,
}

/// Outcome of one analysis run. The summary is always derived from the
/// issue list, never carried separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub issues: Vec<Issue>,
    pub summary: CostSummary,
}

impl Results {
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        let summary = CostSummary {
            total_estimated_cost: total_estimated_cost(&issues),
        };
        Self { issues, summary }
    }

    pub fn issues_for_photo<'a>(&'a self, photo_id: &'a PhotoId) -> impl Iterator<Item = &'a Issue> {
        self.issues
            .iter()
            .filter(move |issue| &issue.photo_id == photo_id)
    }
}
